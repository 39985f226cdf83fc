//! Project manifest rules.

use crate::engine::validator::{ValidationContext, Validator, Verdict};
use crate::error::RuleFault;
use crate::types::Marker;

/// Whether `required` is listed in `manifest`. A trailing `/` matches any
/// entry inside that folder.
pub fn manifest_contains(manifest: &[String], required: &str) -> bool {
    if required.ends_with('/') {
        manifest.iter().any(|entry| entry.starts_with(required))
    } else {
        manifest.iter().any(|entry| entry == required)
    }
}

/// Every path in the marker's `paths` must appear in the project manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirePathsRule;

impl Validator for RequirePathsRule {
    fn validate(&self, marker: &Marker, cx: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        let missing: Vec<&str> = marker
            .params
            .paths
            .iter()
            .map(String::as_str)
            .filter(|path| !manifest_contains(cx.project_paths, path))
            .collect();

        if missing.is_empty() {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::fail(format!(
                "project is missing {}",
                missing.join(", ")
            )))
        }
    }
}
