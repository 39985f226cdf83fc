//! Capability presence rules.

use crate::engine::validator::{ValidationContext, Validator, Verdict};
use crate::error::RuleFault;
use crate::graph::hierarchy::SearchScope;
use crate::graph::EntityId;
use crate::types::{Marker, TypeName};

fn subject_entity(cx: &ValidationContext<'_>) -> Result<EntityId, RuleFault> {
    cx.entity().ok_or_else(|| {
        RuleFault::new(format!(
            "{} is not attached to an entity",
            cx.describe_subject()
        ))
    })
}

fn join(types: &[TypeName]) -> String {
    types
        .iter()
        .map(TypeName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every required capability must be present within the marker's search scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireCapabilityRule;

impl Validator for RequireCapabilityRule {
    fn validate(&self, marker: &Marker, cx: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        let entity = subject_entity(cx)?;
        let scope = SearchScope::from_params(&marker.params);
        let missing = cx
            .hierarchy()
            .missing(cx.graph, entity, &marker.params.required, scope);

        if missing.is_empty() {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::fail(format!(
                "missing required {} (searched {})",
                join(&missing),
                scope.describe()
            )))
        }
    }
}

/// None of the listed capabilities may be present within the search scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForbidCapabilityRule;

impl Validator for ForbidCapabilityRule {
    fn validate(&self, marker: &Marker, cx: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        let entity = subject_entity(cx)?;
        let scope = SearchScope::from_params(&marker.params);
        let hierarchy = cx.hierarchy();

        let present: Vec<TypeName> = marker
            .params
            .required
            .iter()
            .filter(|ty| hierarchy.satisfies(cx.graph, entity, std::slice::from_ref(*ty), scope))
            .cloned()
            .collect();

        if present.is_empty() {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::fail(format!(
                "forbidden {} present (searched {})",
                join(&present),
                scope.describe()
            )))
        }
    }
}
