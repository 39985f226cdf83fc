//! Field value rules.
//!
//! Both rules apply to field subjects only. A marker placed at type level
//! reaches them with a capability subject, which is reported as a fault.

use crate::engine::validator::{Subject, ValidationContext, Validator, Verdict};
use crate::error::RuleFault;
use crate::graph::FieldValue;
use crate::severity::Severity;
use crate::types::Marker;

fn field_name<'a>(cx: &ValidationContext<'a>) -> Result<&'a str, RuleFault> {
    match cx.subject {
        Subject::Field { field, .. } => Ok(field.as_str()),
        _ => Err(RuleFault::new(format!(
            "{} is not a field; field rules must be placed on fields",
            cx.describe_subject()
        ))),
    }
}

/// The field must hold a value, and an entity reference must resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNullRule;

impl Validator for NotNullRule {
    fn validate(&self, _marker: &Marker, cx: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        let field = field_name(cx)?;
        match cx.field_value() {
            None | Some(FieldValue::Null) => Ok(Verdict::fail(format!("{} is not set", field))),
            Some(FieldValue::Reference(id)) if !cx.graph.contains(*id) => Ok(Verdict::fail_with(
                Severity::Error,
                format!("{} references missing entity {}", field, id),
            )),
            Some(_) => Ok(Verdict::Pass),
        }
    }
}

/// Text must contain non-whitespace and lists must have elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmptyRule;

impl Validator for NotEmptyRule {
    fn validate(&self, _marker: &Marker, cx: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        let field = field_name(cx)?;
        let empty = match cx.field_value() {
            None | Some(FieldValue::Null) => true,
            Some(FieldValue::Text(text)) => text.trim().is_empty(),
            Some(FieldValue::List(items)) => items.is_empty(),
            Some(_) => false,
        };
        if empty {
            Ok(Verdict::fail(format!("{} is empty", field)))
        } else {
            Ok(Verdict::Pass)
        }
    }
}
