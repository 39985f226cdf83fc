//! The rule interface implemented by every validator.

use std::fmt;

use crate::error::RuleFault;
use crate::graph::hierarchy::HierarchyValidator;
use crate::graph::{entity_path, Capability, EntityGraph, EntityId, FieldValue};
use crate::severity::Severity;
use crate::types::{Marker, TypeName, TypeUniverse};

/// What a validation target refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A capability attached to an entity. `index` is its position in the
    /// entity's capability list, so two instances of one type stay distinct.
    Capability {
        entity: EntityId,
        capability: TypeName,
        index: usize,
    },
    /// One field of a capability attached to an entity
    Field {
        entity: EntityId,
        capability: TypeName,
        index: usize,
        field: String,
    },
    /// A type checked once per pass, independent of any entity
    Descriptor(TypeName),
}

impl Subject {
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Subject::Capability { entity, .. } | Subject::Field { entity, .. } => Some(*entity),
            Subject::Descriptor(_) => None,
        }
    }

    pub fn capability(&self) -> Option<&TypeName> {
        match self {
            Subject::Capability { capability, .. } | Subject::Field { capability, .. } => {
                Some(capability)
            }
            Subject::Descriptor(_) => None,
        }
    }

    /// Position of the capability in its entity's capability list.
    pub fn capability_index(&self) -> Option<usize> {
        match self {
            Subject::Capability { index, .. } | Subject::Field { index, .. } => Some(*index),
            Subject::Descriptor(_) => None,
        }
    }

    /// Human-readable location, resolving entity ids through `graph`.
    pub fn describe(&self, graph: &dyn EntityGraph) -> String {
        match self {
            Subject::Capability { entity, .. } | Subject::Field { entity, .. } => {
                format!("{} [{}]", entity_path(graph, *entity), self.slot())
            }
            Subject::Descriptor(name) => format!("<{}>", name),
        }
    }

    /// `Type`, `Type.field`, with `#index` after the type for every instance
    /// but the first of its position.
    fn slot(&self) -> String {
        match self {
            Subject::Capability {
                capability, index, ..
            } => instance_label(capability, *index),
            Subject::Field {
                capability,
                index,
                field,
                ..
            } => format!("{}.{}", instance_label(capability, *index), field),
            Subject::Descriptor(name) => name.to_string(),
        }
    }
}

fn instance_label(capability: &TypeName, index: usize) -> String {
    if index == 0 {
        capability.to_string()
    } else {
        format!("{}#{}", capability, index)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Capability { entity, .. } | Subject::Field { entity, .. } => {
                write!(f, "{} [{}]", entity, self.slot())
            }
            Subject::Descriptor(name) => write!(f, "<{}>", name),
        }
    }
}

/// Result of checking one target.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail {
        message: String,
        /// `None` leaves the choice to the marker or the runner default
        severity: Option<Severity>,
    },
}

impl Verdict {
    pub fn fail(message: impl Into<String>) -> Self {
        Verdict::Fail {
            message: message.into(),
            severity: None,
        }
    }

    pub fn fail_with(severity: Severity, message: impl Into<String>) -> Self {
        Verdict::Fail {
            message: message.into(),
            severity: Some(severity),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Everything a validator may read while checking one target.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub graph: &'a dyn EntityGraph,
    pub subject: &'a Subject,
    pub universe: &'a TypeUniverse,
    /// Project manifest entries, as plain path strings
    pub project_paths: &'a [String],
}

impl<'a> ValidationContext<'a> {
    /// Hierarchy checks using subtype-aware capability matching.
    pub fn hierarchy(&self) -> HierarchyValidator<'a> {
        HierarchyValidator::new(self.universe)
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.subject.entity()
    }

    /// The subject's capability instance, if the subject has one.
    ///
    /// Looked up by position; `None` if that slot no longer holds the
    /// subject's type.
    pub fn capability(&self) -> Option<&'a Capability> {
        let entity = self.subject.entity()?;
        let ty = self.subject.capability()?;
        let index = self.subject.capability_index()?;
        self.graph
            .capabilities(entity)
            .get(index)
            .filter(|c| &c.type_name == ty)
    }

    /// The subject field's current value. `None` when unset or not a field subject.
    pub fn field_value(&self) -> Option<&'a FieldValue> {
        match self.subject {
            Subject::Field { field, .. } => self.capability()?.field(field),
            _ => None,
        }
    }

    pub fn describe_subject(&self) -> String {
        self.subject.describe(self.graph)
    }
}

/// A rule bound to one marker kind.
///
/// Validators are shared across targets and threads and must not keep
/// per-call state.
pub trait Validator: Send + Sync {
    fn validate(&self, marker: &Marker, cx: &ValidationContext<'_>) -> Result<Verdict, RuleFault>;
}

impl<F> Validator for F
where
    F: Fn(&Marker, &ValidationContext<'_>) -> Result<Verdict, RuleFault> + Send + Sync,
{
    fn validate(&self, marker: &Marker, cx: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        self(marker, cx)
    }
}

/// Pins a closure to the validator signature so its argument and return
/// types are inferred.
pub fn validator_fn<F>(f: F) -> F
where
    F: Fn(&Marker, &ValidationContext<'_>) -> Result<Verdict, RuleFault> + Send + Sync,
{
    f
}
