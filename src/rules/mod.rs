//! Built-in marker families and their validators.
//!
//! The built-ins are ordinary type declarations: [`install`] adds them to a
//! universe builder, after which [`MarkerRegistry::register`] with
//! [`VALIDATION_MARKER`] binds them like any client-declared rule.
//!
//! - Hierarchy: `RequireCapability`, `ForbidCapability`
//! - Field: `NotNull`, `NotEmpty`
//! - Project: `RequirePaths`
//!
//! [`MarkerRegistry::register`]: crate::engine::registry::MarkerRegistry::register

pub mod field;
pub mod hierarchy;
pub mod project;

use crate::types::{TypeInfo, TypeUniverseBuilder, MARKER_ROOT};

/// Base type of every capability the runner inspects.
pub const COMPONENT_ROOT: &str = "Component";

/// Base type of project-scope descriptors.
pub const PROJECT_ROOT: &str = "ProjectSettings";

/// Family of every built-in marker.
pub const VALIDATION_MARKER: &str = "ValidationMarker";

/// Types carrying this marker are skipped when it is configured as ignored.
pub const IGNORE_VALIDATION: &str = "IgnoreValidation";

pub const REQUIRE_CAPABILITY: &str = "RequireCapability";
pub const FORBID_CAPABILITY: &str = "ForbidCapability";
pub const NOT_NULL: &str = "NotNull";
pub const NOT_EMPTY: &str = "NotEmpty";
pub const REQUIRE_PATHS: &str = "RequirePaths";

/// Listing entry for a built-in rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo {
    pub marker: &'static str,
    pub validator: &'static str,
    /// Where the marker is meant to be placed
    pub placement: &'static str,
    pub description: &'static str,
}

/// Get all built-in rules
pub fn builtin_rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            marker: REQUIRE_CAPABILITY,
            validator: "RequireCapabilityValidator",
            placement: "component",
            description: "Required capabilities exist on the entity, its children or its parents",
        },
        RuleInfo {
            marker: FORBID_CAPABILITY,
            validator: "ForbidCapabilityValidator",
            placement: "component",
            description: "Listed capabilities are absent from the searched hierarchy",
        },
        RuleInfo {
            marker: NOT_NULL,
            validator: "NotNullValidator",
            placement: "field",
            description: "Field is set and any entity reference resolves",
        },
        RuleInfo {
            marker: NOT_EMPTY,
            validator: "NotEmptyValidator",
            placement: "field",
            description: "Text or list field has at least one element",
        },
        RuleInfo {
            marker: REQUIRE_PATHS,
            validator: "RequirePathsValidator",
            placement: "project",
            description: "Listed paths appear in the project manifest; a trailing '/' matches a folder",
        },
    ]
}

/// Type declarations for the roots, markers and validators above.
pub fn builtin_types() -> Vec<TypeInfo> {
    vec![
        TypeInfo::new(COMPONENT_ROOT),
        TypeInfo::new(PROJECT_ROOT),
        TypeInfo::marker(VALIDATION_MARKER, MARKER_ROOT),
        TypeInfo::marker(IGNORE_VALIDATION, MARKER_ROOT),
        TypeInfo::marker(REQUIRE_CAPABILITY, VALIDATION_MARKER),
        TypeInfo::marker(FORBID_CAPABILITY, VALIDATION_MARKER),
        TypeInfo::marker(NOT_NULL, VALIDATION_MARKER),
        TypeInfo::marker(NOT_EMPTY, VALIDATION_MARKER),
        TypeInfo::marker(REQUIRE_PATHS, VALIDATION_MARKER),
        TypeInfo::validator(
            "RequireCapabilityValidator",
            REQUIRE_CAPABILITY,
            || hierarchy::RequireCapabilityRule,
        ),
        TypeInfo::validator(
            "ForbidCapabilityValidator",
            FORBID_CAPABILITY,
            || hierarchy::ForbidCapabilityRule,
        ),
        TypeInfo::validator("NotNullValidator", NOT_NULL, || field::NotNullRule),
        TypeInfo::validator("NotEmptyValidator", NOT_EMPTY, || field::NotEmptyRule),
        TypeInfo::validator("RequirePathsValidator", REQUIRE_PATHS, || {
            project::RequirePathsRule
        }),
    ]
}

/// Add the built-in declarations to `builder`.
pub fn install(builder: TypeUniverseBuilder) -> TypeUniverseBuilder {
    builder.types(builtin_types())
}
