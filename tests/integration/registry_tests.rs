//! Marker registry tests.

use std::sync::Arc;

use scene_validator::rules::{self, VALIDATION_MARKER};
use scene_validator::{Marker, MarkerRegistry, TypeInfo, TypeName, ValidationError};

use crate::mocks::{tag_builder, FailingValidator, PassingValidator};

#[test]
fn test_builtins_and_client_rules_share_a_family() {
    let universe = Arc::new(tag_builder().build().unwrap());
    let mut registry = MarkerRegistry::new(universe);
    let added = registry.register(VALIDATION_MARKER).unwrap();

    assert_eq!(added, rules::builtin_rules().len() + 1);
    let binding = registry.resolve_kind(&"RequireTag".into()).unwrap();
    assert_eq!(binding.validator_type(), &TypeName::from("TagValidator"));
    assert_eq!(binding.default_marker(), &Marker::new("RequireTag"));
    assert!(registry.resolve_symbol("RequireTag").is_some());
}

#[test]
fn test_conflicting_client_rule_is_rejected() {
    let universe = tag_builder()
        .ty(TypeInfo::validator("OtherTagValidator", "RequireTag", || PassingValidator))
        .build()
        .unwrap();
    let mut registry = MarkerRegistry::new(Arc::new(universe));

    let err = registry.register(VALIDATION_MARKER).unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(
        err,
        ValidationError::DuplicateBinding { ref marker, .. } if marker == "RequireTag"
    ));
    assert!(registry.is_empty());
    assert!(registry.resolve(&Marker::new("RequireTag")).is_err());
}

#[test]
fn test_narrow_family_then_wide_family() {
    let universe = tag_builder()
        .ty(TypeInfo::marker("Audio", VALIDATION_MARKER))
        .ty(TypeInfo::marker("Loudness", "Audio"))
        .ty(TypeInfo::validator("LoudnessValidator", "Loudness", || FailingValidator(None)))
        .build()
        .unwrap();
    let mut registry = MarkerRegistry::new(Arc::new(universe));

    assert_eq!(registry.register("Audio").unwrap(), 1);
    assert!(registry.recognizes(&"Loudness".into()));
    assert!(!registry.recognizes(&"RequireTag".into()));

    let wide = registry.register(VALIDATION_MARKER).unwrap();
    assert_eq!(wide, rules::builtin_rules().len() + 1);
    assert_eq!(registry.families().len(), 2);
}

#[test]
fn test_validator_bound_to_component_fails_registration() {
    let universe = tag_builder()
        .ty(TypeInfo::validator("Confused", "Tag", || PassingValidator))
        .build()
        .unwrap();
    let mut registry = MarkerRegistry::new(Arc::new(universe));
    assert!(matches!(
        registry.register(VALIDATION_MARKER),
        Err(ValidationError::NotAMarker(name)) if name == "Tag"
    ));
}
