//! Type discovery and target discovery tests.

use std::sync::Arc;

use scene_validator::rules::{COMPONENT_ROOT, IGNORE_VALIDATION, NOT_NULL, REQUIRE_CAPABILITY};
use scene_validator::types::{Constraints, FieldInfo};
use scene_validator::{
    Capability, EntityGraph, Marker, RunnerConfig, Scene, Subject, TypeCache, TypeInfo, TypeName,
    TypeUniverse, ValidationError,
};

use crate::mocks::{create_runner, tag_builder, MockGraph};

fn universe() -> Arc<TypeUniverse> {
    let universe = tag_builder()
        .ty(
            TypeInfo::new("Door")
                .extends(COMPONENT_ROOT)
                .marked(Marker::new("RequireTag")),
        )
        .ty(TypeInfo::new("SlidingDoor").extends("Door"))
        .ty(
            TypeInfo::new("Light")
                .extends(COMPONENT_ROOT)
                .field(FieldInfo::new("target").marked(Marker::new(NOT_NULL))),
        )
        .ty(
            TypeInfo::new("Prototype")
                .extends(COMPONENT_ROOT)
                .marked(Marker::new(REQUIRE_CAPABILITY).requiring(["Tag"]))
                .marked(Marker::new(IGNORE_VALIDATION)),
        )
        .ty(TypeInfo::new("Plain").extends(COMPONENT_ROOT))
        .build()
        .unwrap();
    Arc::new(universe)
}

#[test]
fn test_cache_finds_marked_components_in_declaration_order() {
    let mut cache = TypeCache::new(universe());
    cache
        .add_matching(&COMPONENT_ROOT.into(), &Constraints::carrying("ValidationMarker"))
        .unwrap();
    let names: Vec<&str> = cache.names().iter().map(TypeName::as_str).collect();
    assert_eq!(names, vec!["Door", "SlidingDoor", "Light", "Prototype"]);
}

#[test]
fn test_cache_excludes_and_ignores() {
    let mut cache = TypeCache::new(universe());
    let root = TypeName::from(COMPONENT_ROOT);
    let constraints = Constraints::carrying("ValidationMarker").excluding(IGNORE_VALIDATION);
    cache.add_matching(&root, &constraints).unwrap();
    assert!(!cache.contains("Prototype"));

    assert_eq!(cache.ignore("Door"), 1);
    cache.add_matching(&root, &constraints).unwrap();
    assert!(!cache.contains("Door"));
    assert!(cache.contains("SlidingDoor"));
    assert_eq!(cache.count(), 2);
}

#[test]
fn test_cache_rejects_unknown_root_and_bad_index() {
    let mut cache = TypeCache::new(universe());
    assert!(matches!(
        cache.add_matching(&"Nope".into(), &Constraints::any()),
        Err(ValidationError::UnknownType(_))
    ));
    assert!(matches!(
        cache.get(0),
        Err(ValidationError::IndexOutOfRange { index: 0, count: 0 })
    ));
}

#[test]
fn test_runner_discovers_inherited_and_field_markers() {
    let mut scene = Scene::new();
    let root = scene.add_root("Level");
    let sliding = scene.add_child(root, "Sliding");
    scene.attach(sliding, Capability::new("SlidingDoor"));
    let lamp = scene.add_child(root, "Lamp");
    scene.attach(lamp, Capability::new("Light"));
    scene.attach(lamp, Capability::new("Plain"));

    let mut runner = create_runner(universe(), RunnerConfig::default());
    let targets = runner.discover(&scene).unwrap();

    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].declared_on, "Door");
    assert_eq!(
        targets[0].subject,
        Subject::Capability {
            entity: sliding,
            capability: "SlidingDoor".into(),
            index: 0
        }
    );
    assert_eq!(
        targets[1].subject,
        Subject::Field {
            entity: lamp,
            capability: "Light".into(),
            index: 0,
            field: "target".to_string()
        }
    );
}

#[test]
fn test_runner_ignore_marker_config() {
    let mut scene = Scene::new();
    let root = scene.add_root("proto");
    scene.attach(root, Capability::new("Prototype"));

    let mut runner = create_runner(universe(), RunnerConfig::default());
    assert_eq!(runner.discover(&scene).unwrap().len(), 1);

    let config = RunnerConfig {
        ignore_markers: vec![IGNORE_VALIDATION.into()],
        ..RunnerConfig::default()
    };
    let mut runner = create_runner(universe(), config);
    assert!(runner.discover(&scene).unwrap().is_empty());
}

#[test]
fn test_unregistered_family_is_not_discovered() {
    let universe = TypeUniverse::builder()
        .ty(TypeInfo::new(COMPONENT_ROOT))
        .ty(TypeInfo::marker("EditorHint", "Marker"))
        .ty(
            TypeInfo::new("Door")
                .extends(COMPONENT_ROOT)
                .marked(Marker::new("EditorHint")),
        )
        .build()
        .unwrap();

    let mut scene = Scene::new();
    let root = scene.add_root("door");
    scene.attach(root, Capability::new("Door"));

    let registry = scene_validator::MarkerRegistry::new(Arc::new(universe));
    let mut runner = scene_validator::ValidationRunner::new(registry, RunnerConfig::default());
    assert!(runner.discover(&scene).unwrap().is_empty());
}

#[test]
fn test_discovery_survives_cyclic_graph() {
    let mut graph = MockGraph::new();
    let a = graph.root("a", &["Door"]);
    let b = graph.node("b", &["Door"]);
    let c = graph.node("c", &["Door"]);
    graph.wire(a, b);
    graph.wire(b, c);
    graph.wire(c, a);

    let mut runner = create_runner(universe(), RunnerConfig::default());
    let targets = runner.discover(&graph).unwrap();
    assert_eq!(targets.len(), 3);

    let log = runner.run_all(&graph);
    assert_eq!(log.len(), 3);
    assert!(graph.contains(graph.id("c")));
}
