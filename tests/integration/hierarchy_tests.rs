//! Hierarchy search tests over directly wired graphs.

use scene_validator::{HierarchyValidator, SearchScope, TypeInfo, TypeName, TypeUniverse};

use crate::mocks::MockGraph;

fn names(types: &[&str]) -> Vec<TypeName> {
    types.iter().map(|t| TypeName::from(*t)).collect()
}

#[test]
fn test_self_match_needs_no_search() {
    let mut graph = MockGraph::new();
    let root = graph.root("root", &["Tag", "Collider"]);
    let v = HierarchyValidator::exact();
    assert!(v.satisfies(&graph, root, &names(&["Tag", "Collider"]), SearchScope::SELF_ONLY));
}

#[test]
fn test_deep_descendant() {
    let mut graph = MockGraph::new();
    let mut parent = graph.root("level0", &[]);
    for depth in 1..50 {
        let child = graph.node(&format!("level{}", depth), &[]);
        graph.wire(parent, child);
        parent = child;
    }
    graph.nodes[parent.0]
        .capabilities
        .push(scene_validator::Capability::new("Tag"));

    let v = HierarchyValidator::exact();
    let root = graph.id("level0");
    assert!(v.satisfies(&graph, root, &names(&["Tag"]), SearchScope::new(true, false)));
    assert!(v.satisfies(&graph, parent, &names(&["Tag"]), SearchScope::SELF_ONLY));
}

#[test]
fn test_parent_cycle_terminates() {
    let mut graph = MockGraph::new();
    let a = graph.root("a", &[]);
    let b = graph.node("b", &[]);
    graph.wire(a, b);
    graph.wire(b, a);

    let v = HierarchyValidator::exact();
    let missing = v.missing(&graph, b, &names(&["Tag"]), SearchScope::new(true, true));
    assert_eq!(missing, names(&["Tag"]));
}

#[test]
fn test_shared_child_visited_once() {
    let mut graph = MockGraph::new();
    let root = graph.root("root", &[]);
    let left = graph.node("left", &[]);
    let right = graph.node("right", &[]);
    let shared = graph.node("shared", &["Tag"]);
    graph.wire(root, left);
    graph.wire(root, right);
    graph.wire(left, shared);
    graph.wire(right, shared);

    let v = HierarchyValidator::exact();
    assert!(v.satisfies(&graph, root, &names(&["Tag"]), SearchScope::new(true, false)));
}

#[test]
fn test_subtype_matching_through_universe() {
    let universe = TypeUniverse::builder()
        .ty(TypeInfo::new("Component"))
        .ty(TypeInfo::new("Collider").extends("Component"))
        .ty(TypeInfo::new("MeshCollider").extends("Collider"))
        .build()
        .unwrap();

    let mut graph = MockGraph::new();
    let root = graph.root("root", &[]);
    let child = graph.node("child", &["MeshCollider"]);
    graph.wire(root, child);

    let scope = SearchScope::new(true, false);
    assert!(HierarchyValidator::new(&universe).satisfies(&graph, root, &names(&["Collider"]), scope));
    assert!(!HierarchyValidator::exact().satisfies(&graph, root, &names(&["Collider"]), scope));
}
