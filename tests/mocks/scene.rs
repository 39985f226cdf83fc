//! Mock scenes, graphs and validators for testing.
//!
//! Provides:
//! - A `RequireTag` universe with a hand-written tag validator
//! - Validators that pass, fail, fault or panic on demand
//! - `MockGraph`, an [`EntityGraph`] whose wiring is set directly and may
//!   contain cycles or inconsistent parent links

use std::collections::HashMap;
use std::sync::Arc;

use scene_validator::graph::hierarchy::SearchScope;
use scene_validator::rules::{self, COMPONENT_ROOT, VALIDATION_MARKER};
use scene_validator::severity::Severity;
use scene_validator::types::TypeUniverseBuilder;
use scene_validator::{
    Capability, EntityGraph, EntityId, Marker, MarkerRegistry, RuleFault, RunnerConfig, TypeInfo,
    TypeName, TypeUniverse, ValidationContext, ValidationRunner, Validator, Verdict,
};

/// Checks that the subject entity has a `Tag` within the marker's scope.
pub struct TagValidator;

impl Validator for TagValidator {
    fn validate(&self, marker: &Marker, cx: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        let entity = cx
            .entity()
            .ok_or_else(|| RuleFault::new("RequireTag needs an entity"))?;
        let scope = SearchScope::from_params(&marker.params);
        let required = [TypeName::from("Tag")];
        if cx.hierarchy().satisfies(cx.graph, entity, &required, scope) {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::fail(format!("no Tag found (searched {})", scope.describe())))
        }
    }
}

/// Validator that always passes
pub struct PassingValidator;

impl Validator for PassingValidator {
    fn validate(&self, _: &Marker, _: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        Ok(Verdict::Pass)
    }
}

/// Validator that always fails, optionally naming a severity
pub struct FailingValidator(pub Option<Severity>);

impl Validator for FailingValidator {
    fn validate(&self, _: &Marker, _: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        Ok(match self.0 {
            Some(severity) => Verdict::fail_with(severity, "failed on purpose"),
            None => Verdict::fail("failed on purpose"),
        })
    }
}

/// Validator that returns a fault
pub struct FaultingValidator;

impl Validator for FaultingValidator {
    fn validate(&self, _: &Marker, _: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        Err(RuleFault::new("lookup table missing"))
    }
}

/// Validator that panics
pub struct PanickingValidator;

impl Validator for PanickingValidator {
    fn validate(&self, _: &Marker, _: &ValidationContext<'_>) -> Result<Verdict, RuleFault> {
        panic!("index out of bounds in rule")
    }
}

/// Built-ins plus `Tag`, the `RequireTag` marker and its validator.
pub fn tag_builder() -> TypeUniverseBuilder {
    rules::install(TypeUniverse::builder())
        .ty(TypeInfo::new("Tag").extends(COMPONENT_ROOT))
        .ty(TypeInfo::marker("RequireTag", VALIDATION_MARKER))
        .ty(TypeInfo::validator("TagValidator", "RequireTag", || TagValidator))
}

/// A `Door` component carrying `RequireTag`, searching children or not.
pub fn tag_universe(search_children: bool) -> Arc<TypeUniverse> {
    let universe = tag_builder()
        .ty(
            TypeInfo::new("Door")
                .extends(COMPONENT_ROOT)
                .marked(Marker::new("RequireTag").search_children(search_children)),
        )
        .build()
        .unwrap();
    Arc::new(universe)
}

/// Registry with the built-in family registered.
pub fn create_registry(universe: Arc<TypeUniverse>) -> MarkerRegistry {
    let mut registry = MarkerRegistry::new(universe);
    registry.register(VALIDATION_MARKER).unwrap();
    registry
}

pub fn create_runner(universe: Arc<TypeUniverse>, config: RunnerConfig) -> ValidationRunner {
    ValidationRunner::new(create_registry(universe), config)
}

#[derive(Debug, Clone, Default)]
pub struct MockNode {
    pub name: String,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    pub capabilities: Vec<Capability>,
}

/// Entity graph with directly wired nodes.
#[derive(Debug, Clone, Default)]
pub struct MockGraph {
    pub nodes: Vec<MockNode>,
    pub roots: Vec<EntityId>,
    by_name: HashMap<String, EntityId>,
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, name: &str, capabilities: &[&str]) -> EntityId {
        let id = EntityId(self.nodes.len());
        self.nodes.push(MockNode {
            name: name.to_string(),
            capabilities: capabilities.iter().map(|c| Capability::new(*c)).collect(),
            ..MockNode::default()
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn root(&mut self, name: &str, capabilities: &[&str]) -> EntityId {
        let id = self.node(name, capabilities);
        self.roots.push(id);
        id
    }

    /// Wire `child` under `parent` without any consistency checks.
    pub fn wire(&mut self, parent: EntityId, child: EntityId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn id(&self, name: &str) -> EntityId {
        self.by_name[name]
    }
}

impl EntityGraph for MockGraph {
    fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    fn contains(&self, id: EntityId) -> bool {
        id.0 < self.nodes.len()
    }

    fn name(&self, id: EntityId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.name.as_str())
    }

    fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    fn children(&self, id: EntityId) -> &[EntityId] {
        self.nodes.get(id.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn capabilities(&self, id: EntityId) -> &[Capability] {
        self.nodes
            .get(id.0)
            .map(|n| n.capabilities.as_slice())
            .unwrap_or(&[])
    }
}
