//! Entity graph access.
//!
//! The engine reads entities through the [`EntityGraph`] trait and never
//! mutates them. [`Scene`] is an arena-backed implementation addressed by
//! [`EntityId`]; its wiring is not guaranteed acyclic, so every traversal in
//! this crate tracks visited nodes.

pub mod hierarchy;

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::types::TypeName;

/// Index of an entity in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value held by a capability field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
    Reference(EntityId),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// A typed unit attached to an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Capability {
    pub type_name: TypeName,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Capability {
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Capability {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Read-only navigation over an externally owned entity forest.
///
/// Unknown ids yield `None` or empty slices.
pub trait EntityGraph: Send + Sync {
    fn roots(&self) -> &[EntityId];
    fn contains(&self, id: EntityId) -> bool;
    fn name(&self, id: EntityId) -> Option<&str>;
    fn parent(&self, id: EntityId) -> Option<EntityId>;
    fn children(&self, id: EntityId) -> &[EntityId];
    fn capabilities(&self, id: EntityId) -> &[Capability];
}

/// Pre-order walk from a set of start nodes, skipping nodes already visited.
pub struct Preorder<'g, G: EntityGraph + ?Sized> {
    graph: &'g G,
    stack: Vec<EntityId>,
    visited: HashSet<EntityId>,
}

impl<'g, G: EntityGraph + ?Sized> Preorder<'g, G> {
    pub fn new(graph: &'g G, starts: &[EntityId]) -> Self {
        Preorder {
            graph,
            stack: starts.iter().rev().copied().collect(),
            visited: HashSet::new(),
        }
    }
}

impl<G: EntityGraph + ?Sized> Iterator for Preorder<'_, G> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        while let Some(id) = self.stack.pop() {
            if !self.visited.insert(id) {
                continue;
            }
            self.stack.extend(self.graph.children(id).iter().rev().copied());
            return Some(id);
        }
        None
    }
}

/// Slash-separated names from the root down to `id`.
pub fn entity_path<G: EntityGraph + ?Sized>(graph: &G, id: EntityId) -> String {
    let mut segments = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(id);
    while let Some(node) = current {
        if !seen.insert(node) {
            break;
        }
        segments.push(graph.name(node).unwrap_or("<unknown>"));
        current = graph.parent(node);
    }
    segments.reverse();
    segments.join("/")
}

#[derive(Debug, Clone, Default)]
struct Entity {
    name: String,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    capabilities: Vec<Capability>,
}

/// Arena-backed entity forest.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entities: Vec<Entity>,
    roots: Vec<EntityId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn add_root(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.push(name.into(), None);
        self.roots.push(id);
        id
    }

    /// Add an entity under `parent`. An unknown parent makes it a root.
    pub fn add_child(&mut self, parent: EntityId, name: impl Into<String>) -> EntityId {
        if !self.contains(parent) {
            return self.add_root(name);
        }
        let id = self.push(name.into(), Some(parent));
        self.entities[parent.0].children.push(id);
        id
    }

    /// Attach a capability. Returns false when `id` is unknown.
    pub fn attach(&mut self, id: EntityId, capability: Capability) -> bool {
        match self.entities.get_mut(id.0) {
            Some(entity) => {
                entity.capabilities.push(capability);
                true
            }
            None => false,
        }
    }

    /// Raw rewiring: append `child` to `parent`'s children and point `child`
    /// back at `parent`. No cycle check is made.
    pub fn link(&mut self, parent: EntityId, child: EntityId) -> bool {
        if !self.contains(parent) || !self.contains(child) {
            return false;
        }
        self.entities[parent.0].children.push(child);
        self.entities[child.0].parent = Some(parent);
        true
    }

    /// First entity with the given name, in pre-order.
    pub fn find(&self, name: &str) -> Option<EntityId> {
        Preorder::new(self, &self.roots).find(|&id| self.name(id) == Some(name))
    }

    fn push(&mut self, name: String, parent: Option<EntityId>) -> EntityId {
        let id = EntityId(self.entities.len());
        self.entities.push(Entity {
            name,
            parent,
            ..Entity::default()
        });
        id
    }
}

impl EntityGraph for Scene {
    fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    fn contains(&self, id: EntityId) -> bool {
        id.0 < self.entities.len()
    }

    fn name(&self, id: EntityId) -> Option<&str> {
        self.entities.get(id.0).map(|e| e.name.as_str())
    }

    fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(id.0).and_then(|e| e.parent)
    }

    fn children(&self, id: EntityId) -> &[EntityId] {
        self.entities
            .get(id.0)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    fn capabilities(&self, id: EntityId) -> &[Capability] {
        self.entities
            .get(id.0)
            .map(|e| e.capabilities.as_slice())
            .unwrap_or(&[])
    }
}
