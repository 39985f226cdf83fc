//! Required-capability checks over an entity's hierarchy.
//!
//! Each required type is satisfied independently: by the entity itself, by
//! any node of its descendant subtree when children are searched, or by any
//! ancestor when parents are searched. Different required types may be found
//! on different nodes.
//!
//! One call visits each node at most once. A malformed graph with cycles is
//! walked to completion; revisits are skipped silently.

use std::collections::HashSet;

use super::{EntityGraph, EntityId};
use crate::types::{MarkerParams, TypeName};

/// Decides whether an attached capability counts as a required type.
pub trait CapabilityMatcher: Sync {
    fn matches(&self, actual: &TypeName, required: &TypeName) -> bool;
}

/// Matches on identical type names only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl CapabilityMatcher for ExactMatch {
    fn matches(&self, actual: &TypeName, required: &TypeName) -> bool {
        actual == required
    }
}

static EXACT: ExactMatch = ExactMatch;

/// Which parts of the hierarchy beyond the entity itself are searched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchScope {
    pub children: bool,
    pub parents: bool,
}

impl SearchScope {
    pub const SELF_ONLY: SearchScope = SearchScope {
        children: false,
        parents: false,
    };

    pub fn new(children: bool, parents: bool) -> Self {
        SearchScope { children, parents }
    }

    pub fn from_params(params: &MarkerParams) -> Self {
        SearchScope::new(params.search_children, params.search_parents)
    }

    /// Short human description, e.g. "self, children".
    pub fn describe(&self) -> String {
        let mut parts = vec!["self"];
        if self.children {
            parts.push("children");
        }
        if self.parents {
            parts.push("parents");
        }
        parts.join(", ")
    }
}

/// Checks required capabilities on an entity and, optionally, its relatives.
#[derive(Clone, Copy)]
pub struct HierarchyValidator<'m> {
    matcher: &'m dyn CapabilityMatcher,
}

impl HierarchyValidator<'static> {
    pub fn exact() -> Self {
        HierarchyValidator { matcher: &EXACT }
    }
}

impl<'m> HierarchyValidator<'m> {
    pub fn new(matcher: &'m dyn CapabilityMatcher) -> Self {
        HierarchyValidator { matcher }
    }

    /// True when every type in `required` is found within `scope`.
    pub fn satisfies<G: EntityGraph + ?Sized>(
        &self,
        graph: &G,
        entity: EntityId,
        required: &[TypeName],
        scope: SearchScope,
    ) -> bool {
        self.missing(graph, entity, required, scope).is_empty()
    }

    /// The required types not found within `scope`, in the order given.
    pub fn missing<G: EntityGraph + ?Sized>(
        &self,
        graph: &G,
        entity: EntityId,
        required: &[TypeName],
        scope: SearchScope,
    ) -> Vec<TypeName> {
        let mut pending: Vec<&TypeName> = Vec::with_capacity(required.len());
        for ty in required {
            if !pending.contains(&ty) {
                pending.push(ty);
            }
        }
        if pending.is_empty() {
            return Vec::new();
        }

        let mut visited = HashSet::new();
        visited.insert(entity);
        self.absorb(graph, entity, &mut pending);

        if scope.children && !pending.is_empty() {
            let mut stack: Vec<EntityId> = graph.children(entity).iter().rev().copied().collect();
            while let Some(id) = stack.pop() {
                if !visited.insert(id) {
                    continue;
                }
                self.absorb(graph, id, &mut pending);
                if pending.is_empty() {
                    break;
                }
                stack.extend(graph.children(id).iter().rev().copied());
            }
        }

        if scope.parents && !pending.is_empty() {
            // The walk stops when it comes back to a node it already passed.
            let mut walked = HashSet::new();
            walked.insert(entity);
            let mut current = graph.parent(entity);
            while let Some(id) = current {
                if !walked.insert(id) {
                    break;
                }
                if visited.insert(id) {
                    self.absorb(graph, id, &mut pending);
                    if pending.is_empty() {
                        break;
                    }
                }
                current = graph.parent(id);
            }
        }

        pending.into_iter().cloned().collect()
    }

    fn absorb<G: EntityGraph + ?Sized>(&self, graph: &G, id: EntityId, pending: &mut Vec<&TypeName>) {
        let capabilities = graph.capabilities(id);
        pending.retain(|required| {
            !capabilities
                .iter()
                .any(|c| self.matcher.matches(&c.type_name, required))
        });
    }
}
