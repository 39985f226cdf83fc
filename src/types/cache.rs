//! Type discovery cache.
//!
//! Scans a [`TypeUniverse`] for types under a root, filtered by marker
//! inclusion and exclusion, and keeps the matches in discovery order.
//!
//! # Semantics
//!
//! - Matches are appended in universe declaration order; the cache never re-sorts.
//! - A type already cached is not appended again.
//! - Scans are additive until [`TypeCache::clear`].
//! - [`TypeCache::ignore`] and [`TypeCache::ignore_marker`] apply to later scans
//!   and also drop cached entries that now violate them.
//! - An ignored type stays excluded even when it carries the inclusion marker.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::{TypeInfo, TypeName, TypeUniverse};
use crate::error::{Result, ValidationError};

/// Marker filters applied by [`TypeCache::add_matching`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    /// Only accept types carrying a marker of this kind
    pub include_marker: Option<TypeName>,
    /// Reject types carrying a marker of any of these kinds
    pub exclude_markers: Vec<TypeName>,
}

impl Constraints {
    /// No marker filtering.
    pub fn any() -> Self {
        Constraints::default()
    }

    pub fn carrying(marker: impl Into<TypeName>) -> Self {
        Constraints {
            include_marker: Some(marker.into()),
            exclude_markers: Vec::new(),
        }
    }

    pub fn excluding(mut self, marker: impl Into<TypeName>) -> Self {
        self.exclude_markers.push(marker.into());
        self
    }
}

/// Ordered, duplicate-free set of discovered types.
#[derive(Debug, Clone)]
pub struct TypeCache {
    universe: Arc<TypeUniverse>,
    types: Vec<TypeName>,
    ignored_types: HashSet<TypeName>,
    ignored_markers: Vec<TypeName>,
}

impl TypeCache {
    pub fn new(universe: Arc<TypeUniverse>) -> Self {
        TypeCache {
            universe,
            types: Vec::new(),
            ignored_types: HashSet::new(),
            ignored_markers: Vec::new(),
        }
    }

    pub fn universe(&self) -> &Arc<TypeUniverse> {
        &self.universe
    }

    /// Append every type under `root` that satisfies `constraints` and the
    /// registered exclusions. Returns the number of newly cached types.
    pub fn add_matching(&mut self, root: &TypeName, constraints: &Constraints) -> Result<usize> {
        if !self.universe.contains(root.as_str()) {
            return Err(ValidationError::UnknownType(root.clone()));
        }

        let universe = Arc::clone(&self.universe);
        let mut added = 0;

        for info in universe.iter() {
            if !universe.is_subtype(info.name.as_str(), root.as_str()) {
                continue;
            }
            if self.is_excluded(info) {
                continue;
            }
            let violates_exclusion = constraints
                .exclude_markers
                .iter()
                .any(|m| universe.carries_marker(info.name.as_str(), m.as_str()));
            if violates_exclusion {
                continue;
            }
            if let Some(include) = &constraints.include_marker {
                if !universe.carries_marker(info.name.as_str(), include.as_str()) {
                    continue;
                }
            }
            if self.types.contains(&info.name) {
                continue;
            }
            self.types.push(info.name.clone());
            added += 1;
        }

        debug!(root = %root, added, cached = self.types.len(), "type discovery pass");
        Ok(added)
    }

    /// Exclude `ty` from this and every later scan. Returns the number of
    /// cached entries dropped.
    pub fn ignore(&mut self, ty: impl Into<TypeName>) -> usize {
        let ty = ty.into();
        let before = self.types.len();
        self.types.retain(|cached| *cached != ty);
        self.ignored_types.insert(ty);
        before - self.types.len()
    }

    /// Exclude every type carrying a marker of kind `marker`. Returns the
    /// number of cached entries dropped.
    pub fn ignore_marker(&mut self, marker: impl Into<TypeName>) -> usize {
        let marker = marker.into();
        let universe = Arc::clone(&self.universe);
        let before = self.types.len();
        self.types
            .retain(|cached| !universe.carries_marker(cached.as_str(), marker.as_str()));
        if !self.ignored_markers.contains(&marker) {
            self.ignored_markers.push(marker);
        }
        before - self.types.len()
    }

    fn is_excluded(&self, info: &TypeInfo) -> bool {
        self.ignored_types.contains(&info.name)
            || self
                .ignored_markers
                .iter()
                .any(|m| self.universe.carries_marker(info.name.as_str(), m.as_str()))
    }

    pub fn count(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&TypeInfo> {
        let name = self.types.get(index).ok_or(ValidationError::IndexOutOfRange {
            index,
            count: self.types.len(),
        })?;
        self.universe
            .get(name.as_str())
            .ok_or_else(|| ValidationError::UnknownType(name.clone()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.iter().any(|t| t == name)
    }

    pub fn names(&self) -> &[TypeName] {
        &self.types
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> + '_ {
        self.types
            .iter()
            .filter_map(move |name| self.universe.get(name.as_str()))
    }

    /// Drop cached types. Exclusions stay registered.
    pub fn clear(&mut self) {
        self.types.clear();
    }

    /// Drop cached types and every registered exclusion.
    pub fn reset(&mut self) {
        self.types.clear();
        self.ignored_types.clear();
        self.ignored_markers.clear();
    }
}
