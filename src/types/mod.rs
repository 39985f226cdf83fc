//! The candidate type universe.
//!
//! Types are registered explicitly through [`TypeUniverseBuilder`] instead of
//! being found by runtime introspection. A type may extend one base type,
//! carry markers at type level or on its fields, and, for validator types,
//! bind itself to the marker kind it checks.
//!
//! Two roots always exist: [`MARKER_ROOT`], the ancestor of every marker kind,
//! and [`VALIDATOR_ROOT`], the ancestor of every validator type.

pub mod cache;
pub mod marker;

pub use cache::{Constraints, TypeCache};
pub use marker::{Marker, MarkerParams};

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::engine::validator::Validator;
use crate::error::{Result, ValidationError};
use crate::graph::hierarchy::CapabilityMatcher;

/// Root of every marker kind.
pub const MARKER_ROOT: &str = "Marker";

/// Root of every validator type.
pub const VALIDATOR_ROOT: &str = "Validator";

/// Symbolic type identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        TypeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        TypeName(name)
    }
}

impl From<&TypeName> for TypeName {
    fn from(name: &TypeName) -> Self {
        name.clone()
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Builds a fresh validator instance for a binding.
pub type ValidatorFactory = Arc<dyn Fn() -> Box<dyn Validator> + Send + Sync>;

/// Declares which marker kind a validator type checks.
#[derive(Clone)]
pub struct ValidatorBinding {
    target: TypeName,
    factory: ValidatorFactory,
}

impl ValidatorBinding {
    pub fn new<F, V>(target: impl Into<TypeName>, factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Validator + 'static,
    {
        ValidatorBinding {
            target: target.into(),
            factory: Arc::new(move || Box::new(factory()) as Box<dyn Validator>),
        }
    }

    /// Marker kind this binding targets.
    pub fn target(&self) -> &TypeName {
        &self.target
    }

    pub fn instantiate(&self) -> Box<dyn Validator> {
        (self.factory)()
    }
}

impl fmt::Debug for ValidatorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBinding")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// A field declared on a type, with the markers attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>) -> Self {
        FieldInfo {
            name: name.into(),
            markers: Vec::new(),
        }
    }

    pub fn marked(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }
}

/// A registered type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: TypeName,
    pub base: Option<TypeName>,
    pub markers: Vec<Marker>,
    pub fields: Vec<FieldInfo>,
    binding: Option<ValidatorBinding>,
}

impl TypeInfo {
    pub fn new(name: impl Into<TypeName>) -> Self {
        TypeInfo {
            name: name.into(),
            base: None,
            markers: Vec::new(),
            fields: Vec::new(),
            binding: None,
        }
    }

    /// A marker kind deriving from `base`.
    pub fn marker(name: impl Into<TypeName>, base: impl Into<TypeName>) -> Self {
        TypeInfo::new(name).extends(base)
    }

    /// A validator type checking markers of kind `target`.
    pub fn validator<F, V>(name: impl Into<TypeName>, target: impl Into<TypeName>, factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Validator + 'static,
    {
        let mut info = TypeInfo::new(name).extends(VALIDATOR_ROOT);
        info.binding = Some(ValidatorBinding::new(target, factory));
        info
    }

    pub fn extends(mut self, base: impl Into<TypeName>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn marked(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn binding(&self) -> Option<&ValidatorBinding> {
        self.binding.as_ref()
    }
}

/// Immutable, declaration-ordered set of candidate types.
#[derive(Debug, Clone)]
pub struct TypeUniverse {
    types: Vec<TypeInfo>,
    index: HashMap<TypeName, usize>,
}

impl TypeUniverse {
    pub fn builder() -> TypeUniverseBuilder {
        TypeUniverseBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeInfo> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// `name` followed by each of its base types, nearest first.
    pub fn ancestry<'u>(&'u self, name: &str) -> impl Iterator<Item = &'u TypeInfo> + 'u {
        let mut next = self.get(name);
        let mut remaining = self.types.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let current = next?;
            next = current.base.as_ref().and_then(|b| self.get(b.as_str()));
            Some(current)
        })
    }

    /// Whether `name` is `root` or derives from it.
    pub fn is_subtype(&self, name: &str, root: &str) -> bool {
        if name == root {
            return true;
        }
        self.ancestry(name).any(|info| info.name == root)
    }

    pub fn is_marker(&self, name: &str) -> bool {
        self.contains(name) && self.is_subtype(name, MARKER_ROOT)
    }

    /// Type-level markers in effect for `name`, own markers first, then those
    /// inherited from base types. Each marker is paired with its declaring type.
    pub fn effective_markers<'u>(&'u self, name: &str) -> Vec<(&'u TypeInfo, &'u Marker)> {
        self.ancestry(name)
            .flat_map(|info| info.markers.iter().map(move |m| (info, m)))
            .collect()
    }

    /// Fields of `name` including inherited ones, each paired with its declaring type.
    pub fn fields<'u>(&'u self, name: &str) -> Vec<(&'u TypeInfo, &'u FieldInfo)> {
        self.ancestry(name)
            .flat_map(|info| info.fields.iter().map(move |f| (info, f)))
            .collect()
    }

    /// Whether `name` carries a marker of kind `marker` (or a subtype of it),
    /// at type level or on any field.
    pub fn carries_marker(&self, name: &str, marker: &str) -> bool {
        self.ancestry(name).any(|info| {
            info.markers
                .iter()
                .chain(info.fields.iter().flat_map(|f| f.markers.iter()))
                .any(|m| self.is_subtype(m.kind.as_str(), marker))
        })
    }
}

impl CapabilityMatcher for TypeUniverse {
    fn matches(&self, actual: &TypeName, required: &TypeName) -> bool {
        self.is_subtype(actual.as_str(), required.as_str())
    }
}

/// Collects type declarations and validates them into a [`TypeUniverse`].
#[derive(Debug)]
pub struct TypeUniverseBuilder {
    types: Vec<TypeInfo>,
}

impl TypeUniverseBuilder {
    pub fn new() -> Self {
        TypeUniverseBuilder {
            types: vec![TypeInfo::new(MARKER_ROOT), TypeInfo::new(VALIDATOR_ROOT)],
        }
    }

    pub fn ty(mut self, info: TypeInfo) -> Self {
        self.types.push(info);
        self
    }

    pub fn types<I: IntoIterator<Item = TypeInfo>>(mut self, infos: I) -> Self {
        self.types.extend(infos);
        self
    }

    /// Validate and freeze the declarations.
    ///
    /// Fails on duplicate names, unknown base or marker types, cyclic base
    /// chains, and markers whose kind is not a marker type.
    pub fn build(self) -> Result<TypeUniverse> {
        let mut index = HashMap::with_capacity(self.types.len());
        for (i, info) in self.types.iter().enumerate() {
            if index.insert(info.name.clone(), i).is_some() {
                return Err(ValidationError::DuplicateType(info.name.clone()));
            }
        }

        for info in &self.types {
            if let Some(base) = &info.base {
                if !index.contains_key(base) {
                    return Err(ValidationError::UnknownType(base.clone()));
                }
            }
        }

        for info in &self.types {
            let mut seen = HashSet::new();
            let mut current = Some(&info.name);
            while let Some(name) = current {
                if !seen.insert(name) {
                    return Err(ValidationError::CyclicBase(info.name.clone()));
                }
                current = self.types[index[name]].base.as_ref();
            }
        }

        let universe = TypeUniverse {
            types: self.types,
            index,
        };

        for info in &universe.types {
            let markers = info
                .markers
                .iter()
                .chain(info.fields.iter().flat_map(|f| f.markers.iter()));
            for marker in markers {
                if !universe.contains(marker.kind.as_str()) {
                    return Err(ValidationError::UnknownType(marker.kind.clone()));
                }
                if !universe.is_marker(marker.kind.as_str()) {
                    return Err(ValidationError::NotAMarker(marker.kind.clone()));
                }
            }
        }

        Ok(universe)
    }
}

impl Default for TypeUniverseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
