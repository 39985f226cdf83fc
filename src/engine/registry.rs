//! Marker-to-validator registry.
//!
//! Registration scans the universe's validator types through a
//! [`TypeCache`] and binds each marker kind to exactly one validator
//! instance. A second validator type claiming an already bound marker kind
//! is rejected; the registry is left exactly as it was before the call.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::validator::Validator;
use crate::error::{Result, ValidationError};
use crate::types::{Constraints, Marker, TypeCache, TypeName, TypeUniverse, VALIDATOR_ROOT};

/// A marker kind bound to its validator.
pub struct Binding {
    validator_type: TypeName,
    marker: TypeName,
    default_marker: Marker,
    validator: Box<dyn Validator>,
}

impl Binding {
    /// The validator type that declared this binding.
    pub fn validator_type(&self) -> &TypeName {
        &self.validator_type
    }

    pub fn marker(&self) -> &TypeName {
        &self.marker
    }

    /// Parameterless marker instance. Used for symbol lookup only.
    pub fn default_marker(&self) -> &Marker {
        &self.default_marker
    }

    pub fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("validator_type", &self.validator_type)
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

/// Registry of marker bindings over one type universe.
#[derive(Debug)]
pub struct MarkerRegistry {
    universe: Arc<TypeUniverse>,
    bindings: Vec<Binding>,
    by_marker: HashMap<TypeName, usize>,
    families: Vec<TypeName>,
}

impl MarkerRegistry {
    pub fn new(universe: Arc<TypeUniverse>) -> Self {
        MarkerRegistry {
            universe,
            bindings: Vec::new(),
            by_marker: HashMap::new(),
            families: Vec::new(),
        }
    }

    pub fn universe(&self) -> &Arc<TypeUniverse> {
        &self.universe
    }

    /// Bind every validator whose target marker derives from `marker_base`.
    ///
    /// Returns the number of new bindings. Registering the same family twice
    /// adds nothing the second time.
    ///
    /// # Errors
    ///
    /// - `UnknownType` / `NotAMarker` if `marker_base` is not a marker type
    /// - `NotAMarker` if any validator binding targets a non-marker type
    /// - `DuplicateBinding` if two validator types target the same marker kind
    pub fn register(&mut self, marker_base: impl Into<TypeName>) -> Result<usize> {
        let base = marker_base.into();
        if !self.universe.contains(base.as_str()) {
            return Err(ValidationError::UnknownType(base));
        }
        if !self.universe.is_marker(base.as_str()) {
            return Err(ValidationError::NotAMarker(base));
        }

        let mut cache = TypeCache::new(Arc::clone(&self.universe));
        cache.add_matching(&TypeName::from(VALIDATOR_ROOT), &Constraints::any())?;

        let mut staged: Vec<Binding> = Vec::new();
        for info in cache.iter() {
            let Some(binding) = info.binding() else {
                continue;
            };
            let target = binding.target();
            if !self.universe.is_marker(target.as_str()) {
                return Err(ValidationError::NotAMarker(target.clone()));
            }
            if !self.universe.is_subtype(target.as_str(), base.as_str()) {
                continue;
            }

            if let Some(&i) = self.by_marker.get(target) {
                let existing = &self.bindings[i].validator_type;
                if *existing == info.name {
                    continue;
                }
                return Err(ValidationError::DuplicateBinding {
                    marker: target.clone(),
                    existing: existing.clone(),
                    duplicate: info.name.clone(),
                });
            }
            if let Some(prior) = staged.iter().find(|b| &b.marker == target) {
                return Err(ValidationError::DuplicateBinding {
                    marker: target.clone(),
                    existing: prior.validator_type.clone(),
                    duplicate: info.name.clone(),
                });
            }

            debug!(marker = %target, validator = %info.name, "binding validator");
            staged.push(Binding {
                validator_type: info.name.clone(),
                marker: target.clone(),
                default_marker: Marker::new(target.clone()),
                validator: binding.instantiate(),
            });
        }

        let added = staged.len();
        for binding in staged {
            self.by_marker.insert(binding.marker.clone(), self.bindings.len());
            self.bindings.push(binding);
        }
        if !self.families.contains(&base) {
            self.families.push(base.clone());
        }

        info!(family = %base, added, total = self.bindings.len(), "registered marker family");
        Ok(added)
    }

    /// The validator bound to `marker`'s runtime kind.
    pub fn resolve(&self, marker: &Marker) -> Result<&dyn Validator> {
        self.resolve_kind(&marker.kind).map(Binding::validator)
    }

    pub fn resolve_kind(&self, kind: &TypeName) -> Result<&Binding> {
        self.by_marker
            .get(kind)
            .map(|&i| &self.bindings[i])
            .ok_or_else(|| ValidationError::NotFound(kind.clone()))
    }

    /// Look a binding up by the marker's symbolic name.
    pub fn resolve_symbol(&self, symbol: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.default_marker.symbol() == symbol)
    }

    /// Whether `kind` belongs to a registered marker family.
    pub fn recognizes(&self, kind: &TypeName) -> bool {
        self.families
            .iter()
            .any(|family| self.universe.is_subtype(kind.as_str(), family.as_str()))
    }

    pub fn families(&self) -> &[TypeName] {
        &self.families
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
