//! JSON scene documents.
//!
//! A document declares client types (with their markers), a nested entity
//! forest, and the project manifest:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Door", "base": "Component",
//!       "markers": [{ "kind": "RequireCapability", "required": ["Collider"] }],
//!       "fields": [{ "name": "hinge", "markers": [{ "kind": "NotNull" }] }] }
//!   ],
//!   "entities": [
//!     { "name": "Level", "children": [
//!       { "name": "Door", "components": [{ "type": "Door", "fields": { "hinge": { "ref": "Level" } } }] }
//!     ] }
//!   ],
//!   "project_paths": ["Scenes/Main.scene"]
//! }
//! ```
//!
//! Field values map onto [`FieldValue`]: `null`, booleans, integers, floats,
//! strings and arrays directly; `{"ref": "Name"}` resolves to the first entity
//! with that name in pre-order, `{"ref": 3}` to a raw entity id.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::graph::{Capability, EntityId, FieldValue, Scene};
use crate::rules;
use crate::types::{FieldInfo, Marker, TypeInfo, TypeName, TypeUniverse};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDocument {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub entities: Vec<EntityDecl>,
    #[serde(default)]
    pub project_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: TypeName,
    #[serde(default)]
    pub base: Option<TypeName>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDecl {
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentDecl>,
    #[serde(default)]
    pub children: Vec<EntityDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDecl {
    #[serde(rename = "type")]
    pub type_name: TypeName,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl TypeDecl {
    fn to_info(&self) -> TypeInfo {
        let mut info = TypeInfo::new(self.name.clone());
        if let Some(base) = &self.base {
            info = info.extends(base.clone());
        }
        for marker in &self.markers {
            info = info.marked(marker.clone());
        }
        for field in &self.fields {
            let mut decl = FieldInfo::new(field.name.clone());
            for marker in &field.markers {
                decl = decl.marked(marker.clone());
            }
            info = info.field(decl);
        }
        info
    }
}

impl SceneDocument {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ValidationError::Io {
            context: format!("reading {}", path.display()),
            source,
        })?;
        Self::from_str(&json)
    }

    /// The built-in types plus this document's declarations.
    pub fn universe(&self) -> Result<TypeUniverse> {
        rules::install(TypeUniverse::builder())
            .types(self.types.iter().map(TypeDecl::to_info))
            .build()
    }

    /// Build the entity forest. Entity references are resolved by name
    /// after every entity exists, so forward references work.
    ///
    /// Every component type must be a built-in or declared in `types`.
    pub fn scene(&self) -> Result<Scene> {
        let builtins = rules::builtin_types();
        let declared: HashSet<&str> = builtins
            .iter()
            .map(|t| t.name.as_str())
            .chain(self.types.iter().map(|t| t.name.as_str()))
            .collect();

        let mut scene = Scene::new();
        let mut pending: Vec<(EntityId, &EntityDecl)> = Vec::new();

        let mut stack: Vec<(Option<EntityId>, &EntityDecl)> =
            self.entities.iter().rev().map(|e| (None, e)).collect();
        while let Some((parent, decl)) = stack.pop() {
            let id = match parent {
                Some(parent) => scene.add_child(parent, decl.name.clone()),
                None => scene.add_root(decl.name.clone()),
            };
            pending.push((id, decl));
            stack.extend(decl.children.iter().rev().map(|c| (Some(id), c)));
        }

        let mut by_name: HashMap<&str, EntityId> = HashMap::new();
        for (id, decl) in &pending {
            by_name.entry(decl.name.as_str()).or_insert(*id);
        }

        for (id, decl) in &pending {
            for component in &decl.components {
                if !declared.contains(component.type_name.as_str()) {
                    return Err(ValidationError::Document(format!(
                        "component type '{}' on '{}' is not declared",
                        component.type_name, decl.name
                    )));
                }
                let mut capability = Capability::new(component.type_name.clone());
                for (name, value) in &component.fields {
                    let value = convert_value(value, &by_name).map_err(|reason| {
                        ValidationError::Document(format!(
                            "{}.{} on '{}': {}",
                            component.type_name, name, decl.name, reason
                        ))
                    })?;
                    capability = capability.with_field(name.clone(), value);
                }
                scene.attach(*id, capability);
            }
        }

        Ok(scene)
    }
}

fn convert_value(
    value: &Value,
    by_name: &HashMap<&str, EntityId>,
) -> std::result::Result<FieldValue, String> {
    Ok(match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64().ok_or("number out of range")?),
        },
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Array(items) => FieldValue::List(
            items
                .iter()
                .map(|item| convert_value(item, by_name))
                .collect::<std::result::Result<_, _>>()?,
        ),
        Value::Object(map) => match (map.len(), map.get("ref")) {
            (1, Some(Value::String(name))) => {
                let id = by_name
                    .get(name.as_str())
                    .ok_or_else(|| format!("unknown entity '{}'", name))?;
                FieldValue::Reference(*id)
            }
            (1, Some(Value::Number(n))) => {
                let index = n.as_u64().ok_or("entity id must be a non-negative integer")?;
                FieldValue::Reference(EntityId(index as usize))
            }
            _ => return Err("objects must have the form {\"ref\": <name or id>}".to_string()),
        },
    })
}
