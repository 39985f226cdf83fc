//! Declarative markers attached to types and fields.

use serde::{Deserialize, Serialize};

use super::TypeName;
use crate::severity::Severity;

/// Configuration carried by a marker instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerParams {
    /// Capability types the rule looks for
    pub required: Vec<TypeName>,
    /// Extend the search to the entity's descendants
    pub search_children: bool,
    /// Extend the search to the entity's ancestors
    pub search_parents: bool,
    /// Project-relative paths for project-scope rules
    pub paths: Vec<String>,
    /// Overrides the runner's default failure severity
    pub severity: Option<Severity>,
    /// Replaces the validator's failure message
    pub message: Option<String>,
}

/// An immutable tagged value naming a validation intent.
///
/// `kind` is the marker's runtime type and the key used for validator lookup.
/// Serialized flat: `kind` next to the parameter keys. Unknown keys are
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MarkerRecord", into = "MarkerRecord")]
pub struct Marker {
    pub kind: TypeName,
    pub params: MarkerParams,
}

/// Flat wire form of [`Marker`].
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MarkerRecord {
    kind: TypeName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    required: Vec<TypeName>,
    #[serde(default)]
    search_children: bool,
    #[serde(default)]
    search_parents: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl From<MarkerRecord> for Marker {
    fn from(record: MarkerRecord) -> Self {
        Marker {
            kind: record.kind,
            params: MarkerParams {
                required: record.required,
                search_children: record.search_children,
                search_parents: record.search_parents,
                paths: record.paths,
                severity: record.severity,
                message: record.message,
            },
        }
    }
}

impl From<Marker> for MarkerRecord {
    fn from(marker: Marker) -> Self {
        let MarkerParams {
            required,
            search_children,
            search_parents,
            paths,
            severity,
            message,
        } = marker.params;
        MarkerRecord {
            kind: marker.kind,
            required,
            search_children,
            search_parents,
            paths,
            severity,
            message,
        }
    }
}

impl Marker {
    pub fn new(kind: impl Into<TypeName>) -> Self {
        Marker {
            kind: kind.into(),
            params: MarkerParams::default(),
        }
    }

    /// Symbolic name used for lookup and reporting.
    pub fn symbol(&self) -> &str {
        self.kind.as_str()
    }

    pub fn requiring<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.params.required = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn search_children(mut self, enabled: bool) -> Self {
        self.params.search_children = enabled;
        self
    }

    pub fn search_parents(mut self, enabled: bool) -> Self {
        self.params.search_parents = enabled;
        self
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.params.severity = Some(severity);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.params.message = Some(message.into());
        self
    }
}
