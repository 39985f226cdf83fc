//! scene-validator library
//!
//! Rule-based validation for hierarchical scene graphs. Client code marks
//! component types and their fields with declarative markers; the engine
//! discovers marked types, resolves each marker to its registered validator,
//! runs it against every matching capability in the graph, and aggregates
//! pass/fail results with severities.
//!
//! - [`types`]: the explicit type universe and the type discovery cache
//! - [`engine::registry`]: marker-to-validator bindings
//! - [`graph::hierarchy`]: required-capability search over parents and children
//! - [`severity`]: ordered severity scales and range queries
//! - [`engine::runner`]: discovery and dispatch
//! - [`engine::result`]: the result log
//!
//! # Example
//!
//! ```no_run
//! use scene_validator::{validate_document, SceneDocument, ValidatorConfig};
//!
//! let document = SceneDocument::from_path("level.json").expect("unreadable scene");
//! let report = validate_document(&ValidatorConfig::default(), &document).expect("bad setup");
//! println!("Failures: {}", report.log.summary().failed);
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod graph;
pub mod rules;
pub mod severity;
pub mod types;
pub mod version;

use std::sync::Arc;

// Re-exports for public API
pub use config::ValidatorConfig;
pub use document::SceneDocument;
pub use engine::registry::MarkerRegistry;
pub use engine::result::{Outcome, ResultLog, ResultSummary, ValidationResult};
pub use engine::runner::{RunnerConfig, Target, ValidationRunner};
pub use engine::validator::{Subject, ValidationContext, Validator, Verdict};
pub use error::{Result, RuleFault, ValidationError};
pub use graph::hierarchy::{HierarchyValidator, SearchScope};
pub use graph::{Capability, EntityGraph, EntityId, FieldValue, Scene};
pub use severity::{OrderedScale, Severity};
pub use types::{Marker, MarkerParams, TypeCache, TypeInfo, TypeName, TypeUniverse};

/// A validated document: the scene that was built and the results.
#[derive(Debug)]
pub struct DocumentReport {
    pub scene: Scene,
    pub log: ResultLog,
}

/// Validate a scene document with the built-in rules.
///
/// Builds the universe and scene from `document`, registers the built-in
/// marker family, discovers targets and runs them.
///
/// # Errors
///
/// Configuration errors in the document's type declarations, unresolvable
/// entity references, or an unknown root type. Rule failures are results,
/// not errors.
pub fn validate_document(config: &ValidatorConfig, document: &SceneDocument) -> Result<DocumentReport> {
    let universe = Arc::new(document.universe()?);
    let mut registry = MarkerRegistry::new(universe);
    registry.register(rules::VALIDATION_MARKER)?;

    let scene = document.scene()?;
    let mut runner = ValidationRunner::new(registry, config.runner_config())
        .with_project_paths(document.project_paths.iter().cloned());
    runner.discover(&scene)?;
    let log = runner.run_all(&scene);

    Ok(DocumentReport { scene, log })
}
