//! Validation runner.
//!
//! Discovers validation targets in an entity graph and dispatches each one
//! to the validator bound to its marker kind.
//!
//! # Graceful Degradation
//!
//! One bad target never aborts the pass:
//! - Unresolved marker: converted to a failed result at the highest severity
//! - Validator returns a [`RuleFault`](crate::error::RuleFault): failed result at the highest severity
//! - Validator panics: caught via `std::panic::catch_unwind`, same conversion
//! - Empty discovery: an empty [`ResultLog`]
//!
//! Every discovered target yields exactly one result, in discovery order,
//! whether the pass runs sequentially or in parallel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::registry::MarkerRegistry;
use super::result::{ResultLog, ValidationResult};
use super::validator::{Subject, ValidationContext, Verdict};
use crate::error::Result;
use crate::graph::{EntityGraph, Preorder};
use crate::rules::COMPONENT_ROOT;
use crate::severity::Severity;
use crate::types::{Constraints, Marker, TypeCache, TypeName, TypeUniverse};

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Base type of every capability that may carry markers
    pub component_root: TypeName,
    /// Base type of project-scope descriptors, checked once per pass
    pub project_root: Option<TypeName>,
    pub ignore_types: Vec<TypeName>,
    pub ignore_markers: Vec<TypeName>,
    /// Used when neither the validator nor the marker names a severity
    pub default_failure_severity: Severity,
    pub parallel: bool,
    pub max_parallel: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            component_root: TypeName::from(COMPONENT_ROOT),
            project_root: None,
            ignore_types: Vec::new(),
            ignore_markers: Vec::new(),
            default_failure_severity: Severity::LOWEST_FAILING,
            parallel: false,
            max_parallel: 4,
        }
    }
}

/// One marker occurrence to validate.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub subject: Subject,
    pub marker: Marker,
    /// Type that declared the marker; a base type when the marker is inherited
    pub declared_on: TypeName,
}

/// Discovers targets and runs their validators.
pub struct ValidationRunner {
    registry: MarkerRegistry,
    config: RunnerConfig,
    components: TypeCache,
    descriptors: TypeCache,
    project_paths: Vec<String>,
    targets: Vec<Target>,
}

impl ValidationRunner {
    /// Create a runner over a populated registry. Configured ignores are
    /// registered with the discovery caches immediately.
    pub fn new(registry: MarkerRegistry, config: RunnerConfig) -> Self {
        let universe = Arc::clone(registry.universe());
        let mut runner = ValidationRunner {
            registry,
            components: TypeCache::new(Arc::clone(&universe)),
            descriptors: TypeCache::new(universe),
            project_paths: Vec::new(),
            targets: Vec::new(),
            config,
        };
        for ty in runner.config.ignore_types.clone() {
            runner.ignore(ty);
        }
        for marker in runner.config.ignore_markers.clone() {
            runner.ignore_marker(marker);
        }
        runner
    }

    /// Project manifest entries handed to every validator.
    pub fn with_project_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn universe(&self) -> &TypeUniverse {
        self.registry.universe()
    }

    /// Exclude a type from discovery. Takes effect at the next [`discover`](Self::discover).
    pub fn ignore(&mut self, ty: impl Into<TypeName>) -> usize {
        let ty = ty.into();
        self.descriptors.ignore(ty.clone()) + self.components.ignore(ty)
    }

    /// Exclude every type carrying `marker`. Takes effect at the next [`discover`](Self::discover).
    pub fn ignore_marker(&mut self, marker: impl Into<TypeName>) -> usize {
        let marker = marker.into();
        self.descriptors.ignore_marker(marker.clone()) + self.components.ignore_marker(marker)
    }

    /// Find every target in `graph`, replacing the previous discovery result.
    ///
    /// Targets are ordered by graph pre-order, then capability order, then
    /// type-level markers before field markers. Project-scope descriptors
    /// follow the graph targets.
    ///
    /// On error the caches and targets of the previous discovery are kept.
    pub fn discover(&mut self, graph: &dyn EntityGraph) -> Result<&[Target]> {
        let mut components = self.components.clone();
        let mut descriptors = self.descriptors.clone();
        components.clear();
        descriptors.clear();

        for family in self.registry.families() {
            let carrying = Constraints::carrying(family);
            components.add_matching(&self.config.component_root, &carrying)?;
            if let Some(project_root) = &self.config.project_root {
                descriptors.add_matching(project_root, &carrying)?;
            }
        }
        self.components = components;
        self.descriptors = descriptors;

        let universe = Arc::clone(self.registry.universe());
        let mut targets = Vec::new();

        for entity in Preorder::new(graph, graph.roots()) {
            for (index, capability) in graph.capabilities(entity).iter().enumerate() {
                let ty = capability.type_name.as_str();
                if !self.components.contains(ty) {
                    continue;
                }

                for (declared_on, marker) in universe.effective_markers(ty) {
                    if self.registry.recognizes(&marker.kind) {
                        targets.push(Target {
                            subject: Subject::Capability {
                                entity,
                                capability: capability.type_name.clone(),
                                index,
                            },
                            marker: marker.clone(),
                            declared_on: declared_on.name.clone(),
                        });
                    }
                }

                for (declared_on, field) in universe.fields(ty) {
                    for marker in &field.markers {
                        if self.registry.recognizes(&marker.kind) {
                            targets.push(Target {
                                subject: Subject::Field {
                                    entity,
                                    capability: capability.type_name.clone(),
                                    index,
                                    field: field.name.clone(),
                                },
                                marker: marker.clone(),
                                declared_on: declared_on.name.clone(),
                            });
                        }
                    }
                }
            }
        }

        for descriptor in self.descriptors.iter() {
            for (declared_on, marker) in universe.effective_markers(descriptor.name.as_str()) {
                if self.registry.recognizes(&marker.kind) {
                    targets.push(Target {
                        subject: Subject::Descriptor(descriptor.name.clone()),
                        marker: marker.clone(),
                        declared_on: declared_on.name.clone(),
                    });
                }
            }
        }

        info!(
            targets = targets.len(),
            component_types = self.components.count(),
            descriptor_types = self.descriptors.count(),
            "discovery complete"
        );
        self.targets = targets;
        Ok(&self.targets)
    }

    /// The last discovery result.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Validate every discovered target against `graph`.
    pub fn run_all(&self, graph: &dyn EntityGraph) -> ResultLog {
        let start = Instant::now();

        let results = if self.config.parallel && self.targets.len() > 1 {
            self.run_parallel(graph)
        } else {
            self.run_sequential(graph)
        };

        let mut log = ResultLog::new();
        log.extend(results);
        log.set_duration(start.elapsed().as_millis() as u64);

        let summary = log.summary();
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            duration_ms = summary.total_duration_ms,
            "validation pass complete"
        );
        log
    }

    fn run_sequential(&self, graph: &dyn EntityGraph) -> Vec<ValidationResult> {
        self.targets
            .iter()
            .enumerate()
            .map(|(sequence, target)| self.execute_target(sequence, target, graph))
            .collect()
    }

    /// Split targets into contiguous chunks, one per worker, and restore
    /// discovery order afterwards.
    fn run_parallel(&self, graph: &dyn EntityGraph) -> Vec<ValidationResult> {
        let workers = self.config.max_parallel.clamp(1, self.targets.len());
        let chunk_len = self.targets.len().div_ceil(workers);
        debug!(workers, chunk_len, "running targets in parallel");

        let mut results: Vec<ValidationResult> = thread::scope(|s| {
            let handles: Vec<_> = self
                .targets
                .chunks(chunk_len)
                .enumerate()
                .map(|(i, chunk)| {
                    let offset = i * chunk_len;
                    s.spawn(move || {
                        chunk
                            .iter()
                            .enumerate()
                            .map(|(j, target)| self.execute_target(offset + j, target, graph))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|h| match h.join() {
                    Ok(batch) => Some(batch),
                    Err(_) => {
                        warn!("validation worker terminated abnormally");
                        None
                    }
                })
                .flatten()
                .collect()
        });

        results.sort_by_key(|r| r.sequence);
        results
    }

    fn execute_target(
        &self,
        sequence: usize,
        target: &Target,
        graph: &dyn EntityGraph,
    ) -> ValidationResult {
        let kind = &target.marker.kind;

        let binding = match self.registry.resolve_kind(kind) {
            Ok(binding) => binding,
            Err(err) => {
                warn!(marker = %kind, subject = %target.subject, "no validator bound");
                return ValidationResult::failed(
                    sequence,
                    target.subject.clone(),
                    Severity::highest(),
                    err.to_string(),
                    kind.clone(),
                    None,
                );
            }
        };

        let cx = ValidationContext {
            graph,
            subject: &target.subject,
            universe: self.registry.universe(),
            project_paths: &self.project_paths,
        };
        let validator_type = Some(binding.validator_type().clone());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            binding.validator().validate(&target.marker, &cx)
        }));

        match outcome {
            Ok(Ok(Verdict::Pass)) => ValidationResult::passed(
                sequence,
                target.subject.clone(),
                kind.clone(),
                validator_type,
            ),
            Ok(Ok(Verdict::Fail { message, severity })) => {
                let severity = severity
                    .or(target.marker.params.severity)
                    .unwrap_or(self.config.default_failure_severity);
                let message = target.marker.params.message.clone().unwrap_or(message);
                ValidationResult::failed(
                    sequence,
                    target.subject.clone(),
                    severity,
                    message,
                    kind.clone(),
                    validator_type,
                )
            }
            Ok(Err(fault)) => {
                warn!(marker = %kind, subject = %target.subject, %fault, "validator fault");
                ValidationResult::failed(
                    sequence,
                    target.subject.clone(),
                    Severity::highest(),
                    format!("validator fault: {}", fault),
                    kind.clone(),
                    validator_type,
                )
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(marker = %kind, subject = %target.subject, %message, "validator panicked");
                ValidationResult::failed(
                    sequence,
                    target.subject.clone(),
                    Severity::highest(),
                    format!("validator panicked: {}", message),
                    kind.clone(),
                    validator_type,
                )
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
