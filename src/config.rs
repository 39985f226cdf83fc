//! Validator configuration.
//!
//! Defaults, overridden by environment variables, overridden by command
//! line arguments:
//!
//! - `SCENE_VALIDATOR_MIN_SEVERITY`: lowest severity reported (default `info`)
//! - `SCENE_VALIDATOR_PARALLEL`: `1`/`true` to run validators on worker threads
//! - `SCENE_VALIDATOR_MAX_PARALLEL`: worker thread count (default 4)

use thiserror::Error;

use crate::cli::args::CheckArgs;
use crate::engine::runner::RunnerConfig;
use crate::rules::{COMPONENT_ROOT, IGNORE_VALIDATION, PROJECT_ROOT};
use crate::severity::Severity;
use crate::types::TypeName;

pub const ENV_MIN_SEVERITY: &str = "SCENE_VALIDATOR_MIN_SEVERITY";
pub const ENV_PARALLEL: &str = "SCENE_VALIDATOR_PARALLEL";
pub const ENV_MAX_PARALLEL: &str = "SCENE_VALIDATOR_MAX_PARALLEL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Validator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Lowest severity shown in reports
    pub min_severity: Severity,
    pub parallel: bool,
    pub max_parallel: usize,
    pub ignore_types: Vec<String>,
    pub ignore_markers: Vec<String>,
    pub default_failure_severity: Severity,
    pub component_root: String,
    pub project_root: Option<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            min_severity: Severity::Info,
            parallel: false,
            max_parallel: 4,
            ignore_types: Vec::new(),
            ignore_markers: vec![IGNORE_VALIDATION.to_string()],
            default_failure_severity: Severity::LOWEST_FAILING,
            component_root: COMPONENT_ROOT.to_string(),
            project_root: Some(PROJECT_ROOT.to_string()),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ValidatorConfig::default();

        if let Some(value) = lookup(ENV_MIN_SEVERITY) {
            config.min_severity = value.parse().map_err(|reason| ConfigError::Invalid {
                var: ENV_MIN_SEVERITY,
                value: value.clone(),
                reason,
            })?;
        }

        if let Some(value) = lookup(ENV_PARALLEL) {
            config.parallel = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_PARALLEL,
                        value,
                        reason: "expected true or false".to_string(),
                    })
                }
            };
        }

        if let Some(value) = lookup(ENV_MAX_PARALLEL) {
            config.max_parallel = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_MAX_PARALLEL,
                        value,
                        reason: "expected a positive integer".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }

    /// Create configuration from `check` arguments on top of the defaults.
    pub fn from_args(args: &CheckArgs) -> Self {
        ValidatorConfig::default().with_args(args)
    }

    /// Apply `check` arguments over this configuration.
    pub fn with_args(mut self, args: &CheckArgs) -> Self {
        if let Some(min) = args.min_severity {
            self.min_severity = min;
        }
        if args.parallel {
            self.parallel = true;
        }
        if let Some(n) = args.max_parallel {
            self.max_parallel = n.max(1);
        }
        self.ignore_types.extend(args.ignore_types.iter().cloned());
        self.ignore_markers.extend(args.ignore_markers.iter().cloned());
        self
    }

    /// Lower to the runner's configuration.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            component_root: TypeName::from(self.component_root.as_str()),
            project_root: self.project_root.as_deref().map(TypeName::from),
            ignore_types: self.ignore_types.iter().map(|t| TypeName::new(t.as_str())).collect(),
            ignore_markers: self.ignore_markers.iter().map(|m| TypeName::new(m.as_str())).collect(),
            default_failure_severity: self.default_failure_severity,
            parallel: self.parallel,
            max_parallel: self.max_parallel,
        }
    }
}
