//! Output formatting for scene-validator.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: color disabled via NO_COLOR or --no-color
//! - Empty logs: produce a header and a zero summary
//! - Dangling entity ids in subjects: rendered as `<unknown>` path segments
//!
//! No function in this module will panic.

use crate::engine::result::{ResultLog, ValidationResult};
use crate::graph::EntityGraph;
use crate::rules::RuleInfo;
use crate::severity::Severity;

const RULE: &str =
    "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a result log; `source` names the validated document.
    fn format(&self, source: &str, log: &ResultLog, graph: &dyn EntityGraph) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
    min_severity: Severity,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
            min_severity: Severity::Info,
        }
    }

    /// Hide results below `min`.
    pub fn with_min_severity(mut self, min: Severity) -> Self {
        self.min_severity = min;
        self
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.colorize(text, "32")
    }

    fn yellow(&self, text: &str) -> String {
        self.colorize(text, "33")
    }

    fn red(&self, text: &str) -> String {
        self.colorize(text, "31")
    }

    fn gray(&self, text: &str) -> String {
        self.colorize(text, "90")
    }

    fn status(&self, result: &ValidationResult) -> String {
        if !result.is_failure() {
            return self.green("[PASS]");
        }
        match result.severity {
            Severity::Error => self.red("[ERROR]"),
            Severity::Warning => self.yellow("[WARN]"),
            Severity::Info => self.gray("[INFO]"),
        }
    }

    fn shown(&self, result: &ValidationResult) -> bool {
        if result.severity < self.min_severity {
            return false;
        }
        if self.quiet && !result.is_failure() {
            return false;
        }
        self.verbose || result.is_failure()
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, source: &str, log: &ResultLog, graph: &dyn EntityGraph) -> String {
        let mut output = String::new();

        if !self.quiet {
            output.push_str(RULE);
            output.push('\n');
            output.push_str("scene-validator report\n");
            output.push_str(&format!("Scene: {}\n", source));
            output.push_str(RULE);
            output.push_str("\n\n");
        }

        for result in log.query(self.min_severity, Severity::highest()) {
            if !self.shown(result) {
                continue;
            }
            output.push_str(&format!(
                "  {} {}: {}",
                self.status(result),
                result.subject.describe(graph),
                result.message
            ));
            if self.verbose {
                let origin = result
                    .validator
                    .as_ref()
                    .map(|v| v.as_str())
                    .unwrap_or("unbound");
                output.push_str(&self.gray(&format!(" ({} via {})", result.marker, origin)));
            }
            output.push('\n');
        }

        let summary = log.summary();
        let failures_shown = log.failures().any(|r| self.shown(r));
        if failures_shown || self.verbose {
            output.push('\n');
        }

        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} checked, {} passed, {} warnings, {} errors\n",
            summary.total, summary.passed, summary.warnings, summary.errors
        ));
        output.push_str(&format!(
            "Total time: {:.1}s\n",
            summary.total_duration_ms as f64 / 1000.0
        ));

        let code = exit_code(log);
        let exit_desc = match code {
            1 => "errors detected",
            2 => "warnings detected",
            _ => "all checks passed",
        };
        output.push_str(&format!("Exit code: {} ({})\n", code, exit_desc));
        output.push_str(RULE);

        output
    }
}

/// Exit code for a finished pass: 0 clean, 1 errors, 2 warnings only.
pub fn exit_code(log: &ResultLog) -> u8 {
    match log.highest_severity() {
        Some(Severity::Error) => 1,
        Some(Severity::Warning) => 2,
        _ => 0,
    }
}

/// Listing of the built-in rules for the `rules` command.
pub fn format_rules(rules: &[RuleInfo]) -> String {
    let mut output = String::from("Built-in rules:\n\n");
    let width = rules.iter().map(|r| r.marker.len()).max().unwrap_or(0);
    for rule in rules {
        output.push_str(&format!(
            "  {:<width$}  [{}] {}\n",
            rule.marker,
            rule.placement,
            rule.description,
            width = width
        ));
    }
    output
}

/// Whether color should be used, honoring NO_COLOR.
pub fn use_color(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none()
}
