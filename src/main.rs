//! scene-validator CLI entry point
//!
//! Validates scene documents against declarative marker rules.
//!
//! Exit codes: 0 all checks passed, 1 errors, 2 warnings only, 3 runtime error.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scene_validator::cli::args::{Args, CheckArgs, Command};
use scene_validator::cli::output::{exit_code, format_rules, use_color, OutputFormatter, TerminalFormatter};
use scene_validator::rules::builtin_rules;
use scene_validator::version::get_build_info;
use scene_validator::{validate_document, SceneDocument, ValidatorConfig};

const RUNTIME_ERROR: u8 = 3;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(RUNTIME_ERROR)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.verbose);

    match &args.command {
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
        Command::Rules => {
            print!("{}", format_rules(&builtin_rules()));
            ExitCode::SUCCESS
        }
        Command::Check(check) => run_check(&args, check),
    }
}

/// Log to stderr; `RUST_LOG` wins, else `warn`, or `debug` with --verbose.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_check(args: &Args, check: &CheckArgs) -> ExitCode {
    let config = match ValidatorConfig::from_env() {
        Ok(config) => config.with_args(check),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(RUNTIME_ERROR);
        }
    };

    let document = match SceneDocument::from_path(&check.scene) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(RUNTIME_ERROR);
        }
    };

    let report = match validate_document(&config, &document) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error running validation: {}", e);
            return ExitCode::from(RUNTIME_ERROR);
        }
    };

    let formatter = TerminalFormatter::new(use_color(args.no_color), args.verbose, args.quiet)
        .with_min_severity(config.min_severity);
    let source = check.scene.display().to_string();
    println!("{}", formatter.format(&source, &report.log, &report.scene));

    ExitCode::from(exit_code(&report.log))
}
