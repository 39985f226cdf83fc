//! CLI integration tests.
//!
//! Tests for argument parsing and configuration layering.

use std::path::PathBuf;

use clap::Parser;
use scene_validator::cli::args::{Args, CheckArgs, Command};
use scene_validator::{Severity, ValidatorConfig};

fn parse(argv: &[&str]) -> Args {
    let mut full = vec!["scene-validator"];
    full.extend_from_slice(argv);
    Args::try_parse_from(full).unwrap()
}

fn check_args(argv: &[&str]) -> CheckArgs {
    match parse(argv).command {
        Command::Check(check) => check,
        other => panic!("expected check, got {:?}", other),
    }
}

#[test]
fn test_version_command() {
    assert_eq!(parse(&["version"]).command, Command::Version);
}

#[test]
fn test_rules_command() {
    assert_eq!(parse(&["rules"]).command, Command::Rules);
}

#[test]
fn test_check_defaults() {
    let check = check_args(&["check", "scene.json"]);
    assert_eq!(check.scene, PathBuf::from("scene.json"));
    assert_eq!(check.min_severity, None);
    assert!(!check.parallel);
    assert!(check.ignore_types.is_empty());
    assert!(check.ignore_markers.is_empty());
}

#[test]
fn test_severity_aliases() {
    for (text, expected) in [
        ("info", Severity::Info),
        ("warn", Severity::Warning),
        ("warning", Severity::Warning),
        ("error", Severity::Error),
    ] {
        let check = check_args(&["check", "s.json", "--min-severity", text]);
        assert_eq!(check.min_severity, Some(expected));
    }
}

#[test]
fn test_repeatable_ignores() {
    let check = check_args(&[
        "check",
        "s.json",
        "--ignore-marker",
        "EditorOnly",
        "--ignore-marker",
        "Deprecated",
    ]);
    assert_eq!(check.ignore_markers, vec!["EditorOnly", "Deprecated"]);
}

#[test]
fn test_global_flags() {
    let args = parse(&["--verbose", "--no-color", "check", "s.json"]);
    assert!(args.verbose);
    assert!(args.no_color);
    assert!(!args.quiet);
}

#[test]
fn test_unknown_command() {
    assert!(Args::try_parse_from(["scene-validator", "lint"]).is_err());
}

#[test]
fn test_args_lower_to_runner_config() {
    let check = check_args(&[
        "check",
        "s.json",
        "--parallel",
        "--max-parallel",
        "2",
        "--ignore-type",
        "Door",
    ]);
    let runner = ValidatorConfig::from_args(&check).runner_config();
    assert!(runner.parallel);
    assert_eq!(runner.max_parallel, 2);
    assert_eq!(runner.ignore_types.len(), 1);
    assert_eq!(runner.ignore_markers.len(), 1);
}
