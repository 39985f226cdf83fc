//! Output formatting tests.
//!
//! Tests for the terminal report over real validation passes.

use scene_validator::cli::output::{exit_code, format_rules, OutputFormatter, TerminalFormatter};
use scene_validator::rules::builtin_rules;
use scene_validator::{validate_document, DocumentReport, SceneDocument, Severity, ValidatorConfig};

const YARD: &str = r#"{
    "types": [
        { "name": "Collider", "base": "Component" },
        { "name": "Rigidbody", "base": "Component",
          "markers": [{ "kind": "RequireCapability", "required": ["Collider"] }] },
        { "name": "Spawner", "base": "Component",
          "fields": [{ "name": "prefab", "markers": [{ "kind": "NotNull", "severity": "error" }] }] }
    ],
    "entities": [
        { "name": "Yard", "children": [
            { "name": "Box", "components": [{ "type": "Rigidbody" }, { "type": "Collider" }] },
            { "name": "Ball", "components": [{ "type": "Rigidbody" }] },
            { "name": "Gate", "components": [{ "type": "Spawner" }] }
        ] }
    ]
}"#;

fn run(json: &str) -> DocumentReport {
    let document = SceneDocument::from_str(json).unwrap();
    validate_document(&ValidatorConfig::default(), &document).unwrap()
}

#[test]
fn test_terminal_report_lists_failures() {
    let report = run(YARD);
    let output = TerminalFormatter::new(false, false, false).format("yard.json", &report.log, &report.scene);

    assert!(output.contains("Scene: yard.json"));
    assert!(output.contains("[WARN] Yard/Ball [Rigidbody]: missing required Collider"));
    assert!(output.contains("[ERROR] Yard/Gate [Spawner.prefab]: prefab is not set"));
    assert!(!output.contains("Yard/Box"));
    assert!(output.contains("SUMMARY: 3 checked, 1 passed, 1 warnings, 1 errors"));
    assert!(output.contains("Exit code: 1 (errors detected)"));
}

#[test]
fn test_verbose_report_shows_passes() {
    let report = run(YARD);
    let output = TerminalFormatter::new(false, true, false).format("yard.json", &report.log, &report.scene);
    assert!(output.contains("[PASS] Yard/Box [Rigidbody]: passed"));
    assert!(output.contains("(RequireCapability via RequireCapabilityValidator)"));
}

#[test]
fn test_min_severity_filters_report() {
    let report = run(YARD);
    let output = TerminalFormatter::new(false, false, true)
        .with_min_severity(Severity::Error)
        .format("yard.json", &report.log, &report.scene);
    assert!(output.contains("[ERROR]"));
    assert!(!output.contains("[WARN]"));
    assert!(!output.contains("scene-validator report"));
    // The summary still counts everything.
    assert!(output.contains("1 warnings"));
}

#[test]
fn test_exit_code_tracks_worst_failure() {
    assert_eq!(exit_code(&run(YARD).log), 1);

    let clean = r#"{ "entities": [{ "name": "Empty" }] }"#;
    let report = run(clean);
    assert!(report.log.is_empty());
    assert_eq!(exit_code(&report.log), 0);
}

#[test]
fn test_baseline_comparison_between_runs() {
    let before = run(YARD);
    let fixed = YARD.replace(
        r#"{ "name": "Ball", "components": [{ "type": "Rigidbody" }] }"#,
        r#"{ "name": "Ball", "components": [{ "type": "Rigidbody" }, { "type": "Collider" }] }"#,
    );
    let after = run(&fixed);

    let diff = after.log.compare_to_baseline(&before.log);
    assert_eq!(diff.resolved.len(), 1);
    assert!(diff.regressions.is_empty());
    assert!(diff.new_failures.is_empty());
    assert_eq!(diff.unchanged.len(), 2);
}

#[test]
fn test_rules_listing() {
    let output = format_rules(&builtin_rules());
    for rule in builtin_rules() {
        assert!(output.contains(rule.marker));
    }
}
