// tests/cli_tests.rs

#![cfg(feature = "cli")]

use pretty_assertions::assert_eq;
use sieve_lang::cli::{
    self, CheckOptions, CliError, GuessOptions, ReplayStep, execute_check, execute_guess, execute_replay,
    parse_script,
};
use sieve_lang::editor::SpecialKey;
use sieve_lang::sample;

const NOW: i64 = 1_700_000_000_000;

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_projects_predicate() {
    let grammar = sample::grammar_at(NOW);
    let options = CheckOptions {
        literal: "created before now".to_string(),
        pretty: false,
    };

    let output = execute_check(&options, &grammar).unwrap();
    assert_eq!(
        output,
        serde_json::json!({
            "filter": { "name": "created", "type": "timestamp" },
            "operator": { "symbol": "before", "type": "timestamp" },
            "argument": { "type": "timestamp", "literal": "now", "value": NOW },
        })
    );
}

#[test]
fn test_check_reports_syntax_error() {
    let grammar = sample::grammar_at(NOW);
    let options = CheckOptions {
        literal: "created".to_string(),
        ..Default::default()
    };

    let err = execute_check(&options, &grammar).unwrap_err();
    assert!(matches!(err, CliError::Syntax(_)));
    assert_eq!(err.to_string(), "(at 8) missing an operator and argument");
}

#[test]
fn test_render_json_pretty() {
    let value = serde_json::json!({ "a": 1 });
    assert_eq!(cli::render_json(&value, false).unwrap(), "{\"a\":1}");
    assert_eq!(cli::render_json(&value, true).unwrap(), "{\n  \"a\": 1\n}");
}

// ============================================================================
// guess
// ============================================================================

#[test]
fn test_guess_lines() {
    let grammar = sample::grammar_at(NOW);
    let options = GuessOptions {
        partial: "created before 5 d".to_string(),
        json: false,
    };

    let lines = execute_guess(&options, &grammar).unwrap();
    assert_eq!(
        lines,
        vec![
            "2\tcreated before 5 days ago",
            "1\tcreated before 5",
            "1\tcreated before 5",
        ]
    );
}

#[test]
fn test_guess_json() {
    let grammar = sample::grammar_at(NOW);
    let options = GuessOptions {
        partial: "cre".to_string(),
        json: true,
    };

    let lines = execute_guess(&options, &grammar).unwrap();
    assert_eq!(lines.len(), 1);
    let json: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(json["filter"]["name"], "created");
    assert_eq!(json["operator"]["placeholder"], true);
    assert_eq!(json["weight"], 0);
}

// ============================================================================
// grammar
// ============================================================================

#[test]
fn test_describe_grammar() {
    let grammar = sample::grammar_at(NOW);
    let json: serde_json::Value =
        serde_json::from_str(&cli::describe_grammar(&grammar, true).unwrap()).unwrap();

    assert_eq!(json["filters"].as_array().unwrap().len(), 4);
    assert_eq!(json["filters"][2]["aliases"], serde_json::json!(["by"]));
    assert_eq!(json["operators"][0]["symbol"], "=");
    assert_eq!(json["macros"][1]["template"], "[now]");
}

#[test]
fn test_grammar_overview() {
    let grammar = sample::grammar_at(NOW);
    let overview = cli::grammar_overview(&grammar);

    assert!(overview.starts_with("FILTERS\n"));
    assert!(overview.contains("  author          user  (also: by)\n"));
    assert!(overview.contains("  before          timestamp\n"));
    assert!(overview.contains("  user            [me]\n"));
}

// ============================================================================
// replay
// ============================================================================

#[test]
fn test_parse_script() {
    let script = "# start\n> cre\n\ntab\n>created \npick 2\nEnter\n";
    let steps = parse_script(script).unwrap();
    assert_eq!(
        steps,
        vec![
            ReplayStep::Set("cre".to_string()),
            ReplayStep::Key(SpecialKey::Tab),
            ReplayStep::Set("created ".to_string()),
            ReplayStep::Pick(2),
            ReplayStep::Key(SpecialKey::Enter),
        ]
    );
}

#[test]
fn test_parse_script_rejects_unknown_lines() {
    let err = parse_script("> cre\nteleport\n").unwrap_err();
    assert_eq!(err.to_string(), "script line 2: unknown key: \"teleport\"");

    let err = parse_script("pick first").unwrap_err();
    assert!(matches!(err, CliError::Script { line: 1, .. }));
}

#[test]
fn test_replay_session() {
    let grammar = sample::grammar_at(NOW);
    let script = "\
> cre
tab
> created before now
enter
> au
tab
";

    let report = execute_replay(script, &grammar).unwrap();
    assert_eq!(report.input, "author ");
    assert_eq!(report.committed, vec!["created before now"]);
    assert_eq!(report.pending.as_deref(), Some("author = <user>"));
    assert_eq!(report.ghost, "= ");
    assert_eq!(report.error, None);
    assert_eq!(
        report.to_string(),
        "input: \"author \"\ncommitted: created before now\npending: author = <user> (ghost: \"= \")\n"
    );
}

#[test]
fn test_replay_reports_rejected_commit() {
    let grammar = sample::grammar_at(NOW);
    let report = execute_replay("> score\nenter\nesc\n", &grammar).unwrap();

    assert!(report.committed.is_empty());
    assert_eq!(report.pending, None);
    assert_eq!(
        report.error.as_deref(),
        Some("(at 6) missing an operator and argument")
    );
}
