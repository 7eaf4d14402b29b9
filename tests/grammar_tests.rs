// tests/grammar_tests.rs

use pretty_assertions::assert_eq;
use sieve_lang::grammar::{ConfigError, FilterDef, Grammar, GrammarConfig, OperatorDef};
use sieve_lang::macros::MacroDef;
use sieve_lang::sample;
use sieve_lang::types::TypeDef;
use std::sync::Arc;

fn numbers() -> GrammarConfig {
    GrammarConfig::new()
        .with_type(TypeDef::new("any", 0))
        .with_type(TypeDef::new("number", 1).supertype("any"))
        .with_type(TypeDef::new("timestamp", 2).supertype("number"))
}

// ============================================================================
// Types
// ============================================================================

#[test]
fn test_types_sorted_by_precedence() {
    let grammar = sample::grammar_at(0);
    let names: Vec<&str> = grammar.types().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["user", "timestamp", "number", "any", "*"]);
}

#[test]
fn test_type_lookup_is_stable() {
    let grammar = sample::grammar_at(0);
    let a = grammar.ty("timestamp").unwrap();
    let b = grammar.ty("timestamp").unwrap();
    assert!(Arc::ptr_eq(a, b));
}

#[test]
fn test_subtype_reflexive_and_rooted() {
    let grammar = sample::grammar_at(0);
    for ty in grammar.types().iter() {
        assert!(ty.is_subtype_of(ty), "{} is not a subtype of itself", ty);
        assert_eq!(ty.all_supertypes().last().unwrap().name(), "*");
    }
}

#[test]
fn test_supertype_chain() {
    let grammar = sample::grammar_at(0);
    let timestamp = grammar.ty("timestamp").unwrap();
    let chain: Vec<&str> = timestamp.all_supertypes().iter().map(|t| t.name()).collect();
    assert_eq!(chain, vec!["timestamp", "number", "any", "*"]);

    let number = grammar.ty("number").unwrap();
    assert!(grammar.is_subtype_of(timestamp, number));
    assert!(!grammar.is_subtype_of(number, timestamp));
}

#[test]
fn test_root_is_its_own_supertype() {
    let grammar = sample::grammar_at(0);
    let root = grammar.types().root();
    assert!(root.is_root());
    assert_eq!(root.supertype().name(), "*");
    assert_eq!(root.all_supertypes().len(), 1);
}

#[test]
fn test_infer_picks_highest_precedence() {
    let grammar = sample::grammar_at(0);
    assert_eq!(grammar.types().infer("42").name(), "timestamp");
    assert_eq!(grammar.types().infer("4.2").name(), "number");
    assert_eq!(grammar.types().infer("USER2").name(), "user");
    assert_eq!(grammar.types().infer("hello").name(), "any");
}

#[test]
fn test_duplicate_type() {
    let err = Grammar::new(numbers().with_type(TypeDef::new("number", 3))).unwrap_err();
    assert_eq!(err, ConfigError::DuplicateType("number".into()));
}

#[test]
fn test_unknown_supertype() {
    let err = Grammar::new(GrammarConfig::new().with_type(TypeDef::new("money", 1).supertype("number")))
        .unwrap_err();
    assert_eq!(err, ConfigError::UnknownType("number".into()));
}

// ============================================================================
// Filters and operators
// ============================================================================

#[test]
fn test_filter_lookup_by_alias() {
    let grammar = sample::grammar_at(0);
    assert_eq!(grammar.filter("by").unwrap().name(), "author");
    assert_eq!(grammar.filter("updated").unwrap().name(), "last-updated");
    assert!(grammar.filter("owner").is_none());
}

#[test]
fn test_filters_prefixed_by() {
    let grammar = sample::grammar_at(0);
    let names = |prefix: &str| -> Vec<String> {
        grammar
            .filters_prefixed_by(prefix)
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    };

    assert_eq!(names("cre"), vec!["created"]);
    assert_eq!(names("upd"), vec!["last-updated"]);
    assert_eq!(names(""), vec!["created", "last-updated", "author", "score"]);
    assert!(names("zzz").is_empty());
}

#[test]
fn test_operators_compatible_through_supertypes() {
    let grammar = sample::grammar_at(0);
    let symbols = |filter: &str| -> Vec<String> {
        let filter = grammar.filter(filter).unwrap();
        grammar
            .operators_compatible_with(filter.ty())
            .iter()
            .map(|op| op.symbol().to_string())
            .collect()
    };

    assert_eq!(symbols("created"), vec!["=", "!=", "before", "after", "around", ">", "<"]);
    assert_eq!(symbols("score"), vec!["=", "!=", ">", "<"]);
    assert_eq!(symbols("author"), vec!["=", "!="]);
}

#[test]
fn test_root_operator_fits_everything() {
    let grammar = Grammar::new(
        numbers()
            .with_filter(FilterDef::new("size", "number"))
            .with_operator(OperatorDef::new("exists", "*")),
    )
    .unwrap();
    let size = grammar.filter("size").unwrap();
    assert_eq!(grammar.operators_compatible_with(size.ty()).len(), 1);
}

#[test]
fn test_duplicate_filter_name() {
    let err = Grammar::new(
        numbers()
            .with_filter(FilterDef::new("size", "number"))
            .with_filter(FilterDef::new("size", "timestamp")),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::DuplicateFilter("size".into()));
}

#[test]
fn test_filter_alias_clashing_with_name() {
    let err = Grammar::new(
        numbers()
            .with_filter(FilterDef::new("size", "number"))
            .with_filter(FilterDef::new("bytes", "number").aliases(["size"])),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::DuplicateFilter("size".into()));
}

#[test]
fn test_duplicate_operator_alias() {
    let err = Grammar::new(
        numbers()
            .with_operator(OperatorDef::new(">", "number").aliases(["gt"]))
            .with_operator(OperatorDef::new(">=", "number").aliases(["gt"])),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::DuplicateOperator("gt".into()));
}

#[test]
fn test_operator_with_unknown_type() {
    let err = Grammar::new(numbers().with_operator(OperatorDef::new("~", "text"))).unwrap_err();
    assert_eq!(err, ConfigError::UnknownType("text".into()));
}

// ============================================================================
// Macros
// ============================================================================

#[test]
fn test_macros_sorted_by_precedence() {
    let grammar = Grammar::new(
        numbers()
            .with_macro(MacroDef::new("<number>", "number").precedence(-1))
            .with_macro(MacroDef::new("[now]", "timestamp"))
            .with_macro(MacroDef::new("[epoch]", "timestamp"))
            .with_macro(MacroDef::new("[soon]", "timestamp").precedence(5)),
    )
    .unwrap();

    let templates: Vec<&str> = grammar.macros().iter().map(|m| m.template()).collect();
    assert_eq!(templates, vec!["[soon]", "[now]", "[epoch]", "<number>"]);
}

#[test]
fn test_macros_compatible_with() {
    let grammar = sample::grammar_at(0);
    let templates = |filter: &str| -> Vec<String> {
        let filter = grammar.filter(filter).unwrap();
        grammar
            .macros_compatible_with(filter.ty())
            .iter()
            .map(|m| m.template().to_string())
            .collect()
    };

    assert_eq!(templates("author"), vec!["[me]", "<user>"]);
    assert_eq!(templates("score"), vec!["<number>"]);
    assert_eq!(templates("created").last().unwrap(), "<number>");
    assert_eq!(templates("created").len(), 6);
}

#[test]
fn test_macro_with_unknown_type() {
    let err = Grammar::new(numbers().with_macro(MacroDef::new("<money>", "number"))).unwrap_err();
    assert_eq!(err, ConfigError::UnknownType("money".into()));
}

#[test]
fn test_config_error_messages() {
    assert_eq!(
        ConfigError::DuplicateType("number".into()).to_string(),
        "redeclared type: \"number\""
    );
    assert_eq!(ConfigError::UnknownType("x".into()).to_string(), "unknown type: \"x\"");
}

#[test]
fn test_grammar_display() {
    let grammar = sample::grammar_at(0);
    assert_eq!(
        grammar.to_string(),
        "grammar (5 types, 4 filters, 7 operators, 8 macros)"
    );
}
