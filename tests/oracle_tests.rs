// tests/oracle_tests.rs

use pretty_assertions::assert_eq;
use sieve_lang::predicate::{ArgumentSlot, OperatorSlot};
use sieve_lang::{compile_predicate, guess, sample, Grammar, Guess, Value};
use std::collections::BTreeSet;

const NOW: i64 = 1_700_000_000_000;
const DAY: i64 = 86_400_000;

fn rendered(partial: &str, grammar: &Grammar) -> Vec<String> {
    guess(partial, grammar).iter().map(Guess::to_string).collect()
}

fn filter_names(partial: &str, grammar: &Grammar) -> BTreeSet<String> {
    guess(partial, grammar)
        .iter()
        .map(|g| g.name().to_string())
        .collect()
}

// ============================================================================
// Filter stage
// ============================================================================

#[test]
fn test_empty_input_offers_every_filter() {
    let grammar = sample::grammar_at(NOW);
    let guesses = guess("", &grammar);

    assert_eq!(guesses.len(), grammar.filters().len());
    for (guess, filter) in guesses.iter().zip(grammar.filters()) {
        assert_eq!(guess.name(), filter.name());
        assert_eq!(guess.operator, OperatorSlot::Placeholder);
        assert_eq!(guess.argument, ArgumentSlot::Placeholder(filter.ty().clone()));
    }
}

#[test]
fn test_unfinished_filter_prefix() {
    let grammar = sample::grammar_at(NOW);
    let guesses = guess("cre", &grammar);

    assert_eq!(guesses.len(), 1);
    assert_eq!(guesses[0].name(), "created");
    assert_eq!(guesses[0].operator, OperatorSlot::Placeholder);
    assert!(matches!(guesses[0].argument, ArgumentSlot::Placeholder(_)));
    assert_eq!(guesses[0].to_string(), "created <operator> <timestamp>");
}

#[test]
fn test_filter_alias_prefix() {
    let grammar = sample::grammar_at(NOW);
    assert_eq!(rendered("b", &grammar), vec!["author <operator> <user>"]);
}

#[test]
fn test_unknown_filter_prefix() {
    let grammar = sample::grammar_at(NOW);
    assert!(guess("zzz", &grammar).is_empty());
    assert!(guess("zzz before now", &grammar).is_empty());
}

#[test]
fn test_finished_filter_expands_operators() {
    let grammar = sample::grammar_at(NOW);
    assert_eq!(
        rendered("created ", &grammar),
        vec![
            "created = <timestamp>",
            "created != <timestamp>",
            "created before <timestamp>",
            "created after <timestamp>",
            "created around <timestamp>",
            "created > <timestamp>",
            "created < <timestamp>",
        ]
    );
    assert_eq!(rendered("by ", &grammar), vec!["author = <user>", "author != <user>"]);
}

// ============================================================================
// Operator stage
// ============================================================================

#[test]
fn test_unfinished_operator_prefix() {
    let grammar = sample::grammar_at(NOW);
    let guesses = guess("created bef", &grammar);

    assert_eq!(guesses.len(), 1);
    assert_eq!(guesses[0].symbol(), Some("before"));
    assert!(matches!(guesses[0].argument, ArgumentSlot::Placeholder(_)));
}

#[test]
fn test_operator_prefix_is_type_checked() {
    let grammar = sample::grammar_at(NOW);
    assert!(guess("author bef", &grammar).is_empty());
    assert_eq!(rendered("score ab", &grammar), vec!["score > <number>"]);
}

#[test]
fn test_ambiguous_operator_prefix() {
    let grammar = sample::grammar_at(NOW);
    assert_eq!(
        rendered("created a", &grammar),
        vec!["created after <timestamp>", "created around <timestamp>", "created > <timestamp>"]
    );
}

#[test]
fn test_unknown_operator_yields_nothing() {
    let grammar = sample::grammar_at(NOW);
    assert!(guess("created ???", &grammar).is_empty());
    assert!(guess("created ??? now", &grammar).is_empty());
}

// ============================================================================
// Argument stage
// ============================================================================

#[test]
fn test_finished_operator_offers_every_macro() {
    let grammar = sample::grammar_at(NOW);
    assert_eq!(
        rendered("created before ", &grammar),
        vec![
            "created before 3 days ago".to_string(),
            "created before now".to_string(),
            "created before today".to_string(),
            "created before yesterday".to_string(),
            format!("created before {}", NOW),
            "created before 10".to_string(),
        ]
    );
}

#[test]
fn test_full_argument_ranks_first_and_compiles() {
    let grammar = sample::grammar_at(NOW);
    let literal = "created before 5 days ago";
    let guesses = guess(literal, &grammar);

    assert_eq!(guesses[0].to_string(), literal);
    assert_eq!(guesses[0].weight(), 8);

    let predicate = compile_predicate(literal, &grammar).unwrap();
    assert_eq!(predicate.filter().name(), "created");
    assert_eq!(predicate.operator().symbol(), "before");
    assert_eq!(predicate.value(), &Value::Integer(NOW - 5 * DAY));
}

#[test]
fn test_partial_argument_examples() {
    let grammar = sample::grammar_at(NOW);

    let guesses = guess("created before 5 d", &grammar);
    assert_eq!(guesses[0].to_string(), "created before 5 days ago");
    assert_eq!(guesses[0].weight(), 2);

    assert_eq!(rendered("created after y", &grammar), vec!["created after yesterday"]);
    assert_eq!(rendered("author = m", &grammar), vec!["author = me"]);
}

#[test]
fn test_examples_carry_detail() {
    let grammar = sample::grammar_at(NOW);
    let guesses = guess("created after t", &grammar);
    assert_eq!(guesses.len(), 1);
    assert_eq!(guesses[0].example(), Some("today"));
    assert_eq!(guesses[0].detail(), Some("start of the current day (UTC)"));
}

#[test]
fn test_rejected_argument_yields_nothing() {
    let grammar = sample::grammar_at(NOW);
    assert!(guess("created before soon", &grammar).is_empty());
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_weights_never_increase() {
    let grammar = sample::grammar_at(NOW);
    let inputs = [
        "",
        "created ",
        "created before ",
        "created before 5",
        "created before 5 d",
        "created before 5 days ago",
        "score > 1",
        "author = user",
    ];

    for input in inputs {
        let weights: Vec<usize> = guess(input, &grammar).iter().map(Guess::weight).collect();
        assert!(
            weights.windows(2).all(|w| w[0] >= w[1]),
            "weights out of order for {:?}: {:?}",
            input,
            weights
        );
    }
}

#[test]
fn test_narrowing_is_monotonic() {
    let grammar = sample::grammar_at(NOW);

    for word in ["created", "last-updated", "author", "score", "by", "updated"] {
        for end in 0..word.len() {
            let shorter = filter_names(&word[..end], &grammar);
            let longer = filter_names(&word[..end + 1], &grammar);
            assert!(
                longer.is_subset(&shorter),
                "{:?} reintroduced filters: {:?} vs {:?}",
                &word[..end + 1],
                longer,
                shorter
            );
        }

        let dead_end = format!("{}x", word);
        assert!(filter_names(&dead_end, &grammar).is_subset(&filter_names(word, &grammar)));
    }
}
