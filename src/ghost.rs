//! Ghost text: the part of a guess the user has not typed yet.

use crate::predicate::Guess;
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercases, drops leading whitespace and collapses whitespace runs.
pub fn normalize(text: &str) -> String {
    WHITESPACE
        .replace_all(text.trim_start(), " ")
        .to_lowercase()
}

/// The suffix that would complete `literal` into `guess`, or an empty string
/// when the literal has already diverged from it.
///
/// ```
/// use sieve_lang::{ghost, guess, sample};
///
/// let grammar = sample::grammar_at(0);
/// let guesses = guess("cre", &grammar);
/// assert_eq!(ghost::ghost("cre", &guesses[0]), "ated ");
/// ```
pub fn ghost(literal: &str, guess: &Guess) -> String {
    let literal = normalize(literal);
    let guess = normalize(&guess.render(false));

    match guess.strip_prefix(&literal) {
        Some(rest) => rest.to_string(),
        None => String::new(),
    }
}

#[test]
fn test_normalize() {
    assert_eq!(normalize("  Created   BEFORE\t"), "created before ");
    assert_eq!(normalize(""), "");
}
