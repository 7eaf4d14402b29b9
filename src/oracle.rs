//! The completion oracle.
//!
//! The oracle walks a partial literal through the same three stages as the
//! compiler (filter, operator, argument), but instead of demanding a unique
//! match at each stage it branches over every candidate still in play and
//! returns one [`Guess`] per branch.
//!
//! Stages are only expanded left to right, once the stage before them is
//! pinned down. While the user is typing `cre` the operators of `created`
//! are not offered yet; they appear once the filter word is finished
//! (followed by whitespace) and only one filter fits it. A word is
//! considered finished when another word or trailing whitespace follows it.
//!
//! Guesses are ranked by weight, the number of input characters a macro
//! actually matched, so that longer and more specific argument matches come
//! first. Ties keep declaration order.
//!
//! ```
//! use sieve_lang::{guess, sample};
//!
//! let grammar = sample::grammar_at(0);
//! let guesses = guess("created bef", &grammar);
//! assert_eq!(guesses.len(), 1);
//! assert_eq!(guesses[0].to_string(), "created before <timestamp>");
//! ```

use crate::{
    grammar::{Filter, Grammar, Operator},
    lexer::Lexer,
    macros::{Attempt, Example},
    predicate::{ArgumentSlot, Guess, OperatorSlot},
};
use std::sync::Arc;
use tracing::trace;

/// Ranked completions for a partial literal. Never fails; unparseable input
/// simply yields fewer (or no) guesses.
pub fn guess(partial: &str, grammar: &Grammar) -> Vec<Guess> {
    let mut oracle = Oracle {
        grammar,
        lexer: Lexer::new(partial, grammar),
        guesses: Vec::new(),
    };
    oracle.filter();

    let mut guesses = oracle.guesses;
    guesses.sort_by(|a, b| b.weight().cmp(&a.weight()));
    guesses
}

struct Oracle<'g> {
    grammar: &'g Grammar,
    lexer: Lexer,
    guesses: Vec<Guess>,
}

impl<'g> Oracle<'g> {
    fn filter(&mut self) {
        let grammar = self.grammar;

        let Some(token) = self.lexer.next() else {
            // Nothing typed: every filter is a valid start.
            self.guesses
                .extend(grammar.filters().iter().map(Guess::filter_only));
            return;
        };

        if self.lexer.is_done() {
            let candidates = grammar.filters_prefixed_by(&token.lexeme);
            trace!(prefix = %token.lexeme, candidates = candidates.len(), "filter stage");

            if candidates.len() == 1 && self.lexer.ends_with_whitespace() {
                self.expand_operators(candidates[0]);
            } else {
                self.guesses
                    .extend(candidates.into_iter().map(Guess::filter_only));
            }
            return;
        }

        for filter in grammar.filters().iter().filter(|f| f.matches(&token.lexeme)) {
            self.lexer.save();
            self.operator(filter);
            self.lexer.undo();
        }
    }

    /// Every operator usable with `filter`, arguments left open.
    fn expand_operators(&mut self, filter: &Arc<Filter>) {
        let grammar = self.grammar;
        let operators = grammar.operators_compatible_with(filter.ty());
        if operators.is_empty() {
            self.guesses.push(Guess::filter_only(filter));
            return;
        }

        self.guesses.extend(
            operators
                .into_iter()
                .map(|op| Guess::with_operator(filter, op)),
        );
    }

    fn operator(&mut self, filter: &Arc<Filter>) {
        let grammar = self.grammar;
        let Some(token) = self.lexer.next() else {
            return;
        };

        let compatible = grammar.operators_compatible_with(filter.ty());

        if self.lexer.is_done() {
            let candidates: Vec<&Arc<Operator>> = compatible
                .into_iter()
                .filter(|op| op.prefixed_by(&token.lexeme))
                .collect();
            trace!(filter = %filter.name(), prefix = %token.lexeme, candidates = candidates.len(), "operator stage");

            if candidates.len() == 1 && self.lexer.ends_with_whitespace() {
                self.argument(filter, candidates[0]);
            } else {
                self.guesses.extend(
                    candidates
                        .into_iter()
                        .map(|op| Guess::with_operator(filter, op)),
                );
            }
            return;
        }

        for operator in compatible.into_iter().filter(|op| op.matches(&token.lexeme)) {
            self.lexer.save();
            self.argument(filter, operator);
            self.lexer.undo();
        }
    }

    /// One guess per example of every compatible macro that is still a
    /// plausible reading of the remaining tokens.
    fn argument(&mut self, filter: &Arc<Filter>, operator: &Arc<Operator>) {
        let grammar = self.grammar;

        for candidate in grammar.macros_compatible_with(filter.ty()) {
            if self.lexer.is_done() {
                self.push_examples(filter, operator, candidate.examples(&[]), 0);
                continue;
            }

            let attempt = {
                let mut probe = self.lexer.checkpoint();
                candidate.attempt(&mut probe)
            };

            if let Attempt::Failure { partial: false, .. } = attempt {
                trace!(template = %candidate.template(), "macro rejected");
                continue;
            }

            let examples = candidate.examples(&attempt.lexemes());
            self.push_examples(filter, operator, examples, attempt.weight());
        }
    }

    fn push_examples(
        &mut self,
        filter: &Arc<Filter>,
        operator: &Arc<Operator>,
        examples: Vec<Example>,
        weight: usize,
    ) {
        self.guesses.extend(examples.into_iter().map(|example| Guess {
            filter: filter.clone(),
            operator: OperatorSlot::Known(operator.clone()),
            argument: ArgumentSlot::Example {
                ty: filter.ty().clone(),
                example,
                weight,
            },
        }));
    }
}
