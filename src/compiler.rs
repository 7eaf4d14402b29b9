use crate::{
    grammar::{Filter, Grammar, Operator},
    lexer::Lexer,
    macros::Attempt,
    predicate::{Argument, Predicate},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// A user-facing error in a literal, located by character position.
///
/// Displayed with a 1-based column, e.g. `(at 9) unknown operator: "???"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("(at {}) {}", .position + 1, .message)]
pub struct SyntaxError {
    pub position: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            position,
            message: message.into(),
        }
    }
}

/// Compiles a complete literal into a predicate.
///
/// # Examples
///
/// ```
/// use sieve_lang::{compile_predicate, sample, Value};
///
/// let grammar = sample::grammar_at(1_000_000_000);
/// let predicate = compile_predicate("created before 5 days ago", &grammar).unwrap();
/// assert_eq!(predicate.filter().name(), "created");
/// assert_eq!(predicate.operator().symbol(), "before");
/// assert_eq!(predicate.value(), &Value::Integer(1_000_000_000 - 5 * 86_400_000));
///
/// let err = compile_predicate("created ???", &grammar).unwrap_err();
/// assert_eq!(err.position, 8);
/// ```
pub fn compile_predicate(literal: &str, grammar: &Grammar) -> Result<Predicate, SyntaxError> {
    Compiler::new(literal, grammar).compile()
}

/// Like [`compile_predicate`] for callers that only care whether it worked.
pub fn validate_predicate(literal: &str, grammar: &Grammar) -> Option<Predicate> {
    compile_predicate(literal, grammar).ok()
}

pub fn is_valid(literal: &str, grammar: &Grammar) -> bool {
    validate_predicate(literal, grammar).is_some()
}

/// Walks a literal once: filter, then operator, then argument.
pub struct Compiler<'g> {
    lexer: Lexer,
    grammar: &'g Grammar,
}

impl<'g> Compiler<'g> {
    pub fn new(literal: &str, grammar: &'g Grammar) -> Self {
        Compiler {
            lexer: Lexer::new(literal, grammar),
            grammar,
        }
    }

    pub fn compile(mut self) -> Result<Predicate, SyntaxError> {
        let filter = self.filter()?;
        let operator = self.operator(&filter)?;
        let argument = self.argument(&filter)?;

        if let Some(extra) = self.lexer.peek() {
            return Err(SyntaxError::new(
                extra.position,
                format!("unexpected input after argument: \"{}\"", extra.lexeme),
            ));
        }

        let predicate = Predicate::new(filter, operator, argument);
        debug!(%predicate, "compiled predicate");
        Ok(predicate)
    }

    fn filter(&mut self) -> Result<Arc<Filter>, SyntaxError> {
        let Some(token) = self.lexer.next() else {
            return Err(SyntaxError::new(self.lexer.first_position(), "predicate is empty"));
        };

        self.grammar.filter(&token.lexeme).cloned().ok_or_else(|| {
            SyntaxError::new(token.position, format!("unknown filter: \"{}\"", token.lexeme))
        })
    }

    fn operator(&mut self, filter: &Filter) -> Result<Arc<Operator>, SyntaxError> {
        let Some(token) = self.lexer.next() else {
            return Err(SyntaxError::new(
                self.lexer.end_position(),
                "missing an operator and argument",
            ));
        };

        let Some(operator) = self.grammar.operator(&token.lexeme) else {
            return Err(SyntaxError::new(
                token.position,
                format!("unknown operator: \"{}\"", token.lexeme),
            ));
        };

        if !operator.accepts(filter.ty()) {
            return Err(SyntaxError::new(
                token.position,
                format!(
                    "\"{}\" operator cannot be used on type: \"{}\"",
                    token.lexeme,
                    filter.ty()
                ),
            ));
        }

        Ok(operator.clone())
    }

    /// The first compatible macro, in precedence order, that fully matches.
    fn argument(&mut self, filter: &Filter) -> Result<Argument, SyntaxError> {
        let Some(start) = self.lexer.peek().map(|t| t.position) else {
            return Err(SyntaxError::new(self.lexer.end_position(), "missing an argument"));
        };

        let grammar = self.grammar;
        let mut partial = false;

        for candidate in grammar.macros_compatible_with(filter.ty()) {
            let mut checkpoint = self.lexer.checkpoint();
            match candidate.attempt(&mut checkpoint) {
                Attempt::Success { tokens, value } => {
                    checkpoint.commit();
                    let literal = tokens
                        .iter()
                        .map(|t| t.lexeme.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    trace!(template = %candidate.template(), %literal, "argument matched");
                    return Ok(Argument {
                        ty: filter.ty().clone(),
                        literal,
                        value,
                    });
                }
                Attempt::Failure { partial: p, .. } => partial |= p,
            }
        }

        if partial {
            Err(SyntaxError::new(start, "incomplete argument"))
        } else {
            Err(SyntaxError::new(start, "unknown argument"))
        }
    }
}

#[test]
fn test_error_display_is_one_based() {
    let err = SyntaxError::new(0, "predicate is empty");
    assert_eq!(err.to_string(), "(at 1) predicate is empty");
}
