//! Tokenizer and backtracking token cursor.
//!
//! Raw text is split into alternating whitespace and word runs. Word runs
//! are then classified against a grammar. The resulting [`Lexer`] is a
//! cursor over an immutable token list with a stack of saved positions so
//! several consumers can speculatively read ahead and roll back.
//!
//! Positions are character indices into the raw text.

use crate::grammar::Grammar;
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Whitespace,
    Word,
}

/// A maximal run of whitespace or non-whitespace characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub kind: RawKind,
    pub lexeme: String,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// The word names a type
    Value,
    /// The word is an operator symbol or alias
    Operator,
    /// Anything else: filter names, macro keywords, literals
    Word,
}

/// A word run classified against a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: usize,
}

impl Token {
    /// Length in characters.
    pub fn len(&self) -> usize {
        self.lexeme.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }

    /// Position one past the last character.
    pub fn end(&self) -> usize {
        self.position + self.len()
    }
}

/// Splits `raw` into whitespace and word runs. Concatenating the lexemes
/// reproduces the input.
pub fn split(raw: &str) -> Vec<RawToken> {
    let mut tokens: Vec<RawToken> = Vec::new();

    for (position, ch) in raw.chars().enumerate() {
        let kind = if ch.is_whitespace() {
            RawKind::Whitespace
        } else {
            RawKind::Word
        };

        match tokens.last_mut() {
            Some(current) if current.kind == kind => current.lexeme.push(ch),
            _ => tokens.push(RawToken {
                kind,
                lexeme: ch.to_string(),
                position,
            }),
        }
    }

    tokens
}

/// Cursor over the classified word tokens of a literal.
///
/// `peek` and `next` return `None` at the end of the stream and never fail.
/// Speculative reads are bracketed by [`Lexer::save`] and exactly one of
/// [`Lexer::undo`] or [`Lexer::commit`]; [`Lexer::checkpoint`] does the
/// pairing automatically.
#[derive(Debug, Clone)]
pub struct Lexer {
    tokens: Vec<Token>,
    pointer: usize,
    stash: Vec<usize>,
    trailing_whitespace: bool,
}

impl Lexer {
    pub fn new(raw: &str, grammar: &Grammar) -> Self {
        let raw_tokens = split(raw);
        let trailing_whitespace = raw_tokens
            .last()
            .is_some_and(|t| t.kind == RawKind::Whitespace);

        Lexer {
            tokens: Self::classify(raw_tokens, grammar),
            pointer: 0,
            stash: Vec::new(),
            trailing_whitespace,
        }
    }

    /// The classified word tokens of `raw`.
    pub fn tokenize(raw: &str, grammar: &Grammar) -> Vec<Token> {
        Self::classify(split(raw), grammar)
    }

    fn classify(raw_tokens: Vec<RawToken>, grammar: &Grammar) -> Vec<Token> {
        raw_tokens
            .into_iter()
            .filter(|t| t.kind == RawKind::Word)
            .map(|t| {
                let kind = if grammar.has_type(&t.lexeme) {
                    TokenKind::Value
                } else if grammar.has_operator(&t.lexeme) {
                    TokenKind::Operator
                } else {
                    TokenKind::Word
                };
                Token {
                    kind,
                    lexeme: t.lexeme,
                    position: t.position,
                }
            })
            .collect()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pointer)
    }

    pub fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pointer).cloned();
        if token.is_some() {
            self.pointer += 1;
        }
        token
    }

    pub fn is_done(&self) -> bool {
        self.pointer >= self.tokens.len()
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.pointer.min(self.tokens.len())..]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the raw text ended in whitespace, i.e. the last word is finished.
    pub fn ends_with_whitespace(&self) -> bool {
        self.trailing_whitespace
    }

    /// Position of the first token, or 0 for an empty literal.
    pub fn first_position(&self) -> usize {
        self.tokens.first().map_or(0, |t| t.position)
    }

    /// Position just past the last token, or 0 for an empty literal.
    pub fn end_position(&self) -> usize {
        self.tokens.last().map_or(0, Token::end)
    }

    pub fn save(&mut self) {
        self.stash.push(self.pointer);
    }

    /// Restores the most recently saved position.
    pub fn undo(&mut self) {
        if let Some(pointer) = self.stash.pop() {
            self.pointer = pointer;
        }
    }

    /// Drops the most recently saved position, keeping forward progress.
    pub fn commit(&mut self) {
        self.stash.pop();
    }

    /// Number of open saves.
    pub fn depth(&self) -> usize {
        self.stash.len()
    }

    /// Saves the position and returns a guard that restores it when dropped,
    /// unless [`Checkpoint::commit`] is called first.
    pub fn checkpoint(&mut self) -> Checkpoint<'_> {
        self.save();
        Checkpoint {
            lexer: self,
            committed: false,
        }
    }
}

/// Scoped save/restore on a [`Lexer`].
///
/// ```
/// use sieve_lang::grammar::{Grammar, GrammarConfig};
/// use sieve_lang::lexer::Lexer;
///
/// let grammar = Grammar::new(GrammarConfig::new()).unwrap();
/// let mut lexer = Lexer::new("a b c", &grammar);
///
/// {
///     let mut probe = lexer.checkpoint();
///     probe.next();
///     probe.next();
/// }
/// assert_eq!(lexer.peek().unwrap().lexeme, "a");
///
/// let mut keep = lexer.checkpoint();
/// keep.next();
/// keep.commit();
/// assert_eq!(lexer.peek().unwrap().lexeme, "b");
/// assert_eq!(lexer.depth(), 0);
/// ```
pub struct Checkpoint<'l> {
    lexer: &'l mut Lexer,
    committed: bool,
}

impl Checkpoint<'_> {
    pub fn commit(mut self) {
        self.lexer.commit();
        self.committed = true;
    }
}

impl Deref for Checkpoint<'_> {
    type Target = Lexer;

    fn deref(&self) -> &Lexer {
        self.lexer
    }
}

impl DerefMut for Checkpoint<'_> {
    fn deref_mut(&mut self) -> &mut Lexer {
        self.lexer
    }
}

impl Drop for Checkpoint<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.lexer.undo();
        }
    }
}

#[test]
fn test_split_alternates() {
    let tokens = split("  created  before");
    let kinds: Vec<RawKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [RawKind::Whitespace, RawKind::Word, RawKind::Whitespace, RawKind::Word]
    );
    assert_eq!(tokens[1].position, 2);
    assert_eq!(tokens[3].position, 11);
}

#[test]
fn test_split_empty() {
    assert!(split("").is_empty());
}
