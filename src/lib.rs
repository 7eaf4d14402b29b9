//! Sieve: a typed predicate language for search boxes.
//!
//! A grammar declares a type hierarchy, filters (`created`, `author`),
//! operators (`before`, `=`) and argument macros (`3 days ago`). Against it
//! a literal such as `created before 3 days ago` compiles into a typed
//! [`Predicate`], and a partial literal yields ranked completion
//! [`Guess`]es for an editor.
//!
//! ```
//! use sieve_lang::{compile_predicate, guess, sample, Value};
//!
//! let grammar = sample::grammar_at(0);
//!
//! let predicate = compile_predicate("author = me", &grammar).unwrap();
//! assert_eq!(predicate.value(), &Value::Text("user1".into()));
//!
//! let guesses = guess("auth", &grammar);
//! assert_eq!(guesses[0].to_string(), "author <operator> <user>");
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod editor;
pub mod ghost;
pub mod grammar;
pub mod inspect;
pub mod lexer;
pub mod macros;
pub mod oracle;
pub mod predicate;
pub mod sample;
pub mod types;
pub mod value;

pub use compiler::{SyntaxError, compile_predicate, is_valid, validate_predicate};
pub use editor::{Editor, EditorAdviceState, EditorInputState, Event, SpecialKey};
pub use grammar::{ConfigError, Filter, FilterDef, Grammar, GrammarConfig, Operator, OperatorDef};
pub use lexer::{Lexer, Token, TokenKind};
pub use macros::{Example, Macro, MacroDef};
pub use oracle::guess;
pub use predicate::{Guess, Predicate, PredicatePlaceholder};
pub use types::{Type, TypeDef, TypeSystem};
pub use value::Value;
