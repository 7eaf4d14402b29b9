//! CLI support for sieve-lang
//!
//! The command implementations live here so they can be driven
//! programmatically; `main.rs` only parses arguments and prints.

mod check;
mod describe;
mod guess;
mod replay;

pub use check::{CheckOptions, execute_check};
pub use describe::{describe_grammar, grammar_overview};
pub use guess::{GuessOptions, execute_guess};
pub use replay::{ReplayReport, ReplayStep, execute_replay, parse_script};

use crate::{ConfigError, Grammar, SyntaxError, sample};
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("invalid grammar: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A replay script line that is neither text nor a key.
    #[error("script line {line}: {message}")]
    Script { line: usize, message: String },
}

/// The grammar the commands run against: the sample grammar on the system
/// clock.
pub fn load_grammar() -> Result<Grammar, CliError> {
    let clock = Arc::new(|| jiff::Timestamp::now().as_millisecond());
    Ok(Grammar::new(sample::config(clock))?)
}

/// Serializes `value` compactly or pretty-printed.
pub fn render_json(value: &serde_json::Value, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    Ok(json)
}
