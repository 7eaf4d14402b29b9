//! Compile a literal and project the resulting predicate

use super::CliError;
use crate::{Grammar, compile_predicate};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The predicate literal to compile
    pub literal: String,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Compiles `options.literal` against `grammar`.
pub fn execute_check(options: &CheckOptions, grammar: &Grammar) -> Result<serde_json::Value, CliError> {
    let predicate = compile_predicate(&options.literal, grammar)?;
    Ok(predicate.to_json())
}
