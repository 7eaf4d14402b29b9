//! Ranked completions for a partial literal

use super::CliError;
use crate::{Grammar, guess};

/// Options for the guess command
#[derive(Debug, Clone, Default)]
pub struct GuessOptions {
    /// The partial literal typed so far
    pub partial: String,
    /// One JSON projection per line instead of `weight<TAB>rendering`
    pub json: bool,
}

/// One output line per guess, best first.
pub fn execute_guess(options: &GuessOptions, grammar: &Grammar) -> Result<Vec<String>, CliError> {
    guess(&options.partial, grammar)
        .iter()
        .map(|g| -> Result<String, CliError> {
            if options.json {
                Ok(serde_json::to_string(&g.to_json())?)
            } else {
                Ok(format!("{}\t{}", g.weight(), g))
            }
        })
        .collect()
}
