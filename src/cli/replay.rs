//! Drive the editor from a script
//!
//! A script is one step per line:
//!
//! ```text
//! # comments and blank lines are skipped
//! > cre
//! tab
//! > created before now
//! enter
//! pick 2
//! ```
//!
//! `> text` replaces the literal with everything after the `> ` (trailing
//! whitespace included), `pick N` accepts the N-th completion, and any other
//! line names a key.

use super::CliError;
use crate::editor::{Editor, Event, SpecialKey};
use crate::Grammar;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Set(String),
    Key(SpecialKey),
    Pick(usize),
}

impl From<ReplayStep> for Event {
    fn from(step: ReplayStep) -> Self {
        match step {
            ReplayStep::Set(text) => Event::Change(text),
            ReplayStep::Key(key) => Event::Key(key),
            ReplayStep::Pick(index) => Event::Pick(index),
        }
    }
}

/// Parses a script into steps. Line numbers in errors are 1-based.
pub fn parse_script(script: &str) -> Result<Vec<ReplayStep>, CliError> {
    let mut steps = Vec::new();

    for (index, line) in script.lines().enumerate() {
        let script_error = |message: String| CliError::Script {
            line: index + 1,
            message,
        };

        if let Some(text) = line.strip_prefix('>') {
            let text = text.strip_prefix(' ').unwrap_or(text);
            steps.push(ReplayStep::Set(text.to_string()));
            continue;
        }

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(n) = line.strip_prefix("pick") {
            let n = n
                .trim()
                .parse::<usize>()
                .map_err(|_| script_error(format!("expected an index after pick: \"{}\"", line)))?;
            steps.push(ReplayStep::Pick(n));
            continue;
        }

        let key = line.parse::<SpecialKey>().map_err(script_error)?;
        steps.push(ReplayStep::Key(key));
    }

    Ok(steps)
}

/// What the editor looked like once the script ran out.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub input: String,
    pub committed: Vec<String>,
    pub pending: Option<String>,
    pub ghost: String,
    pub error: Option<String>,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "input: {:?}", self.input)?;
        for predicate in &self.committed {
            writeln!(f, "committed: {}", predicate)?;
        }
        match &self.pending {
            Some(pending) => writeln!(f, "pending: {} (ghost: {:?})", pending, self.ghost)?,
            None => writeln!(f, "pending: none")?,
        }
        if let Some(error) = &self.error {
            writeln!(f, "error: {}", error)?;
        }
        Ok(())
    }
}

/// Runs `script` through a fresh editor on `grammar`.
pub fn execute_replay(script: &str, grammar: &Grammar) -> Result<ReplayReport, CliError> {
    let editor = parse_script(script)?
        .into_iter()
        .fold(Editor::new(grammar), |editor, step| editor.apply(step.into()));

    Ok(ReplayReport {
        input: editor.input().value().to_string(),
        committed: editor.input().committed().iter().map(|p| p.to_string()).collect(),
        pending: editor.advice().pending().map(|g| g.to_string()),
        ghost: editor.ghost(),
        error: editor.last_error().map(|e| e.to_string()),
    })
}
