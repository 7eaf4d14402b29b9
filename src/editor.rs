//! Editor state machine.
//!
//! Every state here is an immutable value; each transition returns a new
//! one. The editor keeps the literal being typed, the predicates already
//! committed, the oracle's current completions with a pending selection, and
//! an undo/redo history of input snapshots.
//!
//! ```
//! use sieve_lang::editor::{Editor, Event, SpecialKey};
//! use sieve_lang::sample;
//!
//! let grammar = sample::grammar_at(0);
//! let editor = Editor::new(&grammar)
//!     .apply(Event::Change("cre".into()))
//!     .apply(Event::Key(SpecialKey::Tab));
//! assert_eq!(editor.input().value(), "created ");
//!
//! let editor = editor
//!     .apply(Event::Change("created before now".into()))
//!     .apply(Event::Key(SpecialKey::Enter));
//! assert_eq!(editor.input().value(), "");
//! assert_eq!(editor.input().committed().len(), 1);
//! ```

use crate::{
    compiler::{SyntaxError, compile_predicate},
    ghost::ghost,
    grammar::Grammar,
    oracle::guess,
    predicate::{Guess, Predicate},
};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The literal being edited plus everything committed before it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorInputState {
    value: String,
    committed: Vec<Predicate>,
}

impl EditorInputState {
    pub fn new(value: impl Into<String>, committed: Vec<Predicate>) -> Self {
        EditorInputState {
            value: value.into(),
            committed,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn committed(&self) -> &[Predicate] {
        &self.committed
    }

    pub fn set_value(&self, value: impl Into<String>) -> Self {
        EditorInputState {
            value: value.into(),
            committed: self.committed.clone(),
        }
    }

    /// Appends `predicate` and clears the literal.
    pub fn commit_predicate(&self, predicate: Predicate) -> Self {
        let mut committed = self.committed.clone();
        committed.push(predicate);
        EditorInputState {
            value: String::new(),
            committed,
        }
    }

    /// Moves the last committed predicate back into the literal as text.
    pub fn pop_predicate(&self) -> Self {
        let mut committed = self.committed.clone();
        match committed.pop() {
            Some(popped) => EditorInputState {
                value: popped.to_string(),
                committed,
            },
            None => EditorInputState {
                value: String::new(),
                committed,
            },
        }
    }
}

/// How a key press moves the pending selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingChange {
    None,
    Up,
    Down,
}

/// Current completions and which one, if any, is pending acceptance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorAdviceState {
    completions: Vec<Guess>,
    pending: Option<usize>,
}

impl EditorAdviceState {
    /// `pending` is clamped into range; it is dropped when there is nothing
    /// to select.
    pub fn new(pending: Option<usize>, completions: Vec<Guess>) -> Self {
        let pending = match completions.len() {
            0 => None,
            len => pending.map(|i| i.min(len - 1)),
        };
        EditorAdviceState {
            completions,
            pending,
        }
    }

    pub fn completions(&self) -> &[Guess] {
        &self.completions
    }

    pub fn pending_index(&self) -> Option<usize> {
        self.pending
    }

    pub fn pending(&self) -> Option<&Guess> {
        self.pending.and_then(|i| self.completions.get(i))
    }

    pub fn set_pending(&self, change: PendingChange) -> Self {
        let pending = match (change, self.pending) {
            (PendingChange::None, _) => None,
            (_, _) if self.completions.is_empty() => None,
            (_, None) => Some(0),
            (PendingChange::Up, Some(i)) => Some(i.saturating_sub(1)),
            (PendingChange::Down, Some(i)) => Some(i + 1),
        };
        EditorAdviceState::new(pending, self.completions.clone())
    }
}

/// Discrete keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Tab,
    Enter,
    Up,
    Down,
    Esc,
    Undo,
    Redo,
    Backspace,
}

impl FromStr for SpecialKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab" => Ok(SpecialKey::Tab),
            "enter" | "return" => Ok(SpecialKey::Enter),
            "up" => Ok(SpecialKey::Up),
            "down" => Ok(SpecialKey::Down),
            "esc" | "escape" => Ok(SpecialKey::Esc),
            "undo" => Ok(SpecialKey::Undo),
            "redo" => Ok(SpecialKey::Redo),
            "backspace" => Ok(SpecialKey::Backspace),
            other => Err(format!("unknown key: \"{}\"", other)),
        }
    }
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpecialKey::Tab => "tab",
            SpecialKey::Enter => "enter",
            SpecialKey::Up => "up",
            SpecialKey::Down => "down",
            SpecialKey::Esc => "esc",
            SpecialKey::Undo => "undo",
            SpecialKey::Redo => "redo",
            SpecialKey::Backspace => "backspace",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The literal now reads this text.
    Change(String),
    Key(SpecialKey),
    /// Replace the literal with the completion at this index.
    Pick(usize),
}

/// Past and future input snapshots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    past: Vec<EditorInputState>,
    future: Vec<EditorInputState>,
}

impl History {
    pub fn past(&self) -> &[EditorInputState] {
        &self.past
    }

    pub fn future(&self) -> &[EditorInputState] {
        &self.future
    }
}

#[derive(Debug, Clone)]
pub struct Editor<'g> {
    grammar: &'g Grammar,
    input: EditorInputState,
    advice: EditorAdviceState,
    history: History,
    last_error: Option<SyntaxError>,
}

impl<'g> Editor<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        let input = EditorInputState::default();
        Editor {
            grammar,
            advice: Self::advise(grammar, &input),
            input,
            history: History::default(),
            last_error: None,
        }
    }

    pub fn input(&self) -> &EditorInputState {
        &self.input
    }

    pub fn advice(&self) -> &EditorAdviceState {
        &self.advice
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Why the last `enter` did not commit, until the input changes again.
    pub fn last_error(&self) -> Option<&SyntaxError> {
        self.last_error.as_ref()
    }

    /// The not-yet-typed remainder of the pending completion.
    pub fn ghost(&self) -> String {
        self.advice
            .pending()
            .map(|pending| ghost(self.input.value(), pending))
            .unwrap_or_default()
    }

    pub fn apply(&self, event: Event) -> Self {
        match event {
            Event::Change(text) => self.update_input(self.input.set_value(text)),
            Event::Key(key) => self.key(key),
            Event::Pick(index) => match self.advice.completions().get(index) {
                Some(completion) => self.update_input(self.input.set_value(completion.render(false))),
                None => self.clone(),
            },
        }
    }

    fn key(&self, key: SpecialKey) -> Self {
        match key {
            SpecialKey::Backspace if self.input.value().is_empty() => {
                self.update_input(self.input.pop_predicate())
            }
            SpecialKey::Backspace => self.clone(),
            SpecialKey::Tab => {
                let ghost = self.ghost();
                if ghost.is_empty() {
                    return self.clone();
                }
                let value = format!("{}{}", self.input.value(), ghost);
                self.update_input(self.input.set_value(value))
            }
            SpecialKey::Enter => match compile_predicate(self.input.value(), self.grammar) {
                Ok(predicate) => self.update_input(self.input.commit_predicate(predicate)),
                Err(err) => {
                    debug!(%err, "commit rejected");
                    Editor {
                        last_error: Some(err),
                        ..self.clone()
                    }
                }
            },
            SpecialKey::Esc => self.with_pending(PendingChange::None),
            SpecialKey::Up => self.with_pending(PendingChange::Up),
            SpecialKey::Down => self.with_pending(PendingChange::Down),
            SpecialKey::Undo => self.undo(),
            SpecialKey::Redo => self.redo(),
        }
    }

    fn with_pending(&self, change: PendingChange) -> Self {
        Editor {
            advice: self.advice.set_pending(change),
            ..self.clone()
        }
    }

    /// Records the current input in history, then moves to `input`.
    fn update_input(&self, input: EditorInputState) -> Self {
        let mut history = self.history.clone();
        history.past.push(self.input.clone());
        history.future.clear();
        self.replace_input(input, history)
    }

    fn replace_input(&self, input: EditorInputState, history: History) -> Self {
        Editor {
            grammar: self.grammar,
            advice: Self::advise(self.grammar, &input),
            input,
            history,
            last_error: None,
        }
    }

    fn undo(&self) -> Self {
        let mut history = self.history.clone();
        match history.past.pop() {
            Some(previous) => {
                history.future.push(self.input.clone());
                self.replace_input(previous, history)
            }
            None => self.clone(),
        }
    }

    fn redo(&self) -> Self {
        let mut history = self.history.clone();
        match history.future.pop() {
            Some(next) => {
                history.past.push(self.input.clone());
                self.replace_input(next, history)
            }
            None => self.clone(),
        }
    }

    fn advise(grammar: &Grammar, input: &EditorInputState) -> EditorAdviceState {
        EditorAdviceState::new(Some(0), guess(input.value(), grammar))
    }
}
