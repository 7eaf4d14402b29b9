//! Human-readable and JSON descriptions of a grammar

use super::{CliError, render_json};
use crate::Grammar;
use std::fmt::Write;

/// The grammar's JSON projection.
pub fn describe_grammar(grammar: &Grammar, pretty: bool) -> Result<String, CliError> {
    render_json(&grammar.to_json(), pretty)
}

/// A plain-text reference card listing what can be typed.
pub fn grammar_overview(grammar: &Grammar) -> String {
    let mut out = String::new();

    out.push_str("FILTERS\n\n");
    for filter in grammar.filters() {
        let _ = write!(out, "  {:<16}{}", filter.name(), filter.ty());
        if !filter.aliases().is_empty() {
            let _ = write!(out, "  (also: {})", filter.aliases().join(", "));
        }
        out.push('\n');
    }

    out.push_str("\nOPERATORS\n\n");
    for operator in grammar.operators() {
        let _ = write!(out, "  {:<16}{}", operator.symbol(), operator.ty());
        if !operator.aliases().is_empty() {
            let _ = write!(out, "  (also: {})", operator.aliases().join(", "));
        }
        out.push('\n');
    }

    out.push_str("\nARGUMENTS\n\n");
    for candidate in grammar.macros() {
        let _ = writeln!(out, "  {:<16}{}", candidate.ty().name(), candidate.template());
    }

    out
}
