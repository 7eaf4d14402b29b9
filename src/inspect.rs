//! Structural JSON projections for developer inspection.
//!
//! These are for looking at grammars, guesses and predicates while
//! debugging. The shape is not a stable format.
//!
//! ```
//! use sieve_lang::sample;
//!
//! let grammar = sample::grammar_at(0);
//! let json = grammar.to_json();
//! assert_eq!(json["types"].as_array().unwrap().last().unwrap(), "*");
//! assert_eq!(json["filters"][0]["name"], "created");
//! ```

use crate::editor::{EditorAdviceState, EditorInputState};
use crate::grammar::{Filter, Grammar, Operator};
use crate::macros::{Example, Macro};
use crate::predicate::{ArgumentSlot, OperatorSlot, Predicate, PredicatePlaceholder};
use crate::types::Type;
use crate::value::Value;
use serde_json::{Map, json};

/// Inserts `aliases` into `object` unless there are none.
fn with_aliases(mut object: serde_json::Value, aliases: &[String]) -> serde_json::Value {
    if !aliases.is_empty() {
        if let Some(map) = object.as_object_mut() {
            map.insert("aliases".to_string(), json!(aliases));
        }
    }
    object
}

impl Type {
    pub fn to_json(&self) -> serde_json::Value {
        json!(self.name())
    }
}

impl Value {
    /// The bare JSON value, without type information.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(s) => json!(s),
            Value::Integer(n) => json!(n),
            Value::Decimal(d) => json!(d.to_string()),
        }
    }
}

impl Filter {
    pub fn to_json(&self) -> serde_json::Value {
        with_aliases(
            json!({ "name": self.name(), "type": self.ty().to_json() }),
            self.aliases(),
        )
    }
}

impl Operator {
    pub fn to_json(&self) -> serde_json::Value {
        with_aliases(
            json!({ "symbol": self.symbol(), "type": self.ty().to_json() }),
            self.aliases(),
        )
    }
}

impl Macro {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "template": self.template(),
            "type": self.ty().to_json(),
            "precedence": self.precedence(),
        })
    }
}

impl Example {
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = Map::new();
        map.insert("preview".to_string(), json!(self.preview));
        if let Some(detail) = &self.detail {
            map.insert("detail".to_string(), json!(detail));
        }
        serde_json::Value::Object(map)
    }
}

impl Grammar {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "types": self.types().iter().map(|t| t.to_json()).collect::<Vec<_>>(),
            "filters": self.filters().iter().map(|f| f.to_json()).collect::<Vec<_>>(),
            "operators": self.operators().iter().map(|o| o.to_json()).collect::<Vec<_>>(),
            "macros": self.macros().iter().map(|m| m.to_json()).collect::<Vec<_>>(),
        })
    }
}

impl Predicate {
    pub fn to_json(&self) -> serde_json::Value {
        let argument = self.argument();
        json!({
            "filter": self.filter().to_json(),
            "operator": self.operator().to_json(),
            "argument": {
                "type": argument.ty.to_json(),
                "literal": argument.literal,
                "value": argument.value.to_json(),
            },
        })
    }
}

impl PredicatePlaceholder {
    pub fn to_json(&self) -> serde_json::Value {
        let operator = match &self.operator {
            OperatorSlot::Placeholder => json!({ "placeholder": true }),
            OperatorSlot::Known(op) => op.to_json(),
        };
        let argument = match &self.argument {
            ArgumentSlot::Placeholder(ty) => json!({ "placeholder": true, "type": ty.to_json() }),
            ArgumentSlot::Example { ty, example, weight } => json!({
                "type": ty.to_json(),
                "example": example.to_json(),
                "weight": weight,
            }),
            ArgumentSlot::Resolved(argument) => json!({
                "type": argument.ty.to_json(),
                "literal": argument.literal,
                "value": argument.value.to_json(),
            }),
        };
        json!({
            "filter": self.filter.to_json(),
            "operator": operator,
            "argument": argument,
            "weight": self.weight(),
        })
    }
}

impl EditorInputState {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "value": self.value(),
            "committed": self.committed().iter().map(|p| p.to_json()).collect::<Vec<_>>(),
        })
    }
}

impl EditorAdviceState {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "pending": self.pending_index(),
            "completions": self.completions().iter().map(|c| c.to_json()).collect::<Vec<_>>(),
        })
    }
}
