//! Predicates and the placeholder shape the oracle guesses with.
//!
//! A [`PredicatePlaceholder`] always knows its filter, while the operator and
//! argument may still be unknown. A [`Predicate`] is the fully resolved
//! refinement of that shape and can only be produced by the compiler.

use crate::grammar::{Filter, Operator};
use crate::macros::Example;
use crate::types::Type;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A resolved argument: the literal text it was written as and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub ty: Arc<Type>,
    pub literal: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperatorSlot {
    Placeholder,
    Known(Arc<Operator>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentSlot {
    /// Nothing known beyond the expected type.
    Placeholder(Arc<Type>),
    /// A suggested argument and how much of the input it accounts for.
    Example {
        ty: Arc<Type>,
        example: Example,
        weight: usize,
    },
    Resolved(Argument),
}

impl ArgumentSlot {
    pub fn ty(&self) -> &Arc<Type> {
        match self {
            ArgumentSlot::Placeholder(ty) | ArgumentSlot::Example { ty, .. } => ty,
            ArgumentSlot::Resolved(argument) => &argument.ty,
        }
    }
}

/// A possibly incomplete predicate. The oracle's guesses have this shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicatePlaceholder {
    pub filter: Arc<Filter>,
    pub operator: OperatorSlot,
    pub argument: ArgumentSlot,
}

/// A single completion candidate.
pub type Guess = PredicatePlaceholder;

impl PredicatePlaceholder {
    /// Only the filter is known.
    pub fn filter_only(filter: &Arc<Filter>) -> Self {
        PredicatePlaceholder {
            filter: filter.clone(),
            operator: OperatorSlot::Placeholder,
            argument: ArgumentSlot::Placeholder(filter.ty().clone()),
        }
    }

    /// Filter and operator known, argument pending.
    pub fn with_operator(filter: &Arc<Filter>, operator: &Arc<Operator>) -> Self {
        PredicatePlaceholder {
            filter: filter.clone(),
            operator: OperatorSlot::Known(operator.clone()),
            argument: ArgumentSlot::Placeholder(filter.ty().clone()),
        }
    }

    pub fn name(&self) -> &str {
        self.filter.name()
    }

    /// The type the argument must have.
    pub fn ty(&self) -> &Arc<Type> {
        self.argument.ty()
    }

    pub fn symbol(&self) -> Option<&str> {
        match &self.operator {
            OperatorSlot::Known(op) => Some(op.symbol()),
            OperatorSlot::Placeholder => None,
        }
    }

    /// The argument text if one is known, resolved or suggested.
    pub fn example(&self) -> Option<&str> {
        match &self.argument {
            ArgumentSlot::Placeholder(_) => None,
            ArgumentSlot::Example { example, .. } => Some(&example.preview),
            ArgumentSlot::Resolved(argument) => Some(&argument.literal),
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match &self.argument {
            ArgumentSlot::Example { example, .. } => example.detail.as_deref(),
            _ => None,
        }
    }

    /// Characters of input this guess accounts for; zero unless an argument
    /// was expanded.
    pub fn weight(&self) -> usize {
        match &self.argument {
            ArgumentSlot::Example { weight, .. } => *weight,
            _ => 0,
        }
    }

    /// Renders the guess as literal text. With placeholders, unknown parts
    /// show as `<operator>` and `<type>`; without them they collapse into a
    /// single trailing space so the text is a valid prefix to keep typing.
    pub fn render(&self, with_placeholders: bool) -> String {
        let mut text = self.name().to_string();
        match self.symbol() {
            Some(symbol) => {
                text.push(' ');
                text.push_str(symbol);
                match self.example() {
                    Some(example) => {
                        text.push(' ');
                        text.push_str(example);
                    }
                    None if with_placeholders => text.push_str(&format!(" <{}>", self.ty())),
                    None => text.push(' '),
                }
            }
            None if with_placeholders => text.push_str(&format!(" <operator> <{}>", self.ty())),
            None => text.push(' '),
        }
        text
    }

    /// The resolved predicate, when every part is resolved.
    pub fn into_predicate(self) -> Option<Predicate> {
        match (self.operator, self.argument) {
            (OperatorSlot::Known(operator), ArgumentSlot::Resolved(argument)) => Some(Predicate {
                filter: self.filter,
                operator,
                argument,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for PredicatePlaceholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(true))
    }
}

/// A fully resolved `filter operator argument` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    filter: Arc<Filter>,
    operator: Arc<Operator>,
    argument: Argument,
}

impl Predicate {
    pub(crate) fn new(filter: Arc<Filter>, operator: Arc<Operator>, argument: Argument) -> Self {
        Predicate {
            filter,
            operator,
            argument,
        }
    }

    pub fn filter(&self) -> &Arc<Filter> {
        &self.filter
    }

    pub fn operator(&self) -> &Arc<Operator> {
        &self.operator
    }

    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    pub fn value(&self) -> &Value {
        &self.argument.value
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.filter.name(),
            self.operator.symbol(),
            self.argument.literal
        )
    }
}

impl From<Predicate> for PredicatePlaceholder {
    fn from(predicate: Predicate) -> Self {
        PredicatePlaceholder {
            filter: predicate.filter,
            operator: OperatorSlot::Known(predicate.operator),
            argument: ArgumentSlot::Resolved(predicate.argument),
        }
    }
}
