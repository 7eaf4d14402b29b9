use rust_decimal::Decimal;
use std::fmt;

/// A typed value produced by evaluating a token or resolving a macro.
///
/// Values are what a compiled predicate carries as its argument. They are
/// deliberately small: the language never evaluates predicates itself, it
/// only hands resolved arguments to whoever does.
///
/// # Examples
///
/// ```
/// use sieve_lang::Value;
/// use rust_decimal::Decimal;
///
/// let text = Value::Text("user1".to_string());
/// let count = Value::Integer(5);
/// let score = Value::Decimal(Decimal::new(125, 1));
///
/// assert_eq!(count.as_int(), Some(5));
/// assert_eq!(score.to_string(), "12.5");
/// assert_eq!(text.as_int(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Free-form text
    Text(String),

    /// Whole number (also used for epoch-millisecond timestamps)
    Integer(i64),

    /// Exact decimal number
    Decimal(Decimal),
}

impl Value {
    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Decimal(d) => d.trunc().try_into().ok(),
            Value::Text(_) => None,
        }
    }

    /// Get as decimal
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Decimal(d) => Some(*d),
            Value::Text(_) => None,
        }
    }

    /// Get as text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's representation, used in debug output
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}
