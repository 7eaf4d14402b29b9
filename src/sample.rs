//! A small built-in grammar for issue-tracker style filtering.
//!
//! Types: `any`, `number` (decimal), `timestamp` (epoch milliseconds, a
//! subtype of `number`) and `user`. Filters: `created`, `last-updated`
//! (alias `updated`), `author` (alias `by`) and `score`.
//!
//! Relative timestamps such as `3 days ago` are resolved against a clock.
//! [`grammar`] reads the system clock on every resolution; [`grammar_at`]
//! pins it to a fixed instant.

use crate::grammar::{FilterDef, Grammar, GrammarConfig, OperatorDef};
use crate::macros::{Example, MacroDef};
use crate::types::TypeDef;
use crate::value::Value;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

const MS_SEC: i64 = 1000;
const MS_MIN: i64 = 60 * MS_SEC;
const MS_HOUR: i64 = 60 * MS_MIN;
const MS_DAY: i64 = 24 * MS_HOUR;
const MS_WEEK: i64 = 7 * MS_DAY;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").unwrap());
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static USER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(user1|user2)$").unwrap());

/// Milliseconds in one of the unit words accepted by `<number> ... ago`.
fn unit_millis(word: &str) -> Option<i64> {
    match word {
        "sec" | "secs" | "second" | "seconds" => Some(MS_SEC),
        "min" | "mins" | "minute" | "minutes" => Some(MS_MIN),
        "hr" | "hrs" | "hour" | "hours" => Some(MS_HOUR),
        "day" | "days" => Some(MS_DAY),
        "wk" | "wks" | "week" | "weeks" => Some(MS_WEEK),
        _ => None,
    }
}

fn plural(scalar: Decimal, singular: &str) -> String {
    if scalar == Decimal::ONE {
        singular.to_string()
    } else {
        format!("{}s", singular)
    }
}

fn ago_examples(tokens: &[&str]) -> Vec<Example> {
    let scalar = |token: &str| Decimal::from_str(token).unwrap_or(Decimal::ONE);

    let preview = match tokens {
        [] => "3 days ago".to_string(),
        [n] => format!("{} {} ago", n, plural(scalar(*n), "day")),
        [n, unit] => {
            let unit = match unit.chars().next() {
                Some('s') => "second",
                Some('m') => "minute",
                Some('h') => "hour",
                Some('w') => "week",
                _ => "day",
            };
            format!("{} {} ago", n, plural(scalar(*n), unit))
        }
        [n, unit, ..] => format!("{} {} ago", n, unit),
    };
    vec![Example::new(preview)]
}

fn echo_or(tokens: &[&str], fallback: Example) -> Vec<Example> {
    match tokens.first() {
        Some(token) => vec![Example::new(*token)],
        None => vec![fallback],
    }
}

/// The sample grammar resolving against the system clock.
pub fn grammar() -> Grammar {
    grammar_with_clock(|| jiff::Timestamp::now().as_millisecond())
}

/// The sample grammar with "now" fixed at `now_ms` epoch milliseconds.
pub fn grammar_at(now_ms: i64) -> Grammar {
    grammar_with_clock(move || now_ms)
}

/// The sample grammar with a custom clock returning epoch milliseconds.
pub fn grammar_with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Grammar {
    // Static configuration, exercised by the tests below.
    Grammar::new(config(Arc::new(clock))).unwrap_or_else(|err| panic!("sample grammar: {}", err))
}

/// The sample configuration, for callers that want to extend it.
pub fn config(clock: Arc<dyn Fn() -> i64 + Send + Sync>) -> GrammarConfig {
    let today = {
        let clock = clock.clone();
        move || {
            let now = clock();
            now - now.rem_euclid(MS_DAY)
        }
    };

    GrammarConfig::new()
        // Types
        .with_type(TypeDef::new("any", 0).validate(|t| !t.is_empty()))
        .with_type(
            TypeDef::new("number", 1)
                .supertype("any")
                .validate(|t| NUMBER.is_match(t))
                .evaluate(|t| match Decimal::from_str(t) {
                    Ok(d) => Value::Decimal(d),
                    Err(_) => Value::Text(t.to_string()),
                }),
        )
        .with_type(
            TypeDef::new("user", 2)
                .supertype("any")
                .validate(|t| USER.is_match(t))
                .evaluate(|t| Value::Text(t.to_lowercase())),
        )
        .with_type(
            TypeDef::new("timestamp", 2)
                .supertype("number")
                .validate(|t| DIGITS.is_match(t))
                .evaluate(|t| match t.parse::<i64>() {
                    Ok(n) => Value::Integer(n),
                    Err(_) => Value::Text(t.to_string()),
                }),
        )
        // Filters
        .with_filter(FilterDef::new("created", "timestamp"))
        .with_filter(FilterDef::new("last-updated", "timestamp").aliases(["updated"]))
        .with_filter(FilterDef::new("author", "user").aliases(["by"]))
        .with_filter(FilterDef::new("score", "number"))
        // Operators
        .with_operator(OperatorDef::new("=", "any").aliases(["is"]))
        .with_operator(OperatorDef::new("!=", "any").aliases(["is-not"]))
        .with_operator(OperatorDef::new("before", "timestamp"))
        .with_operator(OperatorDef::new("after", "timestamp"))
        .with_operator(OperatorDef::new("around", "timestamp"))
        .with_operator(OperatorDef::new(">", "number").aliases(["above"]))
        .with_operator(OperatorDef::new("<", "number").aliases(["below"]))
        // Macros
        .with_macro({
            let clock = clock.clone();
            MacroDef::new(
                "<number> [sec|secs|second|seconds|min|mins|minute|minutes|hr|hrs|hour|hours|day|days|wk|wks|week|weeks] ago",
                "timestamp",
            )
            .resolve(move |argv| {
                let scalar = argv.first().and_then(|s| Decimal::from_str(s).ok());
                let unit = argv.get(1).and_then(|u| unit_millis(u));
                let resolved = scalar
                    .zip(unit)
                    .and_then(|(s, u)| s.checked_mul(Decimal::from(u)))
                    .and_then(|offset| i64::try_from(offset.trunc()).ok())
                    .and_then(|offset| clock().checked_sub(offset));
                match resolved {
                    Some(at) => Value::Integer(at),
                    None => Value::Text(argv.join(" ")),
                }
            })
            .example(ago_examples)
        })
        .with_macro({
            let clock = clock.clone();
            MacroDef::new("[now]", "timestamp")
                .resolve(move |_| Value::Integer(clock()))
                .example(|_| vec![Example::new("now")])
        })
        .with_macro({
            let today = today.clone();
            MacroDef::new("[today]", "timestamp")
                .resolve(move |_| Value::Integer(today()))
                .example(|_| vec![Example::with_detail("today", "start of the current day (UTC)")])
        })
        .with_macro(
            MacroDef::new("[yesterday]", "timestamp")
                .resolve(move |_| Value::Integer(today() - MS_DAY))
                .example(|_| vec![Example::with_detail("yesterday", "start of the previous day (UTC)")]),
        )
        .with_macro(
            MacroDef::new("[me]", "user")
                .resolve(|_| Value::Text("user1".to_string()))
                .example(|_| vec![Example::with_detail("me", "the signed-in user")]),
        )
        .with_macro(
            MacroDef::new("<timestamp>", "timestamp")
                .precedence(-1)
                .example({
                    let clock = clock.clone();
                    move |tokens| {
                        echo_or(
                            tokens,
                            Example::with_detail(clock().to_string(), "milliseconds since the Unix epoch"),
                        )
                    }
                }),
        )
        .with_macro(
            MacroDef::new("<user>", "user")
                .precedence(-1)
                .example(|tokens| match tokens.first() {
                    Some(token) => vec![Example::new(*token)],
                    None => vec![Example::new("user1"), Example::new("user2")],
                }),
        )
        .with_macro(
            MacroDef::new("<number>", "number")
                .precedence(-1)
                .example(|tokens| echo_or(tokens, Example::new("10"))),
        )
}
