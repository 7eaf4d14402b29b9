//! Macro templates: token patterns that resolve into typed argument values.
//!
//! A template is a whitespace separated list of slots:
//!
//! - `<name>` is a parameter slot. It accepts one token that the type `name`
//!   validates.
//! - `[a|b|c]` is a keyword slot accepting exactly one of the aliases.
//! - a bare word is a keyword slot with that single alias.
//!
//! For example `<number> [day|days|week|weeks] ago` matches `3 weeks ago`.

use crate::grammar::ConfigError;
use crate::lexer::{Lexer, RawKind, Token, split};
use crate::types::{Type, TypeSystem};
use crate::value::Value;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::trace;

static PARAMETER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<(.+)>$").unwrap());
static KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^|\]]+(?:\|[^|\]]+)*)\]$").unwrap());

/// Resolves the matched lexemes, in slot order, into a value.
pub type Resolver = dyn Fn(&[&str]) -> Value + Send + Sync;

/// Produces human-readable examples from however many lexemes matched so far.
pub type ExampleFn = dyn Fn(&[&str]) -> Vec<Example> + Send + Sync;

/// A human-readable example of what a macro accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub preview: String,
    pub detail: Option<String>,
}

impl Example {
    pub fn new(preview: impl Into<String>) -> Self {
        Example {
            preview: preview.into(),
            detail: None,
        }
    }

    pub fn with_detail(preview: impl Into<String>, detail: impl Into<String>) -> Self {
        Example {
            preview: preview.into(),
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.preview)
    }
}

impl From<&str> for Example {
    fn from(preview: &str) -> Self {
        Example::new(preview)
    }
}

impl From<String> for Example {
    fn from(preview: String) -> Self {
        Example::new(preview)
    }
}

/// One compiled template slot.
#[derive(Debug, Clone)]
pub enum Slot {
    Parameter { name: String, ty: Arc<Type> },
    Keyword { aliases: Vec<String> },
}

impl Slot {
    fn accepts(&self, lexeme: &str) -> bool {
        match self {
            Slot::Parameter { ty, .. } => ty.validate(lexeme),
            Slot::Keyword { aliases } => aliases.iter().any(|a| a == lexeme),
        }
    }

    fn is_prefix_of_alias(&self, lexeme: &str) -> bool {
        match self {
            Slot::Parameter { .. } => false,
            Slot::Keyword { aliases } => aliases.iter().any(|a| a.starts_with(lexeme)),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Parameter { name, .. } => write!(f, "<{}>", name),
            Slot::Keyword { aliases } => write!(f, "{}", aliases.first().map_or("", String::as_str)),
        }
    }
}

/// Outcome of matching a macro against upcoming tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    /// Every slot matched.
    Success { tokens: Vec<Token>, value: Value },
    /// Matching stopped early. `partial` is set when the input looks like an
    /// unfinished instance of the template rather than something else entirely.
    Failure { tokens: Vec<Token>, partial: bool },
}

impl Attempt {
    pub fn tokens(&self) -> &[Token] {
        match self {
            Attempt::Success { tokens, .. } | Attempt::Failure { tokens, .. } => tokens,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Attempt::Success { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Attempt::Failure { partial: true, .. })
    }

    /// Total characters consumed.
    pub fn weight(&self) -> usize {
        self.tokens().iter().map(Token::len).sum()
    }

    pub fn lexemes(&self) -> Vec<&str> {
        self.tokens().iter().map(|t| t.lexeme.as_str()).collect()
    }
}

/// Declaration of a macro.
#[derive(Clone)]
pub struct MacroDef {
    pub template: String,
    pub ty: String,
    pub precedence: i32,
    resolve: Option<Arc<Resolver>>,
    example: Option<Arc<ExampleFn>>,
}

impl MacroDef {
    pub fn new(template: impl Into<String>, ty: impl Into<String>) -> Self {
        MacroDef {
            template: template.into(),
            ty: ty.into(),
            precedence: 0,
            resolve: None,
            example: None,
        }
    }

    pub fn precedence(mut self, precedence: i32) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn resolve(mut self, f: impl Fn(&[&str]) -> Value + Send + Sync + 'static) -> Self {
        self.resolve = Some(Arc::new(f));
        self
    }

    pub fn example(mut self, f: impl Fn(&[&str]) -> Vec<Example> + Send + Sync + 'static) -> Self {
        self.example = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for MacroDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroDef")
            .field("template", &self.template)
            .field("ty", &self.ty)
            .field("precedence", &self.precedence)
            .finish_non_exhaustive()
    }
}

/// A compiled macro bound to the types of its grammar.
pub struct Macro {
    template: String,
    ty: Arc<Type>,
    precedence: i32,
    syntax: Vec<Slot>,
    resolve: Option<Arc<Resolver>>,
    example: Option<Arc<ExampleFn>>,
}

impl Macro {
    pub fn compile(def: MacroDef, types: &TypeSystem) -> Result<Self, ConfigError> {
        let ty = types.get(&def.ty)?.clone();
        let syntax = parse_template(&def.template, types)?;

        Ok(Macro {
            template: def.template,
            ty,
            precedence: def.precedence,
            syntax,
            resolve: def.resolve,
            example: def.example,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }

    pub fn precedence(&self) -> i32 {
        self.precedence
    }

    pub fn syntax(&self) -> &[Slot] {
        &self.syntax
    }

    /// Consumes tokens from `lexer` slot by slot.
    ///
    /// The lexer is left wherever matching stopped; callers bracket this with
    /// a save and an undo or commit.
    pub fn attempt(&self, lexer: &mut Lexer) -> Attempt {
        let mut tokens = Vec::with_capacity(self.syntax.len());

        for slot in &self.syntax {
            let Some(token) = lexer.next() else {
                let partial = !tokens.is_empty();
                return Attempt::Failure { tokens, partial };
            };

            if slot.accepts(&token.lexeme) {
                tokens.push(token);
            } else if slot.is_prefix_of_alias(&token.lexeme) {
                tokens.push(token);
                return Attempt::Failure {
                    tokens,
                    partial: true,
                };
            } else {
                let partial = !tokens.is_empty();
                return Attempt::Failure { tokens, partial };
            }
        }

        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        let value = self.resolve(&lexemes);
        trace!(template = %self.template, %value, "macro matched");
        Attempt::Success { tokens, value }
    }

    /// Resolves a full match. Without a resolver, a template made of a single
    /// parameter evaluates it with that type and anything else becomes text.
    pub fn resolve(&self, lexemes: &[&str]) -> Value {
        if let Some(resolve) = &self.resolve {
            return resolve(lexemes);
        }

        match (self.syntax.as_slice(), lexemes) {
            ([Slot::Parameter { ty, .. }], [lexeme]) => ty.evaluate(lexeme),
            _ => Value::Text(lexemes.join(" ")),
        }
    }

    /// One or more examples given the lexemes matched so far (possibly none).
    pub fn examples(&self, matched: &[&str]) -> Vec<Example> {
        let examples = self
            .example
            .as_ref()
            .map(|example| example(matched))
            .unwrap_or_default();

        if examples.is_empty() {
            vec![Example::new(self.fill(matched))]
        } else {
            examples
        }
    }

    /// The template with its leading slots replaced by `matched`.
    fn fill(&self, matched: &[&str]) -> String {
        self.syntax
            .iter()
            .enumerate()
            .map(|(i, slot)| match matched.get(i) {
                Some(lexeme) => lexeme.to_string(),
                None => slot.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Macro")
            .field("template", &self.template)
            .field("ty", &self.ty.name())
            .field("precedence", &self.precedence)
            .field("syntax", &self.syntax)
            .finish_non_exhaustive()
    }
}

fn parse_template(template: &str, types: &TypeSystem) -> Result<Vec<Slot>, ConfigError> {
    let invalid = |token: &str| ConfigError::InvalidTemplate {
        template: template.to_string(),
        token: token.to_string(),
    };

    let syntax = split(template)
        .into_iter()
        .filter(|t| t.kind == RawKind::Word)
        .map(|t| {
            let word = t.lexeme.as_str();
            if word.starts_with('<') {
                let caps = PARAMETER.captures(word).ok_or_else(|| invalid(word))?;
                let name = caps[1].to_string();
                let ty = types.get(&name)?.clone();
                Ok(Slot::Parameter { name, ty })
            } else if word.starts_with('[') {
                let caps = KEYWORD.captures(word).ok_or_else(|| invalid(word))?;
                let aliases = caps[1].split('|').map(str::to_string).collect();
                Ok(Slot::Keyword { aliases })
            } else {
                Ok(Slot::Keyword {
                    aliases: vec![word.to_string()],
                })
            }
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    if syntax.is_empty() {
        return Err(ConfigError::EmptyTemplate(template.to_string()));
    }
    Ok(syntax)
}
