//! The grammar registry: types, filters, operators and macros.
//!
//! A [`Grammar`] is built once from a data-only [`GrammarConfig`] and is
//! read-only afterwards. Construction fails fast on the first
//! [`ConfigError`]; there is no partially valid grammar.
//!
//! Compatibility between filters, operators and macros always goes through
//! the supertype chain, never exact type equality: an operator declared for
//! `number` is offered for a filter typed `timestamp` when `timestamp` is a
//! subtype of `number`, and an operator declared for `*` fits everything.
//!
//! ```
//! use sieve_lang::grammar::{FilterDef, Grammar, GrammarConfig, OperatorDef};
//! use sieve_lang::types::TypeDef;
//!
//! let grammar = Grammar::new(
//!     GrammarConfig::new()
//!         .with_type(TypeDef::new("number", 1))
//!         .with_type(TypeDef::new("timestamp", 2).supertype("number"))
//!         .with_filter(FilterDef::new("created", "timestamp"))
//!         .with_operator(OperatorDef::new("=", "*"))
//!         .with_operator(OperatorDef::new(">", "number").aliases(["above"])),
//! )
//! .unwrap();
//!
//! let created = grammar.filter("created").unwrap();
//! let symbols: Vec<&str> = grammar
//!     .operators_compatible_with(created.ty())
//!     .iter()
//!     .map(|op| op.symbol())
//!     .collect();
//! assert_eq!(symbols, ["=", ">"]);
//! ```

use crate::macros::{Macro, MacroDef};
use crate::types::{Type, TypeDef, TypeSystem};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while building a [`Grammar`]. These are startup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("redeclared type: \"{0}\"")]
    DuplicateType(String),

    #[error("unknown type: \"{0}\"")]
    UnknownType(String),

    #[error("redeclared filter name or alias: \"{0}\"")]
    DuplicateFilter(String),

    #[error("redeclared operator symbol or alias: \"{0}\"")]
    DuplicateOperator(String),

    #[error("invalid macro token \"{token}\" in template \"{template}\"")]
    InvalidTemplate { template: String, token: String },

    #[error("macro template is empty: \"{0}\"")]
    EmptyTemplate(String),
}

/// A named, typed field that predicates constrain.
#[derive(Debug)]
pub struct Filter {
    name: String,
    ty: Arc<Type>,
    aliases: Vec<String>,
}

impl Filter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The name followed by every alias.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Exact match against the name or an alias.
    pub fn matches(&self, word: &str) -> bool {
        self.spellings().any(|s| s == word)
    }

    pub fn prefixed_by(&self, prefix: &str) -> bool {
        self.spellings().any(|s| s.starts_with(prefix))
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A comparison symbol restricted to a type and its subtypes.
#[derive(Debug)]
pub struct Operator {
    symbol: String,
    ty: Arc<Type>,
    aliases: Vec<String>,
}

impl Operator {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.symbol.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn matches(&self, word: &str) -> bool {
        self.spellings().any(|s| s == word)
    }

    pub fn prefixed_by(&self, prefix: &str) -> bool {
        self.spellings().any(|s| s.starts_with(prefix))
    }

    /// Whether a filter of type `ty` may use this operator.
    pub fn accepts(&self, ty: &Type) -> bool {
        ty.is_subtype_of(&self.ty)
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

/// Declaration of a filter.
#[derive(Debug, Clone)]
pub struct FilterDef {
    pub name: String,
    pub ty: String,
    pub aliases: Vec<String>,
}

impl FilterDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        FilterDef {
            name: name.into(),
            ty: ty.into(),
            aliases: Vec::new(),
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

/// Declaration of an operator.
#[derive(Debug, Clone)]
pub struct OperatorDef {
    pub symbol: String,
    pub ty: String,
    pub aliases: Vec<String>,
}

impl OperatorDef {
    pub fn new(symbol: impl Into<String>, ty: impl Into<String>) -> Self {
        OperatorDef {
            symbol: symbol.into(),
            ty: ty.into(),
            aliases: Vec::new(),
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

/// Everything needed to build a [`Grammar`].
///
/// Entries are applied in order: all types, then filters, then operators,
/// then macros. Declaration order is preserved wherever ties occur.
#[derive(Debug, Clone, Default)]
pub struct GrammarConfig {
    pub types: Vec<TypeDef>,
    pub filters: Vec<FilterDef>,
    pub operators: Vec<OperatorDef>,
    pub macros: Vec<MacroDef>,
}

impl GrammarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    pub fn with_filter(mut self, def: FilterDef) -> Self {
        self.filters.push(def);
        self
    }

    pub fn with_operator(mut self, def: OperatorDef) -> Self {
        self.operators.push(def);
        self
    }

    pub fn with_macro(mut self, def: MacroDef) -> Self {
        self.macros.push(def);
        self
    }
}

/// An immutable, validated grammar.
#[derive(Debug)]
pub struct Grammar {
    types: TypeSystem,
    filters: Vec<Arc<Filter>>,
    operators: Vec<Arc<Operator>>,
    /// Sorted by descending precedence.
    macros: Vec<Arc<Macro>>,
}

impl Grammar {
    pub fn new(config: GrammarConfig) -> Result<Self, ConfigError> {
        let mut grammar = Grammar {
            types: TypeSystem::new(),
            filters: Vec::new(),
            operators: Vec::new(),
            macros: Vec::new(),
        };

        for def in config.types {
            grammar.types.register(def)?;
        }
        for def in config.filters {
            grammar.add_filter(def)?;
        }
        for def in config.operators {
            grammar.add_operator(def)?;
        }
        for def in config.macros {
            grammar.add_macro(def)?;
        }

        Ok(grammar)
    }

    fn add_filter(&mut self, def: FilterDef) -> Result<(), ConfigError> {
        let ty = self.types.get(&def.ty)?.clone();
        let filter = Filter {
            name: def.name,
            ty,
            aliases: def.aliases,
        };

        if let Some(taken) = filter
            .spellings()
            .find(|s| self.filter(s).is_some() || filter.spellings().filter(|o| o == s).count() > 1)
        {
            return Err(ConfigError::DuplicateFilter(taken.to_string()));
        }

        debug!(name = %filter.name, ty = %filter.ty, "registered filter");
        self.filters.push(Arc::new(filter));
        Ok(())
    }

    fn add_operator(&mut self, def: OperatorDef) -> Result<(), ConfigError> {
        let ty = self.types.get(&def.ty)?.clone();
        let operator = Operator {
            symbol: def.symbol,
            ty,
            aliases: def.aliases,
        };

        if let Some(taken) = operator
            .spellings()
            .find(|s| self.operator(s).is_some() || operator.spellings().filter(|o| o == s).count() > 1)
        {
            return Err(ConfigError::DuplicateOperator(taken.to_string()));
        }

        debug!(symbol = %operator.symbol, ty = %operator.ty, "registered operator");
        self.operators.push(Arc::new(operator));
        Ok(())
    }

    fn add_macro(&mut self, def: MacroDef) -> Result<(), ConfigError> {
        let compiled = Macro::compile(def, &self.types)?;
        debug!(template = %compiled.template(), ty = %compiled.ty(), "registered macro");
        self.macros.push(Arc::new(compiled));
        self.macros.sort_by(|a, b| b.precedence().cmp(&a.precedence()));
        Ok(())
    }

    pub fn types(&self) -> &TypeSystem {
        &self.types
    }

    pub fn ty(&self, name: &str) -> Result<&Arc<Type>, ConfigError> {
        self.types.get(name)
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    pub fn filters(&self) -> &[Arc<Filter>] {
        &self.filters
    }

    pub fn operators(&self) -> &[Arc<Operator>] {
        &self.operators
    }

    pub fn macros(&self) -> &[Arc<Macro>] {
        &self.macros
    }

    /// Looks up a filter by exact name or alias.
    pub fn filter(&self, word: &str) -> Option<&Arc<Filter>> {
        self.filters.iter().find(|f| f.matches(word))
    }

    /// Looks up an operator by exact symbol or alias.
    pub fn operator(&self, word: &str) -> Option<&Arc<Operator>> {
        self.operators.iter().find(|op| op.matches(word))
    }

    pub fn has_operator(&self, word: &str) -> bool {
        self.operator(word).is_some()
    }

    /// Filters with a name or alias starting with `prefix`, in declaration order.
    pub fn filters_prefixed_by(&self, prefix: &str) -> Vec<&Arc<Filter>> {
        self.filters.iter().filter(|f| f.prefixed_by(prefix)).collect()
    }

    /// Operators usable on `ty`, in declaration order.
    pub fn operators_compatible_with(&self, ty: &Type) -> Vec<&Arc<Operator>> {
        self.operators.iter().filter(|op| op.accepts(ty)).collect()
    }

    /// Macros producing `ty` or one of its supertypes, in precedence order.
    pub fn macros_compatible_with(&self, ty: &Type) -> Vec<&Arc<Macro>> {
        self.macros
            .iter()
            .filter(|m| ty.is_subtype_of(m.ty()))
            .collect()
    }

    pub fn is_subtype_of(&self, ty: &Type, of: &Type) -> bool {
        ty.is_subtype_of(of)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grammar ({} types, {} filters, {} operators, {} macros)",
            self.types.len(),
            self.filters.len(),
            self.operators.len(),
            self.macros.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> GrammarConfig {
        GrammarConfig::new()
            .with_type(TypeDef::new("any", 0))
            .with_type(TypeDef::new("number", 1).supertype("any"))
            .with_type(TypeDef::new("timestamp", 2).supertype("number"))
    }

    #[test]
    fn test_unknown_filter_type() {
        let err = Grammar::new(base().with_filter(FilterDef::new("size", "bytes"))).unwrap_err();
        assert_eq!(err, ConfigError::UnknownType("bytes".into()));
    }

    #[test]
    fn test_duplicate_filter_alias() {
        let err = Grammar::new(
            base()
                .with_filter(FilterDef::new("created", "timestamp").aliases(["born"]))
                .with_filter(FilterDef::new("born", "timestamp")),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateFilter("born".into()));
    }

    #[test]
    fn test_duplicate_operator_within_itself() {
        let err = Grammar::new(base().with_operator(OperatorDef::new("=", "any").aliases(["is", "is"])))
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateOperator("is".into()));
    }

    #[test]
    fn test_subtype_compatibility() {
        let grammar = Grammar::new(
            base()
                .with_operator(OperatorDef::new("before", "timestamp"))
                .with_operator(OperatorDef::new(">", "number"))
                .with_operator(OperatorDef::new("=", "*")),
        )
        .unwrap();

        let number = grammar.ty("number").unwrap();
        let symbols: Vec<&str> = grammar
            .operators_compatible_with(number)
            .iter()
            .map(|op| op.symbol())
            .collect();
        assert_eq!(symbols, [">", "="]);
    }
}
