//! The type system: named types with a precedence rank arranged in a single
//! rooted supertype tree.
//!
//! Every grammar starts with the root type `*`. It accepts any token, has
//! precedence `-1` and is its own supertype. Each registered type names a
//! supertype (defaulting to the root), so walking up from any type always
//! terminates at `*`.
//!
//! ```
//! use sieve_lang::types::{TypeDef, TypeSystem};
//!
//! let mut types = TypeSystem::new();
//! types.register(TypeDef::new("number", 1)).unwrap();
//! types.register(TypeDef::new("timestamp", 2).supertype("number")).unwrap();
//!
//! let timestamp = types.get("timestamp").unwrap();
//! let chain: Vec<&str> = timestamp.all_supertypes().iter().map(|t| t.name()).collect();
//! assert_eq!(chain, ["timestamp", "number", "*"]);
//! ```

use crate::grammar::ConfigError;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Decides whether a raw token belongs to a type.
pub type Validator = dyn Fn(&str) -> bool + Send + Sync;

/// Turns a validated raw token into a [`Value`].
pub type Evaluator = dyn Fn(&str) -> Value + Send + Sync;

/// Name of the root type.
pub const ROOT: &str = "*";

/// A registered type. Compared by name, which is unique within a grammar.
pub struct Type {
    name: String,
    precedence: i32,
    /// `None` only for the root, which is its own supertype.
    supertype: Option<Arc<Type>>,
    validate: Arc<Validator>,
    evaluate: Arc<Evaluator>,
}

impl Type {
    fn root() -> Self {
        Type {
            name: ROOT.to_string(),
            precedence: -1,
            supertype: None,
            validate: Arc::new(|_| true),
            evaluate: Arc::new(|token| Value::Text(token.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn precedence(&self) -> i32 {
        self.precedence
    }

    pub fn is_root(&self) -> bool {
        self.supertype.is_none()
    }

    /// The direct supertype. The root returns itself.
    pub fn supertype(&self) -> &Type {
        self.supertype.as_deref().unwrap_or(self)
    }

    pub fn validate(&self, token: &str) -> bool {
        (self.validate)(token)
    }

    pub fn evaluate(&self, token: &str) -> Value {
        (self.evaluate)(token)
    }

    /// The chain from this type up to and including the root.
    pub fn all_supertypes(&self) -> Vec<&Type> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.supertype.as_deref() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// `true` when `other` appears in this type's supertype chain. Reflexive.
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        self.all_supertypes().into_iter().any(|t| t == other)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("precedence", &self.precedence)
            .field("supertype", &self.supertype().name)
            .finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Declaration of a type, consumed by [`TypeSystem::register`].
#[derive(Clone)]
pub struct TypeDef {
    pub name: String,
    pub precedence: i32,
    pub supertype: Option<String>,
    validate: Arc<Validator>,
    evaluate: Arc<Evaluator>,
}

impl TypeDef {
    /// A type accepting any token and evaluating it to text.
    pub fn new(name: impl Into<String>, precedence: i32) -> Self {
        TypeDef {
            name: name.into(),
            precedence,
            supertype: None,
            validate: Arc::new(|token| !token.is_empty()),
            evaluate: Arc::new(|token| Value::Text(token.to_string())),
        }
    }

    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.supertype = Some(name.into());
        self
    }

    pub fn validate(mut self, f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validate = Arc::new(f);
        self
    }

    pub fn evaluate(mut self, f: impl Fn(&str) -> Value + Send + Sync + 'static) -> Self {
        self.evaluate = Arc::new(f);
        self
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("precedence", &self.precedence)
            .field("supertype", &self.supertype)
            .finish_non_exhaustive()
    }
}

/// All types of a grammar, kept sorted by descending precedence.
#[derive(Debug, Clone)]
pub struct TypeSystem {
    root: Arc<Type>,
    types: Vec<Arc<Type>>,
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSystem {
    /// A type system holding only the root type.
    pub fn new() -> Self {
        let root = Arc::new(Type::root());
        TypeSystem {
            types: vec![root.clone()],
            root,
        }
    }

    /// Adds a type under its declared supertype (the root when omitted).
    pub fn register(&mut self, def: TypeDef) -> Result<Arc<Type>, ConfigError> {
        if self.contains(&def.name) {
            return Err(ConfigError::DuplicateType(def.name));
        }

        let supertype = self.get(def.supertype.as_deref().unwrap_or(ROOT))?.clone();
        debug!(name = %def.name, supertype = %supertype.name, precedence = def.precedence, "registered type");

        let ty = Arc::new(Type {
            name: def.name,
            precedence: def.precedence,
            supertype: Some(supertype),
            validate: def.validate,
            evaluate: def.evaluate,
        });
        self.types.push(ty.clone());
        // Stable, so equal precedences keep declaration order.
        self.types.sort_by(|a, b| b.precedence.cmp(&a.precedence));
        Ok(ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.iter().any(|t| t.name == name)
    }

    pub fn get(&self, name: &str) -> Result<&Arc<Type>, ConfigError> {
        self.types
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ConfigError::UnknownType(name.to_string()))
    }

    pub fn root(&self) -> &Arc<Type> {
        &self.root
    }

    /// Types in descending precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Type>> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The highest-precedence type whose validator accepts `token`.
    pub fn infer(&self, token: &str) -> &Arc<Type> {
        self.types
            .iter()
            .find(|t| t.validate(token))
            .unwrap_or(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers() -> TypeSystem {
        let mut types = TypeSystem::new();
        types
            .register(TypeDef::new("number", 1).validate(|t| t.chars().all(|c| c.is_ascii_digit())))
            .unwrap();
        types
            .register(
                TypeDef::new("timestamp", 2)
                    .supertype("number")
                    .validate(|t| t.chars().all(|c| c.is_ascii_digit())),
            )
            .unwrap();
        types
    }

    #[test]
    fn test_root_is_its_own_supertype() {
        let types = TypeSystem::new();
        let root = types.root();
        assert_eq!(root.name(), "*");
        assert_eq!(root.precedence(), -1);
        assert_eq!(root.supertype(), &**root);
        assert_eq!(root.all_supertypes().len(), 1);
    }

    #[test]
    fn test_sorted_by_precedence() {
        let types = numbers();
        let names: Vec<&str> = types.iter().map(|t| t.name()).collect();
        assert_eq!(names, ["timestamp", "number", "*"]);
    }

    #[test]
    fn test_duplicate_type() {
        let mut types = numbers();
        let err = types.register(TypeDef::new("number", 5)).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateType("number".into()));
    }

    #[test]
    fn test_unknown_supertype() {
        let mut types = TypeSystem::new();
        let err = types.register(TypeDef::new("user", 1).supertype("person")).unwrap_err();
        assert_eq!(err, ConfigError::UnknownType("person".into()));
    }

    #[test]
    fn test_infer_prefers_higher_precedence() {
        let types = numbers();
        assert_eq!(types.infer("42").name(), "timestamp");
        assert_eq!(types.infer("abc").name(), "*");
    }
}
