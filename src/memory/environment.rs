//! Variable environment
//!
//! Trica has a single flat scope. Bindings are kept in the order of their
//! first assignment so the variables pane lists them the way they appear in
//! the source, with a hash index for lookups.

use super::value::Value;
use crate::parser::ast::SourceLocation;
use rustc_hash::FxHashMap;

/// A named variable
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub value: Value,
    /// Where the variable was first assigned
    pub declared_at: SourceLocation,
}

/// All variables of a running program
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: Vec<Binding>,
    index: FxHashMap<String, usize>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&i| &self.bindings[i].value)
    }

    /// Assign `value` to `name`, declaring it on first use.
    /// Returns true when the variable is new.
    pub fn assign(&mut self, name: &str, value: Value, location: SourceLocation) -> bool {
        if let Some(&i) = self.index.get(name) {
            // Old value dropped here
            self.bindings[i].value = value;
            false
        } else {
            self.index.insert(name.to_string(), self.bindings.len());
            self.bindings.push(Binding {
                name: name.to_string(),
                value,
                declared_at: location,
            });
            true
        }
    }

    /// Bindings in declaration order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn estimated_size(&self) -> usize {
        self.bindings
            .iter()
            .map(|b| b.name.len() * 2 + b.value.estimated_size() + 16)
            .sum()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_keeps_declaration_order() {
        let mut env = Environment::new();
        let loc = SourceLocation::new(1, 1);

        assert!(env.assign("b", Value::Number(1.0), loc));
        assert!(env.assign("a", Value::Str("x".into()), SourceLocation::new(2, 1)));
        assert!(!env.assign("b", Value::Number(2.0), SourceLocation::new(3, 1)));

        let names: Vec<&str> = env.bindings().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(env.get("b"), Some(&Value::Number(2.0)));
        assert_eq!(env.bindings()[0].declared_at, loc);
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_missing_variable() {
        let env = Environment::new();
        assert!(env.get("nope").is_none());
        assert!(env.is_empty());
    }
}
