//! Runtime value representation
//!
//! This module defines the [`Value`] enum, the tagged values the interpreter
//! stores in its [`Environment`](super::environment::Environment).
//!
//! # Value Types
//!
//! - [`Value::Str`]: owned UTF-8 string
//! - [`Value::Number`]: 64-bit float
//! - [`Value::Boolean`]: result of a comparison
//!
//! Every value owns its data, so dropping a binding releases its buffer.

use crate::parser::ast::Type;
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Number(f64),
    Boolean(bool),
}

impl Value {
    /// Static type of this value
    pub fn value_type(&self) -> Type {
        match self {
            Value::Str(_) => Type::String,
            Value::Number(_) => Type::Number,
            Value::Boolean(_) => Type::Boolean,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Expect a number, returns the found type name otherwise
    pub fn expect_number(&self) -> Result<f64, String> {
        self.as_number()
            .ok_or_else(|| self.value_type().to_string())
    }

    /// Approximate heap footprint, used for history accounting
    pub fn estimated_size(&self) -> usize {
        std::mem::size_of::<Value>()
            + match self {
                Value::Str(s) => s.capacity(),
                _ => 0,
            }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}
