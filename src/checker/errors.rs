//! Static type errors reported before a program runs or is emitted as C

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Errors found by the [`TypeChecker`](super::TypeChecker)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Type mismatch at {location}: expected {expected}, found {found}")]
    Mismatch {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error("Undefined variable '{name}' at {location}")]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    #[error("Undefined function '{name}' at {location}")]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("Unknown property '{path}' at {location}")]
    UnknownProperty {
        path: String,
        location: SourceLocation,
    },

    #[error("Function '{function}' expects {expected} argument(s), got {got} at {location}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    #[error("Invalid include at {location}: {message}")]
    InvalidInclude {
        message: String,
        location: SourceLocation,
    },
}

impl TypeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            TypeError::Mismatch { location, .. }
            | TypeError::UndefinedVariable { location, .. }
            | TypeError::UndefinedFunction { location, .. }
            | TypeError::UnknownProperty { location, .. }
            | TypeError::ArgumentCountMismatch { location, .. }
            | TypeError::InvalidInclude { location, .. } => *location,
        }
    }
}
