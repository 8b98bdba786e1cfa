//! Runtime error types for the Trica interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to parse or type errors).
//!
//! All runtime errors are fatal - they halt execution. The history recorded up
//! to the failing statement stays available for inspection.

use crate::parser::ast::SourceLocation;
use crate::runtime::PrimitiveError;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Undefined variable reference
    #[error("Undefined variable '{name}' at line {}", .location.line)]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Operand of the wrong type
    #[error("Type error at line {}: expected {expected}, got {got}", .location.line)]
    TypeError {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    #[error("Division by zero at line {}", .location.line)]
    DivisionByZero { location: SourceLocation },

    /// Call through a name no import registered
    #[error("Undefined function '{name}' at line {}", .location.line)]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("Unknown property '{path}' at line {}", .location.line)]
    UnknownProperty {
        path: String,
        location: SourceLocation,
    },

    /// A runtime primitive (print, concat, input) failed
    #[error("{source} at line {}", .location.line)]
    Primitive {
        #[source]
        source: PrimitiveError,
        location: SourceLocation,
    },

    /// Snapshot history limit exceeded
    #[error("Snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History/snapshot operation failed
    #[error("History operation failed: {message} at line {}", .location.line)]
    HistoryOperationFailed {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::DivisionByZero { location }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::UnknownProperty { location, .. }
            | RuntimeError::Primitive { location, .. }
            | RuntimeError::HistoryOperationFailed { location, .. } => Some(location),
            RuntimeError::SnapshotLimitExceeded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_line() {
        let err = RuntimeError::DivisionByZero {
            location: SourceLocation::new(4, 9),
        };
        assert_eq!(err.to_string(), "Division by zero at line 4");
        assert_eq!(err.location(), Some(&SourceLocation::new(4, 9)));

        let err = RuntimeError::Primitive {
            source: PrimitiveError::Allocation {
                requested: 10,
                limit: 4,
            },
            location: SourceLocation::new(2, 1),
        };
        assert_eq!(
            err.to_string(),
            "Allocation of 10 bytes refused (limit is 4 bytes) at line 2"
        );
    }
}
