//! Top-level error type for the compiler pipeline

use crate::checker::TypeError;
use crate::codegen::CodegenError;
use crate::config::ConfigError;
use crate::interpreter::RuntimeError;
use crate::parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Any error a pipeline stage can produce
#[derive(Debug, Error)]
pub enum TricaError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TricaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TricaError::Io {
            path: path.into(),
            source,
        }
    }
}
