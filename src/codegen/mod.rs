//! C back end
//!
//! [`CEmitter`] lowers a [`CheckedProgram`](crate::checker::CheckedProgram)
//! to one self-contained C file: the string literal table, the runtime
//! primitives the program uses, and a straight-line `main`.
//!
//! ```text
//! Print "Hello" + " " + name      char* trica_tmp_0 = trica_concat(trica_str_0, trica_str_1);
//!                          ──►    char* trica_tmp_1 = trica_concat(trica_tmp_0, trica_var_name);
//!                                 trica_print(trica_tmp_1);
//! ```
//!
//! Every buffer a statement produces lives in a `trica_tmp_N` local that is
//! freed just before `main` returns, so variables may alias temporaries
//! freely. Allocation failure in the emitted program prints
//! `trica: out of memory` on stderr and exits with status 1.

pub mod c;
mod runtime_c;

pub use c::CEmitter;

use crate::checker::TypeError;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Errors raised while emitting C
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The program does not type-check under the emitter's view of it
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("Number literal at {location} is too large to represent")]
    NonFiniteNumber { location: SourceLocation },

    #[error("Include path '{path}' at {location} cannot be written as a C include")]
    InvalidInclude {
        path: String,
        location: SourceLocation,
    },

    #[error("Failed to format C output: {0}")]
    Format(#[from] std::fmt::Error),
}
