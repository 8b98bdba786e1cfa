//! Trica interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter, snapshots and history navigation
//! - [`errors`]: Runtime error types
//! - `statements`, `expressions`, `builtins`: `impl Interpreter` blocks for
//!   statement execution, expression evaluation and the runtime built-ins
//!
//! # Execution Model
//!
//! The interpreter walks the checked AST and executes statements one at a time.
//! A snapshot is taken before the first statement and after each statement
//! to enable time-travel debugging.
//!
//! Output goes through a [`Runtime`](crate::runtime::Runtime), the same
//! print/concat/last-output primitives the C back end emits.

mod builtins;
pub mod engine;
pub mod errors;
mod expressions;
mod statements;

pub use engine::Interpreter;
pub use errors::RuntimeError;
