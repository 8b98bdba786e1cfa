//! # Introduction
//!
//! Trica is a tiny language whose programs print strings, join them and read
//! back the last thing they printed. This crate parses and type checks Trica
//! source, then either interprets it while capturing a snapshot after every
//! statement, or translates it to a standalone C program. The snapshot history
//! can be browsed forward and backward in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//!                                 ┌─► Interpreter ─► Snapshots ─► TUI
//! Source → Lexer → Parser → AST → Checker
//!                                 └─► C emitter ─► C source
//! ```
//!
//! 1. [`parser`] tokenises the source and builds a [`parser::ast::Program`].
//! 2. [`checker`] resolves imports and variables and infers expression types.
//! 3. [`runtime`] owns the three string primitives (print, concat and the
//!    last output cache) used by the interpreter.
//! 4. [`interpreter`] walks the checked program, recording a
//!    [`snapshot::Snapshot`] per statement.
//! 5. [`codegen`] emits C that carries the same primitives as helper
//!    functions.
//! 6. [`driver`] strings the stages together for the binary and the tests.
//! 7. [`ui`] is the ratatui viewer; not part of the stable library API.
//!
//! ## The language
//!
//! ```text
//! include <stdio.h>
//! import user.input as ask
//!
//! Main {
//!     name = ask.input("Name? ")
//!     Print "Hello " + name + "\n"
//!     echo = Print.output
//! }
//! ```

pub mod checker;
pub mod codegen;
pub mod config;
pub mod driver;
pub mod error;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod runtime;
pub mod snapshot;
pub mod ui;

pub use error::TricaError;
