//! Trica source code parser
//!
//! This module transforms Trica source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), split across `statements` and `expressions`
//! - [`ast`]: AST node definitions
//!
//! # Language
//!
//! ```text
//! include <stdio.h>
//! import user.input as ask
//!
//! Main {
//!     name = ask.input("Who are you? ")
//!     Print "Hello " + name
//!     echo = Print.output
//! }
//! ```
//!
//! The `Main` block is optional: a file may instead contain bare statements
//! after its header lines.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser. No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{ParseError, Parser};
