//! Memory model for the Trica interpreter
//!
//! - [`value`]: Runtime value representation (Str, Number, Boolean)
//! - [`environment`]: The flat variable scope of a running program
//!
//! Strings are ordinary owned buffers. There is no manual allocation: a value
//! is released when its binding is overwritten or the environment is dropped.

pub mod environment;
pub mod value;

pub use environment::{Binding, Environment};
pub use value::Value;
