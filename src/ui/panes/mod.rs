//! TUI pane rendering modules
//!
//! - [`source`]: Trica source with syntax highlighting and the current line
//! - [`output`]: everything the program has written so far
//! - [`variables`]: variable bindings and the `Print.output` cache
//! - [`status`]: status bar with keybindings and execution state
//!
//! Each module exports a `render_*_pane()` function (or `render_status_bar`)
//! and, where a pane scrolls, the state it keeps between frames.

pub mod output;
pub mod source;
pub mod status;
pub mod variables;

pub use output::render_output_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use variables::render_variables_pane;
