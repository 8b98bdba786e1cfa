//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, the keyboard event loop and pane focus
//! - **[`panes`]**: stateless render functions for each visible pane
//! - **[`theme`]**: the color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with an [`Interpreter`] that
//! has already recorded its history and call [`App::run`] to start the event loop.
//!
//! [`Interpreter`]: crate::interpreter::Interpreter
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
