// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. preview::Preview)
    clippy::module_name_repetitions
)]

//! # Marksplit
//!
//! A terminal markdown editor with a live side-by-side HTML preview.
//!
//! Every edit re-runs the render pipeline: the buffer is converted to
//! HTML, the HTML is parsed into blocks and the blocks are laid out in the
//! preview pane.
//!
//! ## Architecture
//!
//! Marksplit uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions, requesting [`app::Effect`]s for I/O
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`editor`]: Text buffer and cursor
//! - [`markdown`]: Markdown to HTML conversion
//! - [`preview`]: HTML parsing and preview layout
//! - [`document`]: Current file, modified flag, open/save
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`input`]: Keybindings and menus
//! - [`highlight`]: Syntax highlighting
//! - [`config`]: Persisted command-line defaults

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod highlight;
pub mod input;
pub mod markdown;
pub mod preview;
pub mod ui;

/// Name shown in the window title and About dialog.
pub const APP_NAME: &str = "marksplit";

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::Document;
    pub use crate::editor::TextBuffer;
    pub use crate::preview::Preview;
}
