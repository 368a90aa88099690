//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`Effect`]: File and terminal work requested by `update`
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use effects::{Effect, perform_file_effect};
pub use model::{
    DEFAULT_SPLIT_PERCENT, Dialog, MenuState, Model, PathPrompt, PendingAction, PromptPurpose,
};
pub use update::{Message, UNTITLED_FILE_NAME, update};

use std::path::PathBuf;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    split_percent: u16,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application, optionally opening `file_path` at startup.
    pub const fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            split_percent: DEFAULT_SPLIT_PERCENT,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set the editor pane width in percent of the screen.
    #[must_use]
    pub const fn with_split_percent(mut self, percent: u16) -> Self {
        self.split_percent = percent;
        self
    }

    /// Set config paths to show in About.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}
