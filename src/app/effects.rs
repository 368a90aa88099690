use std::io::stdout;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::SetTitle;
use tracing::{info, warn};

use crate::app::{App, Message, Model, update};
use crate::document::{Document, SaveStatus};

/// A side effect requested by [`update`](crate::app::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Open(PathBuf),
    Save,
    SaveAs(PathBuf),
    SetTitle(String),
}

impl App {
    /// Run requested effects until none are left, feeding each result back
    /// through `update`.
    pub(super) fn run_effects(model: &mut Model) {
        loop {
            let effects = model.take_effects();
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                if let Effect::SetTitle(title) = &effect {
                    set_terminal_title(title);
                    continue;
                }
                if let Some(msg) = perform_file_effect(&mut model.document, effect) {
                    *model = update(std::mem::take(model), msg);
                }
            }
        }
    }
}

/// Run a file effect against the document and describe the outcome.
pub fn perform_file_effect(document: &mut Document, effect: Effect) -> Option<Message> {
    match effect {
        Effect::Open(path) => match document.open(&path) {
            Ok(()) => {
                info!(path = %path.display(), "opened document");
                Some(Message::FileOpened(path))
            }
            Err(err) => {
                warn!(error = %err, "open failed");
                Some(Message::FileError {
                    title: err.title().to_string(),
                    message: err.to_string(),
                })
            }
        },
        Effect::Save => match document.save() {
            Ok(SaveStatus::Saved(path)) => {
                info!(path = %path.display(), "saved document");
                Some(Message::FileSaved(path))
            }
            Ok(SaveStatus::NeedsPath) => Some(Message::SaveNeedsPath),
            Err(err) => {
                warn!(error = %err, "save failed");
                Some(Message::FileError {
                    title: err.title().to_string(),
                    message: err.to_string(),
                })
            }
        },
        Effect::SaveAs(path) => match document.save_as(&path) {
            Ok(written) => {
                info!(path = %written.display(), "saved document under new name");
                Some(Message::FileSaved(written))
            }
            Err(err) => {
                warn!(error = %err, "save as failed");
                Some(Message::FileError {
                    title: err.title().to_string(),
                    message: err.to_string(),
                })
            }
        },
        Effect::SetTitle(_) => None,
    }
}

fn set_terminal_title(title: &str) {
    if let Err(err) = execute!(stdout(), SetTitle(title)) {
        warn!(error = %err, "could not set terminal title");
    }
}
