use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::info;

use crate::app::{App, Model, update};
use crate::document::Document;

use super::effects::Effect;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure. File errors never end the loop.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; marksplit requires an interactive terminal")?;
        let size = terminal.size()?;
        let mut model = self.initial_model((size.width, size.height));

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal, &mut model));

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();
        result
    }

    /// Build the startup model.
    ///
    /// A FILE argument that does not exist starts an empty document bound
    /// to that path. An existing file is opened through the regular open
    /// effect, so read errors surface as a notice.
    pub(super) fn initial_model(&self, size: (u16, u16)) -> Model {
        let document = match &self.file_path {
            Some(path) if !path.exists() => {
                info!(path = %path.display(), "starting new file");
                Document::with_path(path)
            }
            _ => Document::new(),
        };
        let mut model = Model::new(document, size).with_split_percent(self.split_percent);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        if let Some(path) = self.file_path.as_ref().filter(|path| path.exists()) {
            model.request(Effect::Open(path.clone()));
        }
        model
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        Self::run_effects(model);
        let mut needs_render = true;

        loop {
            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }
            if model.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(250))? {
                // Coalesce bursts (key repeat, paste) into a single render.
                loop {
                    if let Some(msg) = self.handle_event(&event::read()?, model) {
                        *model = update(std::mem::take(model), msg);
                        Self::run_effects(model);
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
