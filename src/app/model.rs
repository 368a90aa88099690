use std::path::PathBuf;

use crate::document::Document;
use crate::input::{Command, Keymap};
use crate::markdown;
use crate::preview::Preview;
use crate::ui::{ScreenLayout, char_display_width, line_number_width, screen_layout};

use super::effects::Effect;

/// Editor share of the screen width, in percent, unless configured.
pub const DEFAULT_SPLIT_PERCENT: u16 = 50;

/// What the Save/Discard/Cancel prompt is guarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    New,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    Open,
    SaveAs,
}

/// Single line path input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrompt {
    pub purpose: PromptPurpose,
    pub input: String,
}

impl PathPrompt {
    pub const fn title(&self) -> &'static str {
        match self.purpose {
            PromptPurpose::Open => "Open",
            PromptPurpose::SaveAs => "Save As",
        }
    }
}

/// A modal dialog. Only the topmost one receives keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Prompt(PathPrompt),
    Confirm { action: PendingAction, name: String },
    Notice { title: String, message: String },
}

/// Which drop-down menu is open and which entry is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub menu: usize,
    pub item: usize,
}

/// The complete application state.
#[derive(Debug, Default)]
pub struct Model {
    /// The document being edited
    pub document: Document,
    /// Rendered HTML of the document
    pub preview: Preview,
    pub keymap: Keymap,
    /// Open drop-down menu, if any
    pub menu: Option<MenuState>,
    pub dialog: Option<Dialog>,
    /// Result of the last operation
    pub status: String,
    /// Action to resume once a save requested by the confirm prompt succeeds
    pub pending: Option<PendingAction>,
    effects: Vec<Effect>,
    title: String,
    pub should_quit: bool,
    /// Terminal size (width, height)
    pub size: (u16, u16),
    /// First buffer line shown in the editor pane
    pub editor_scroll: usize,
    /// First display column shown in the editor pane
    pub editor_hscroll: usize,
    pub split_percent: u16,
    /// Global config path shown in About
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in About
    pub config_local_path: Option<PathBuf>,
}

impl Model {
    pub fn new(document: Document, size: (u16, u16)) -> Self {
        let mut model = Self {
            document,
            size,
            split_percent: DEFAULT_SPLIT_PERCENT,
            ..Self::default()
        };
        model.refresh_preview();
        model.sync_title();
        model
    }

    #[must_use]
    pub const fn with_split_percent(mut self, percent: u16) -> Self {
        self.split_percent = percent;
        self
    }

    /// Re-run the render pipeline over the whole buffer.
    pub fn refresh_preview(&mut self) {
        let html = markdown::to_html(&self.document.text());
        self.preview.set_html(html);
        let (width, height) = self.preview_size();
        self.preview.clamp_scroll(width, height);
    }

    /// `<name> - marksplit`, with a `*` prefix while modified.
    pub fn window_title(&self) -> String {
        let marker = if self.document.is_modified() { "*" } else { "" };
        format!("{marker}{} - {}", self.document.display_name(), crate::APP_NAME)
    }

    /// Request a title update when the title changed.
    pub fn sync_title(&mut self) {
        let title = self.window_title();
        if title != self.title {
            self.title.clone_from(&title);
            self.effects.push(Effect::SetTitle(title));
        }
    }

    pub fn request(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn pending_effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn show_notice(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.menu = None;
        self.dialog = Some(Dialog::Notice {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn layout(&self) -> ScreenLayout {
        let (width, height) = self.size;
        screen_layout(
            ratatui::layout::Rect::new(0, 0, width, height),
            self.split_percent,
        )
    }

    /// Columns taken by the line number gutter, including its trailing space.
    pub fn gutter_width(&self) -> u16 {
        line_number_width(self.document.buffer().line_count()) + 1
    }

    /// Text area of the editor pane (width, height), gutter excluded.
    pub fn editor_text_size(&self) -> (usize, usize) {
        let area = self.layout().editor;
        (
            usize::from(area.width.saturating_sub(self.gutter_width())),
            usize::from(area.height),
        )
    }

    /// Inner size of the bordered preview pane.
    pub fn preview_size(&self) -> (u16, u16) {
        let area = self.layout().preview;
        (area.width.saturating_sub(2), area.height.saturating_sub(2))
    }

    /// Display column of the cursor within its line.
    pub fn cursor_display_col(&self) -> usize {
        let buffer = self.document.buffer();
        let cursor = buffer.cursor();
        buffer
            .line_at(cursor.line)
            .unwrap_or_default()
            .chars()
            .take(cursor.col)
            .map(char_display_width)
            .sum()
    }

    /// Scroll the editor pane so the cursor is visible.
    pub fn scroll_editor_to_cursor(&mut self) {
        let (width, height) = self.editor_text_size();
        let line = self.document.buffer().cursor().line;
        if line < self.editor_scroll {
            self.editor_scroll = line;
        } else if height > 0 && line >= self.editor_scroll + height {
            self.editor_scroll = line + 1 - height;
        }

        let col = self.cursor_display_col();
        if col < self.editor_hscroll {
            self.editor_hscroll = col;
        } else if width > 0 && col >= self.editor_hscroll + width {
            self.editor_hscroll = col + 1 - width;
        }
    }

    /// Scroll the editor pane without moving the cursor.
    pub fn scroll_editor(&mut self, delta: isize) {
        let max = self.document.buffer().line_count().saturating_sub(1);
        self.editor_scroll = self.editor_scroll.saturating_add_signed(delta).min(max);
    }

    /// Key hint shown next to a menu entry.
    pub fn shortcut_label(&self, command: Command) -> String {
        self.keymap
            .binding_for(command)
            .map(|binding| binding.label())
            .unwrap_or_default()
    }
}
