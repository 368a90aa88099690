use std::path::PathBuf;

use tracing::{debug, info};

use crate::editor::{Direction, TextBuffer};
use crate::input::{Command, MENUS};
use crate::ui::char_display_width;

use super::effects::Effect;
use super::model::{Dialog, MenuState, Model, PathPrompt, PendingAction, PromptPurpose};

/// Prefill of the Save As prompt for a document that has no path yet.
pub const UNTITLED_FILE_NAME: &str = "untitled.md";

/// All possible events in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    InsertChar(char),
    /// Pasted or otherwise inserted text
    InsertText(String),
    Newline,
    Backspace,
    Delete,

    // Cursor and scrolling
    MoveCursor(Direction),
    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    DocumentStart,
    DocumentEnd,
    PageUp,
    PageDown,
    /// Mouse click on buffer line `line` at display column `x`
    ClickEditor { line: usize, x: usize },
    ScrollEditor(isize),
    ScrollPreview(isize),

    // File and application commands
    New,
    Open,
    Save,
    SaveAs,
    Quit,
    About,

    // Menu bar
    OpenMenu(usize),
    CloseMenu,
    MenuLeft,
    MenuRight,
    MenuUp,
    MenuDown,
    MenuActivate,
    ClickMenuItem { menu: usize, item: usize },

    // Dialogs
    PromptInput(char),
    PromptPaste(String),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,
    ConfirmSave,
    ConfirmDiscard,
    ConfirmCancel,
    DismissNotice,

    // Effect results
    FileOpened(PathBuf),
    FileSaved(PathBuf),
    SaveNeedsPath,
    FileError { title: String, message: String },

    Resize(u16, u16),
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        match command {
            Command::New => Self::New,
            Command::Open => Self::Open,
            Command::Save => Self::Save,
            Command::SaveAs => Self::SaveAs,
            Command::Quit => Self::Quit,
            Command::About => Self::About,
            Command::OpenMenu => Self::OpenMenu(0),
            Command::ScrollPreviewUp => Self::ScrollPreview(-1),
            Command::ScrollPreviewDown => Self::ScrollPreview(1),
        }
    }
}

/// Apply a message to the model.
///
/// File I/O is never done here; it is requested as an [`Effect`] and its
/// outcome comes back as another message.
pub fn update(mut model: Model, msg: Message) -> Model {
    debug!(?msg, "update");
    match msg {
        Message::InsertChar(ch) => edit(&mut model, |buf| {
            buf.insert_char(ch);
            true
        }),
        Message::InsertText(text) => edit(&mut model, |buf| buf.insert_str(&text)),
        Message::Newline => edit(&mut model, |buf| {
            buf.split_line();
            true
        }),
        Message::Backspace => edit(&mut model, TextBuffer::delete_back),
        Message::Delete => edit(&mut model, TextBuffer::delete_forward),

        Message::MoveCursor(direction) => navigate(&mut model, |buf| buf.move_cursor(direction)),
        Message::LineStart => navigate(&mut model, TextBuffer::move_home),
        Message::LineEnd => navigate(&mut model, TextBuffer::move_end),
        Message::WordLeft => navigate(&mut model, TextBuffer::move_word_left),
        Message::WordRight => navigate(&mut model, TextBuffer::move_word_right),
        Message::DocumentStart => navigate(&mut model, TextBuffer::move_to_start),
        Message::DocumentEnd => navigate(&mut model, TextBuffer::move_to_end),
        Message::PageUp | Message::PageDown => {
            let rows = model.editor_text_size().1.max(1);
            let down = matches!(msg, Message::PageDown);
            navigate(&mut model, |buf| buf.move_page(rows, down));
        }
        Message::ClickEditor { line, x } => {
            model.menu = None;
            let col = char_col_at(model.document.buffer(), line, x);
            navigate(&mut model, |buf| buf.move_to(line, col));
        }
        Message::ScrollEditor(delta) => model.scroll_editor(delta),
        Message::ScrollPreview(delta) => {
            if delta < 0 {
                model.preview.scroll_up(delta.unsigned_abs());
            } else {
                model.preview.scroll_down(delta.unsigned_abs());
            }
            let (width, height) = model.preview_size();
            model.preview.clamp_scroll(width, height);
        }

        Message::New => guard_unsaved(&mut model, PendingAction::New),
        Message::Quit => guard_unsaved(&mut model, PendingAction::Quit),
        Message::Open => {
            model.menu = None;
            model.dialog = Some(Dialog::Prompt(PathPrompt {
                purpose: PromptPurpose::Open,
                input: String::new(),
            }));
        }
        Message::Save => {
            model.menu = None;
            model.request(Effect::Save);
        }
        Message::SaveAs => open_save_as_prompt(&mut model),
        Message::About => {
            let text = about_text(&model);
            model.show_notice(format!("About {}", crate::APP_NAME), text);
        }

        Message::OpenMenu(index) => {
            model.menu = Some(MenuState {
                menu: index.min(MENUS.len().saturating_sub(1)),
                item: 0,
            });
        }
        Message::CloseMenu => model.menu = None,
        Message::MenuLeft | Message::MenuRight => {
            if let Some(state) = model.menu.as_mut() {
                let count = MENUS.len();
                state.menu = if matches!(msg, Message::MenuLeft) {
                    (state.menu + count - 1) % count
                } else {
                    (state.menu + 1) % count
                };
                state.item = 0;
            }
        }
        Message::MenuUp | Message::MenuDown => {
            if let Some(state) = model.menu.as_mut() {
                let count = MENUS.get(state.menu).map_or(1, |menu| menu.items.len().max(1));
                state.item = if matches!(msg, Message::MenuUp) {
                    (state.item + count - 1) % count
                } else {
                    (state.item + 1) % count
                };
            }
        }
        Message::MenuActivate => {
            let command = model.menu.take().and_then(|state| {
                MENUS
                    .get(state.menu)
                    .and_then(|menu| menu.items.get(state.item))
                    .map(|item| item.command)
            });
            if let Some(command) = command {
                return update(model, Message::from(command));
            }
        }
        Message::ClickMenuItem { menu, item } => {
            model.menu = Some(MenuState { menu, item });
            return update(model, Message::MenuActivate);
        }

        Message::PromptInput(ch) => {
            if let Some(Dialog::Prompt(prompt)) = model.dialog.as_mut() {
                prompt.input.push(ch);
            }
        }
        Message::PromptPaste(text) => {
            if let Some(Dialog::Prompt(prompt)) = model.dialog.as_mut() {
                prompt.input.extend(text.chars().filter(|ch| !ch.is_control()));
            }
        }
        Message::PromptBackspace => {
            if let Some(Dialog::Prompt(prompt)) = model.dialog.as_mut() {
                prompt.input.pop();
            }
        }
        Message::PromptSubmit => submit_prompt(&mut model),
        Message::PromptCancel => {
            if matches!(model.dialog, Some(Dialog::Prompt(_))) {
                model.dialog = None;
                model.pending = None;
            }
        }
        Message::ConfirmSave => {
            if let Some(Dialog::Confirm { action, .. }) = model.dialog.take() {
                model.pending = Some(action);
                model.request(Effect::Save);
            }
        }
        Message::ConfirmDiscard => {
            if let Some(Dialog::Confirm { action, .. }) = model.dialog.take() {
                perform(&mut model, action);
            }
        }
        Message::ConfirmCancel => {
            if matches!(model.dialog, Some(Dialog::Confirm { .. })) {
                model.dialog = None;
            }
        }
        Message::DismissNotice => {
            if matches!(model.dialog, Some(Dialog::Notice { .. })) {
                model.dialog = None;
            }
        }

        Message::FileOpened(path) => {
            model.refresh_preview();
            model.preview.scroll_to_top();
            model.editor_scroll = 0;
            model.editor_hscroll = 0;
            model.set_status(format!("Opened {}", path.display()));
        }
        Message::FileSaved(path) => {
            model.set_status(format!("Saved to {}", path.display()));
            if let Some(action) = model.pending.take() {
                perform(&mut model, action);
            }
        }
        Message::SaveNeedsPath => open_save_as_prompt(&mut model),
        Message::FileError { title, message } => {
            model.pending = None;
            model.set_status(title.clone());
            model.show_notice(title, message);
        }

        Message::Resize(width, height) => {
            model.size = (width, height);
            let (preview_width, preview_height) = model.preview_size();
            model.preview.clamp_scroll(preview_width, preview_height);
            model.scroll_editor_to_cursor();
        }
    }
    model.sync_title();
    model
}

/// Apply a text edit; the preview is rebuilt when the text changed.
fn edit(model: &mut Model, f: impl FnOnce(&mut TextBuffer) -> bool) {
    if model.document.edit(f) {
        model.refresh_preview();
    }
    model.scroll_editor_to_cursor();
}

fn navigate(model: &mut Model, f: impl FnOnce(&mut TextBuffer)) {
    model.document.navigate(f);
    model.scroll_editor_to_cursor();
}

/// Char index on `line` under display column `x`.
fn char_col_at(buffer: &TextBuffer, line: usize, x: usize) -> usize {
    let text = buffer.line_at(line).unwrap_or_default();
    let mut used = 0;
    for (index, ch) in text.chars().enumerate() {
        let width = char_display_width(ch);
        if used + width > x {
            return index;
        }
        used += width;
    }
    text.chars().count()
}

/// Run `action` now, or ask first when there are unsaved changes.
fn guard_unsaved(model: &mut Model, action: PendingAction) {
    model.menu = None;
    if model.document.is_modified() {
        model.dialog = Some(Dialog::Confirm {
            action,
            name: model.document.display_name(),
        });
    } else {
        perform(model, action);
    }
}

fn perform(model: &mut Model, action: PendingAction) {
    match action {
        PendingAction::New => {
            model.document.new_document();
            model.refresh_preview();
            model.preview.scroll_to_top();
            model.editor_scroll = 0;
            model.editor_hscroll = 0;
            model.set_status("New document");
            info!("new document");
        }
        PendingAction::Quit => model.should_quit = true,
    }
}

fn open_save_as_prompt(model: &mut Model) {
    model.menu = None;
    let input = model.document.file_path().map_or_else(
        || UNTITLED_FILE_NAME.to_string(),
        |path| path.display().to_string(),
    );
    model.dialog = Some(Dialog::Prompt(PathPrompt {
        purpose: PromptPurpose::SaveAs,
        input,
    }));
}

fn submit_prompt(model: &mut Model) {
    let Some(Dialog::Prompt(prompt)) = model.dialog.take() else {
        return;
    };
    let input = prompt.input.trim();
    if input.is_empty() {
        model.pending = None;
        return;
    }
    let path = PathBuf::from(input);
    match prompt.purpose {
        PromptPurpose::Open => model.request(Effect::Open(path)),
        PromptPurpose::SaveAs => model.request(Effect::SaveAs(path)),
    }
}

fn about_text(model: &Model) -> String {
    let global = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());
    format!(
        "{} {}\nA Markdown editor with a live preview.\n\nGlobal config: {global}\nLocal override: {local}",
        crate::APP_NAME,
        env!("CARGO_PKG_VERSION"),
    )
}
