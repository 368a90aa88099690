use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::input::menu_title_spans;

use super::model::Dialog;

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: isize = 3;

impl App {
    pub(super) fn handle_event(&self, event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(*key, model),
            Event::Mouse(mouse) => self.handle_mouse(*mouse, model),
            Event::Paste(text) => self.handle_paste(text, model),
            Event::Resize(width, height) => Some(Message::Resize(*width, *height)),
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if let Some(dialog) = &model.dialog {
            return dialog_key(key, dialog);
        }
        if model.menu.is_some() {
            return menu_key(key, model);
        }
        if let Some(command) = model.keymap.lookup(&key) {
            return Some(command.into());
        }
        editor_key(key)
    }

    pub(super) fn handle_paste(&self, text: &str, model: &Model) -> Option<Message> {
        match &model.dialog {
            Some(Dialog::Prompt(_)) => Some(Message::PromptPaste(text.to_string())),
            Some(_) => None,
            None if model.menu.is_some() => None,
            None => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                Some(Message::InsertText(text))
            }
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        let pos = Position::new(mouse.column, mouse.row);
        if let Some(dialog) = &model.dialog {
            let click = matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left));
            return (click && matches!(dialog, Dialog::Notice { .. })).then_some(Message::DismissNotice);
        }

        let layout = model.layout();
        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let delta = if mouse.kind == MouseEventKind::ScrollUp {
                    -WHEEL_STEP
                } else {
                    WHEEL_STEP
                };
                if layout.preview.contains(pos) {
                    Some(Message::ScrollPreview(delta))
                } else if layout.editor.contains(pos) {
                    Some(Message::ScrollEditor(delta))
                } else {
                    None
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(state) = model.menu {
                    let dropdown = crate::ui::menu_dropdown_rect(model, state.menu);
                    if let Some(item) = crate::ui::menu_item_at(dropdown, state.menu, pos) {
                        return Some(Message::ClickMenuItem {
                            menu: state.menu,
                            item,
                        });
                    }
                }
                if layout.menu_bar.contains(pos) {
                    let clicked = menu_title_spans()
                        .iter()
                        .position(|(x, width)| mouse.column >= *x && mouse.column < x + width);
                    return match clicked {
                        Some(index) if model.menu.map(|m| m.menu) == Some(index) => {
                            Some(Message::CloseMenu)
                        }
                        Some(index) => Some(Message::OpenMenu(index)),
                        None => model.menu.map(|_| Message::CloseMenu),
                    };
                }
                if model.menu.is_some() {
                    return Some(Message::CloseMenu);
                }
                if layout.editor.contains(pos) {
                    let text_x = layout.editor.x + model.gutter_width();
                    return Some(Message::ClickEditor {
                        line: model.editor_scroll + usize::from(mouse.row - layout.editor.y),
                        x: model.editor_hscroll + usize::from(mouse.column.saturating_sub(text_x)),
                    });
                }
                None
            }
            _ => None,
        }
    }
}

fn dialog_key(key: KeyEvent, dialog: &Dialog) -> Option<Message> {
    match dialog {
        Dialog::Prompt(_) => match key.code {
            KeyCode::Esc => Some(Message::PromptCancel),
            KeyCode::Enter => Some(Message::PromptSubmit),
            KeyCode::Backspace => Some(Message::PromptBackspace),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::PromptInput(ch))
            }
            _ => None,
        },
        Dialog::Confirm { .. } => match key.code {
            KeyCode::Char('y' | 'Y') => Some(Message::ConfirmSave),
            KeyCode::Char('n' | 'N') => Some(Message::ConfirmDiscard),
            KeyCode::Char('c' | 'C') | KeyCode::Esc => Some(Message::ConfirmCancel),
            _ => None,
        },
        Dialog::Notice { .. } => Some(Message::DismissNotice),
    }
}

fn menu_key(key: KeyEvent, model: &Model) -> Option<Message> {
    match key.code {
        KeyCode::Esc | KeyCode::F(10) => Some(Message::CloseMenu),
        KeyCode::Left => Some(Message::MenuLeft),
        KeyCode::Right => Some(Message::MenuRight),
        KeyCode::Up => Some(Message::MenuUp),
        KeyCode::Down => Some(Message::MenuDown),
        KeyCode::Enter => Some(Message::MenuActivate),
        _ => model.keymap.lookup(&key).map(Message::from),
    }
}

fn editor_key(key: KeyEvent) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        // AltGr arrives as Ctrl+Alt on some platforms.
        KeyCode::Char(ch) if ctrl == alt => Some(Message::InsertChar(ch)),
        KeyCode::Enter => Some(Message::Newline),
        KeyCode::Tab => Some(Message::InsertText("    ".to_string())),
        KeyCode::Backspace => Some(Message::Backspace),
        KeyCode::Delete => Some(Message::Delete),
        KeyCode::Left if ctrl => Some(Message::WordLeft),
        KeyCode::Right if ctrl => Some(Message::WordRight),
        KeyCode::Home if ctrl => Some(Message::DocumentStart),
        KeyCode::End if ctrl => Some(Message::DocumentEnd),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
        KeyCode::Home => Some(Message::LineStart),
        KeyCode::End => Some(Message::LineEnd),
        KeyCode::PageUp => Some(Message::PageUp),
        KeyCode::PageDown => Some(Message::PageDown),
        _ => None,
    }
}
