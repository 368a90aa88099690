//! Commands and the keys and menu entries that trigger them.
//!
//! The binding table is built once at startup. Keys that are not bound here
//! fall through to the editor.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A user-level action reachable from the keyboard or the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    New,
    Open,
    Save,
    SaveAs,
    Quit,
    About,
    OpenMenu,
    ScrollPreviewUp,
    ScrollPreviewDown,
}

/// A key plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    /// Human readable form, as shown in the menu.
    pub fn label(&self) -> String {
        let mut label = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            label.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            label.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            label.push_str("Shift+");
        }
        match self.code {
            KeyCode::Char(ch) => label.push(ch.to_ascii_uppercase()),
            KeyCode::F(n) => label.push_str(&format!("F{n}")),
            KeyCode::Up => label.push_str("Up"),
            KeyCode::Down => label.push_str("Down"),
            other => label.push_str(&format!("{other:?}")),
        }
        label
    }
}

impl From<&KeyEvent> for KeyBinding {
    fn from(key: &KeyEvent) -> Self {
        // Shift is implied by the character for printable keys.
        let modifiers = match key.code {
            KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        let code = match key.code {
            KeyCode::Char(ch) if modifiers.contains(KeyModifiers::CONTROL) => {
                KeyCode::Char(ch.to_ascii_lowercase())
            }
            other => other,
        };
        Self::new(code, modifiers)
    }
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyBinding, Command>,
}

impl Keymap {
    /// The built-in bindings.
    pub fn default_bindings() -> Self {
        let mut keymap = Self {
            bindings: HashMap::new(),
        };
        keymap.bind(KeyBinding::ctrl('n'), Command::New);
        keymap.bind(KeyBinding::ctrl('o'), Command::Open);
        keymap.bind(KeyBinding::ctrl('s'), Command::Save);
        keymap.bind(KeyBinding::plain(KeyCode::F(12)), Command::SaveAs);
        keymap.bind(KeyBinding::ctrl('q'), Command::Quit);
        keymap.bind(KeyBinding::plain(KeyCode::F(1)), Command::About);
        keymap.bind(KeyBinding::plain(KeyCode::F(10)), Command::OpenMenu);
        keymap.bind(
            KeyBinding::new(KeyCode::Up, KeyModifiers::ALT),
            Command::ScrollPreviewUp,
        );
        keymap.bind(
            KeyBinding::new(KeyCode::Down, KeyModifiers::ALT),
            Command::ScrollPreviewDown,
        );
        keymap
    }

    pub fn bind(&mut self, binding: KeyBinding, command: Command) {
        self.bindings.insert(binding, command);
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<Command> {
        self.bindings.get(&KeyBinding::from(key)).copied()
    }

    /// The first binding for `command`, used for menu hints.
    pub fn binding_for(&self, command: Command) -> Option<KeyBinding> {
        let mut matches: Vec<KeyBinding> = self
            .bindings
            .iter()
            .filter(|(_, bound)| **bound == command)
            .map(|(binding, _)| *binding)
            .collect();
        matches.sort_by_key(KeyBinding::label);
        matches.into_iter().next()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::default_bindings()
    }
}

/// One entry of a drop-down menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub command: Command,
}

/// A menu bar title and its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub items: &'static [MenuItem],
}

pub const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        items: &[
            MenuItem {
                label: "New",
                command: Command::New,
            },
            MenuItem {
                label: "Open...",
                command: Command::Open,
            },
            MenuItem {
                label: "Save",
                command: Command::Save,
            },
            MenuItem {
                label: "Save As...",
                command: Command::SaveAs,
            },
            MenuItem {
                label: "Quit",
                command: Command::Quit,
            },
        ],
    },
    Menu {
        title: "Help",
        items: &[MenuItem {
            label: "About",
            command: Command::About,
        }],
    },
];

/// Column where each menu title starts on the menu bar, plus its width.
pub fn menu_title_spans() -> Vec<(u16, u16)> {
    let mut x = 1u16;
    MENUS
        .iter()
        .map(|menu| {
            #[allow(clippy::cast_possible_truncation)]
            let width = menu.title.len() as u16 + 2;
            let span = (x, width);
            x += width + 1;
            span
        })
        .collect()
}
