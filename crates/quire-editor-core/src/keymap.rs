//! Keys, key combinations and the command table they map to.
//!
//! Platform code converts native key events into [`KeyCombo`]s; the
//! [`KeybindingConfig`] turns those into [`Command`]s for the editor.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::formatting::FormatAction;

/// Key values for keyboard input.
///
/// Mirrors the DOM `KeyboardEvent.key` values the editor cares about.
/// Printable keys, including space, arrive as `Character`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    // === Whitespace / editing ===
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    // === Navigation ===
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    // === Modifiers ===
    Alt,
    AltGraph,
    CapsLock,
    Control,
    Meta,
    Shift,

    /// Any other named key (`F5`, `PrintScreen`, ...).
    Named(SmolStr),
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// The single char this key types, if it is a one-char character key.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Character(s) => {
                let mut chars = s.chars();
                let c = chars.next()?;
                chars.next().is_none().then_some(c)
            }
            _ => None,
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft
                | Self::ArrowRight
                | Self::ArrowUp
                | Self::ArrowDown
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Self::Alt | Self::AltGraph | Self::CapsLock | Self::Control | Self::Meta | Self::Shift
        )
    }

    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(value: &str) -> Self {
        match value {
            "Unidentified" | "" => Self::Unidentified,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Alt" => Self::Alt,
            "AltGraph" => Self::AltGraph,
            "CapsLock" => Self::CapsLock,
            "Control" => Self::Control,
            "Meta" => Self::Meta,
            "Shift" => Self::Shift,
            s if s.chars().count() == 1 => Self::Character(s.into()),
            s => Self::Named(s.into()),
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    pub fn new(ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        Self {
            ctrl,
            alt,
            shift,
            meta,
        }
    }

    /// Ctrl, Alt or Meta held. Shift alone still counts as plain typing.
    pub fn any_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A key combination for triggering a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::CTRL,
        }
    }

    pub fn meta(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::META,
        }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::SHIFT,
        }
    }

    /// Lowercase character keys under Ctrl/Meta so Caps Lock doesn't break shortcuts.
    fn normalized(&self) -> Self {
        match &self.key {
            Key::Character(s) if self.modifiers.ctrl || self.modifiers.meta => Self {
                key: Key::Character(s.to_lowercase().into()),
                modifiers: self.modifiers,
            },
            _ => self.clone(),
        }
    }
}

/// What a key combination does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "action", rename_all = "camelCase")]
pub enum Command {
    /// Enter: one line break, two at the end of a line.
    InsertLineBreak,
    /// Tab: literal spaces.
    InsertTab,
    Format(FormatAction),
    Save,
    TogglePreview,
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
    /// Event should be passed through (navigation, etc.).
    PassThrough,
}

/// Key combination to command table.
#[derive(Debug, Clone)]
pub struct KeybindingConfig {
    bindings: HashMap<KeyCombo, Command>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self::default_for_platform(false)
    }
}

impl KeybindingConfig {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// The standard table. On macOS the Cmd variants are bound as well.
    pub fn default_for_platform(is_mac: bool) -> Self {
        let mut config = Self::empty();
        config.bind(KeyCombo::new(Key::Enter), Command::InsertLineBreak);
        config.bind(KeyCombo::new(Key::Tab), Command::InsertTab);

        let shortcuts = [
            ("b", Command::Format(FormatAction::Bold)),
            ("i", Command::Format(FormatAction::Italic)),
            ("u", Command::Format(FormatAction::Underline)),
            ("k", Command::Format(FormatAction::Link)),
            ("s", Command::Save),
            ("p", Command::TogglePreview),
        ];
        for (key, command) in shortcuts {
            config.bind(KeyCombo::ctrl(Key::character(key)), command);
            if is_mac {
                config.bind(KeyCombo::meta(Key::character(key)), command);
            }
        }
        config
    }

    pub fn bind(&mut self, combo: KeyCombo, command: Command) {
        self.bindings.insert(combo.normalized(), command);
    }

    pub fn unbind(&mut self, combo: &KeyCombo) -> Option<Command> {
        self.bindings.remove(&combo.normalized())
    }

    pub fn lookup(&self, combo: &KeyCombo) -> Option<Command> {
        self.bindings.get(&combo.normalized()).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
