//! Host input events, reduced to what the engine reacts to.

use std::fmt;
use std::str::FromStr;

/// Keys the catalog and gallery react to; everything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Space,
    Tab,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            "Enter" => Key::Enter,
            " " | "Spacebar" | "Space" => Key::Space,
            "Tab" => Key::Tab,
            _ => Key::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        alt: false,
        ctrl: false,
        meta: false,
    };

    /// Alt, Ctrl or Meta held. Shift alone does not count.
    pub fn has_command(self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

/// A key press with its modifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn shifted(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::SHIFT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key: {}", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

/// Parses `shift+tab`, `escape`, `left`, `ctrl+right`, ...
impl FromStr for KeyPress {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::NONE;
        let mut parts: Vec<&str> = s.split('+').collect();
        let name = parts.pop().unwrap_or_default().to_ascii_lowercase();
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "shift" => modifiers.shift = true,
                "alt" => modifiers.alt = true,
                "ctrl" => modifiers.ctrl = true,
                "meta" | "cmd" => modifiers.meta = true,
                _ => return Err(ParseKeyError(s.to_string())),
            }
        }
        let key = match name.as_str() {
            "escape" | "esc" => Key::Escape,
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            "home" => Key::Home,
            "end" => Key::End,
            "enter" => Key::Enter,
            "space" => Key::Space,
            "tab" => Key::Tab,
            _ => return Err(ParseKeyError(s.to_string())),
        };
        Ok(Self { key, modifiers })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
}

/// Device behind a pointer press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pointer {
    Mouse(MouseButton),
    Touch,
    Pen,
}

impl Pointer {
    /// Only primary mouse buttons count as a gallery press.
    pub fn is_primary(self) -> bool {
        !matches!(
            self,
            Pointer::Mouse(MouseButton::Auxiliary | MouseButton::Secondary)
        )
    }
}

/// Document visibility (`document.hidden`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}
