//! Typed input events routed into the editing session.
//!
//! These are independent of any UI toolkit: the renderer translates its own
//! pointer/keyboard events into [`GestureEvent`]s and performs hit-testing.

use crate::drag::DragTarget;

/// A pointer or keyboard input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureEvent {
    /// `target` is what the renderer found under the pointer, if anything.
    PointerDown {
        x: f64,
        y: f64,
        target: Option<DragTarget>,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp,
    /// The pointer left the interactive surface; cancels any active drag.
    PointerLeave,
    KeyPress {
        code: KeyCode,
        modifiers: Modifiers,
    },
}

impl GestureEvent {
    /// Key press with no modifiers held.
    pub fn key(code: KeyCode) -> Self {
        Self::KeyPress {
            code,
            modifiers: Modifiers::default(),
        }
    }

    /// Press with no modifiers held.
    pub fn press(x: f64, target: Option<DragTarget>) -> Self {
        Self::PointerDown {
            x,
            y: 0.0,
            target,
            modifiers: Modifiers::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Delete,
    Backspace,
    Char(char),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Shift- or command-click adds to the selection instead of replacing it.
    pub fn extends_selection(&self) -> bool {
        self.shift || self.command()
    }
}

/// Editor action bound to a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Cancel,
    Undo,
    Redo,
    DeleteSelection,
    ZoomIn,
    ZoomOut,
    ToggleSyncMode,
}

/// Map a key press to an editor action.
pub fn key_action(code: KeyCode, modifiers: Modifiers) -> Option<KeyAction> {
    match code {
        KeyCode::Escape => Some(KeyAction::Cancel),
        KeyCode::Delete | KeyCode::Backspace => Some(KeyAction::DeleteSelection),
        KeyCode::Char(c) if modifiers.command() => match c.to_ascii_lowercase() {
            'z' if modifiers.shift => Some(KeyAction::Redo),
            'z' => Some(KeyAction::Undo),
            'y' => Some(KeyAction::Redo),
            _ => None,
        },
        KeyCode::Char('+' | '=') => Some(KeyAction::ZoomIn),
        KeyCode::Char('-' | '_') => Some(KeyAction::ZoomOut),
        KeyCode::Char('s' | 'S') => Some(KeyAction::ToggleSyncMode),
        KeyCode::Char(_) => None,
    }
}
