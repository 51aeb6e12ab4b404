//! Pointer and keyboard events as seen by the editor.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in screen coordinates.
///
/// `over_ui` is set by the host when the event was dispatched over its
/// control panel; such events never start or extend strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, over_ui: bool },
    Move { position: Point, over_ui: bool },
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position } => position,
        }
    }
}

/// Keys the editor binds shortcuts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Backspace,
    Space,
    Char(char),
}

/// Editor operations reachable from buttons and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Commit,
    Undo,
    TogglePlay,
    DeleteLastFrame,
    ClearCurrent,
    ClearAll,
    ExportAnimation,
    ExportImages,
}

impl Command {
    /// Shortcut binding for a key press, if any.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Enter => Some(Command::Commit),
            Key::Backspace => Some(Command::Undo),
            Key::Space => Some(Command::TogglePlay),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'z' => Some(Command::DeleteLastFrame),
                'c' => Some(Command::ClearCurrent),
                'q' => Some(Command::ClearAll),
                's' => Some(Command::ExportAnimation),
                _ => None,
            },
        }
    }

    /// Human-readable label for buttons and the shortcut list.
    pub fn label(self) -> &'static str {
        match self {
            Command::Commit => "Commit frame",
            Command::Undo => "Undo stroke",
            Command::TogglePlay => "Play / pause",
            Command::DeleteLastFrame => "Delete last frame",
            Command::ClearCurrent => "Clear current",
            Command::ClearAll => "Clear all",
            Command::ExportAnimation => "Export GIF",
            Command::ExportImages => "Export PNGs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(Key::Enter), Some(Command::Commit));
        assert_eq!(Command::from_key(Key::Backspace), Some(Command::Undo));
        assert_eq!(Command::from_key(Key::Space), Some(Command::TogglePlay));
        assert_eq!(Command::from_key(Key::Char('Z')), Some(Command::DeleteLastFrame));
        assert_eq!(Command::from_key(Key::Char('q')), Some(Command::ClearAll));
        assert_eq!(Command::from_key(Key::Char('s')), Some(Command::ExportAnimation));
        assert_eq!(Command::from_key(Key::Char('x')), None);
    }
}
