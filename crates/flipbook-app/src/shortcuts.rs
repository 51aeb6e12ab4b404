//! Keyboard shortcut registry and documentation.

use flipbook_core::{Command, Key};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Key,
    pub command: Command,
}

impl Shortcut {
    pub const fn new(key: Key, command: Command) -> Self {
        Self { key, command }
    }

    /// Format the key for display (e.g., "Space").
    pub fn format(&self) -> String {
        match self.key {
            Key::Enter => "Enter".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Space => "Space".to_string(),
            Key::Char(c) => c.to_ascii_uppercase().to_string(),
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        [
            Key::Enter,
            Key::Backspace,
            Key::Space,
            Key::Char('z'),
            Key::Char('c'),
            Key::Char('q'),
            Key::Char('s'),
        ]
        .into_iter()
        .filter_map(|key| Command::from_key(key).map(|command| Shortcut::new(key, command)))
        .collect()
    }

    /// Display string of the key bound to `command`, if any.
    pub fn hint(command: Command) -> Option<String> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.command == command)
            .map(|shortcut| shortcut.format())
    }

    /// Translate an egui key press into an editor key.
    pub fn map_key(key: egui::Key) -> Option<Key> {
        match key {
            egui::Key::Enter => Some(Key::Enter),
            egui::Key::Backspace => Some(Key::Backspace),
            egui::Key::Space => Some(Key::Space),
            egui::Key::Z => Some(Key::Char('z')),
            egui::Key::C => Some(Key::Char('c')),
            egui::Key::Q => Some(Key::Char('q')),
            egui::Key::S => Some(Key::Char('s')),
            _ => None,
        }
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:12} {}", shortcut.format(), shortcut.command.label());
        }
        println!();
    }
}
