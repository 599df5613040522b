//! Keyboard shortcuts.
//!
//! ## Learning: Lookup Tables
//!
//! A keymap is a `HashMap<KeyPress, Command>`. Modifier normalization
//! happens before lookup (Meta is treated as Ctrl, letters are folded to
//! lowercase) so `Cmd+Z`, `Ctrl+z` and `Ctrl+Z` all find the same entry.

use std::collections::HashMap;

use crate::command::Command;
use crate::config::Config;

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool, // Cmd on macOS, Win on Windows
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Ctrl modifier.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Meta (Cmd/Win) modifier.
    pub const META: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// Ctrl+Shift.
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Returns true if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }

    /// Parses modifiers from a string like "ctrl+shift".
    pub fn parse(s: &str) -> Self {
        let mut mods = Modifiers::NONE;
        for part in s.split('+').map(|p| p.trim().to_lowercase()) {
            match part.as_str() {
                "ctrl" | "control" => mods.ctrl = true,
                "alt" | "option" => mods.alt = true,
                "shift" => mods.shift = true,
                "meta" | "cmd" | "win" => mods.meta = true,
                _ => {}
            }
        }
        mods
    }

    /// Folds Meta into Ctrl.
    fn normalized(self) -> Self {
        Self {
            ctrl: self.ctrl || self.meta,
            meta: false,
            ..self
        }
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            #[cfg(target_os = "macos")]
            parts.push("Cmd");
            #[cfg(not(target_os = "macos"))]
            parts.push("Win");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Space,
}

impl Key {
    /// Parses a key from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "backspace" | "bs" => Some(Key::Backspace),
            "delete" | "del" => Some(Key::Delete),
            "escape" | "esc" => Some(Key::Escape),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "space" => Some(Key::Space),
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }

    fn normalized(&self) -> Self {
        match self {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other.clone(),
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Escape => write!(f, "Escape"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Space => write!(f, "Space"),
        }
    }
}

/// A key press event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Creates a new key press.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Parses a binding string like "ctrl+s" or "ctrl+shift+z".
    pub fn parse(s: &str) -> Option<Self> {
        let (mod_str, key_str) = match s.rsplit_once('+') {
            Some((mods, key)) => (mods, key),
            None => ("", s),
        };
        Some(Self {
            key: Key::parse(key_str)?,
            modifiers: Modifiers::parse(mod_str),
        })
    }

    /// The form used as a lookup key.
    fn normalized(&self) -> Self {
        Self {
            key: self.key.normalized(),
            modifiers: self.modifiers.normalized(),
        }
    }
}

impl std::fmt::Display for KeyPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

/// A key binding maps a key press to a command.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyPress,
    pub command: Command,
}

impl KeyBinding {
    pub fn new(key: KeyPress, command: Command) -> Self {
        Self { key, command }
    }
}

/// Keyboard mapping for a composer session.
#[derive(Debug, Clone)]
pub struct Keymap {
    /// Bindings by normalized key press
    by_key: HashMap<KeyPress, KeyBinding>,
}

impl Keymap {
    /// Creates a keymap with the default bindings.
    pub fn new() -> Self {
        let mut keymap = Self {
            by_key: HashMap::new(),
        };
        keymap.add_default_bindings();
        keymap
    }

    /// Creates a keymap from configuration.
    ///
    /// User bindings replace defaults on the same key. Unparseable entries
    /// are logged and skipped.
    pub fn from_config(config: &Config) -> Self {
        let mut keymap = Self::new();

        for (key_str, cmd_str) in &config.keyboard.bindings {
            match (KeyPress::parse(key_str), Command::parse(cmd_str)) {
                (Some(key), Some(cmd)) => keymap.add_binding(KeyBinding::new(key, cmd)),
                _ => tracing::warn!("Ignoring key binding {} = {}", key_str, cmd_str),
            }
        }

        keymap
    }

    fn add_default_bindings(&mut self) {
        use crate::command::Command::*;

        let bindings = [
            (Key::Char('z'), Modifiers::CTRL, Undo),
            (Key::Char('z'), Modifiers::CTRL_SHIFT, Redo),
            (Key::Char('y'), Modifiers::CTRL, Redo),
            (Key::Char('s'), Modifiers::CTRL, Save),
            (Key::Char('c'), Modifiers::CTRL, Copy),
            (Key::Char('v'), Modifiers::CTRL, Paste),
            (Key::Delete, Modifiers::NONE, DeleteSelected),
            (Key::Escape, Modifiers::NONE, Deselect),
        ];

        for (key, mods, cmd) in bindings {
            self.add_binding(KeyBinding::new(KeyPress::new(key, mods), cmd));
        }
    }

    /// Adds a binding, replacing any binding on the same key.
    pub fn add_binding(&mut self, binding: KeyBinding) {
        self.by_key.insert(binding.key.normalized(), binding);
    }

    /// Resolves a key press.
    ///
    /// Commands that act on the selected block only match while a block is
    /// selected.
    pub fn lookup(&self, key: &KeyPress, has_selection: bool) -> Option<&Command> {
        let binding = self.by_key.get(&key.normalized())?;
        if binding.command.requires_selection() && !has_selection {
            return None;
        }
        Some(&binding.command)
    }

    /// Returns all bindings.
    pub fn bindings(&self) -> impl Iterator<Item = &KeyBinding> {
        self.by_key.values()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(s: &str) -> KeyPress {
        KeyPress::parse(s).unwrap()
    }

    #[test]
    fn test_keypress_parse() {
        let kp = press("ctrl+s");
        assert_eq!(kp.key, Key::Char('s'));
        assert!(kp.modifiers.ctrl);

        let kp = press("Ctrl+Shift+Z");
        assert_eq!(kp.key, Key::Char('z'));
        assert_eq!(kp.modifiers, Modifiers::CTRL_SHIFT);

        assert_eq!(press("Delete").key, Key::Delete);
        assert!(KeyPress::parse("ctrl+nope").is_none());
    }

    #[test]
    fn test_default_bindings() {
        let keymap = Keymap::new();
        assert_eq!(keymap.lookup(&press("ctrl+z"), false), Some(&Command::Undo));
        assert_eq!(keymap.lookup(&press("ctrl+shift+z"), false), Some(&Command::Redo));
        assert_eq!(keymap.lookup(&press("ctrl+y"), false), Some(&Command::Redo));
        assert_eq!(keymap.lookup(&press("ctrl+s"), false), Some(&Command::Save));
        assert_eq!(keymap.lookup(&press("ctrl+v"), false), Some(&Command::Paste));
        assert_eq!(keymap.lookup(&press("escape"), false), Some(&Command::Deselect));
        assert_eq!(keymap.lookup(&press("ctrl+q"), false), None);
    }

    #[test]
    fn test_meta_acts_like_ctrl() {
        let keymap = Keymap::new();
        let cmd_z = KeyPress::new(Key::Char('z'), Modifiers::META);
        assert_eq!(keymap.lookup(&cmd_z, false), Some(&Command::Undo));

        let shifted = KeyPress::new(Key::Char('Z'), Modifiers::CTRL_SHIFT);
        assert_eq!(keymap.lookup(&shifted, false), Some(&Command::Redo));
    }

    #[test]
    fn test_block_shortcuts_need_selection() {
        let keymap = Keymap::new();
        assert_eq!(keymap.lookup(&press("ctrl+c"), false), None);
        assert_eq!(keymap.lookup(&press("ctrl+c"), true), Some(&Command::Copy));
        assert_eq!(keymap.lookup(&press("delete"), false), None);
        assert_eq!(
            keymap.lookup(&press("delete"), true),
            Some(&Command::DeleteSelected)
        );
    }

    #[test]
    fn test_user_bindings_override_defaults() {
        let mut config = Config::default();
        config
            .keyboard
            .bindings
            .insert("ctrl+d".to_string(), "composer.duplicate".to_string());
        config
            .keyboard
            .bindings
            .insert("ctrl+y".to_string(), "composer.device.mobile".to_string());
        config
            .keyboard
            .bindings
            .insert("ctrl+k".to_string(), "composer.explode".to_string());

        let keymap = Keymap::from_config(&config);
        assert_eq!(
            keymap.lookup(&press("ctrl+d"), true),
            Some(&Command::DuplicateSelected)
        );
        assert_eq!(
            keymap.lookup(&press("ctrl+y"), false),
            Some(&Command::SetDevice(crate::canvas::Device::Mobile))
        );
        assert_eq!(keymap.lookup(&press("ctrl+k"), false), None);
    }
}
