//! Command system for composer actions.
//!
//! ## Learning: The Command Pattern
//!
//! Keyboard shortcuts, toolbar buttons and the CLI all produce a
//! [`Command`] value and hand it to [`CommandRegistry::execute`]. Built-in
//! commands are enum variants; hosts can add named commands through
//! [`CommandHandler`] trait objects.

use std::collections::HashMap;

use crate::canvas::Device;
use crate::clipboard::Clipboard;
use crate::composer::Composer;
use crate::document::MoveDirection;
use crate::{CoreError, CoreResult};

/// Built-in composer commands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    // Block commands
    AddBlock { type_key: String, index: Option<usize> },
    DeleteSelected,
    DuplicateSelected,
    MoveSelectedUp,
    MoveSelectedDown,

    // Edit commands
    Undo,
    Redo,
    Copy,
    Paste,
    Deselect,

    // Document commands
    Save,

    // View
    SetDevice(Device),

    // Custom command (name, arguments)
    Custom { name: String, args: Vec<String> },
}

impl Command {
    /// Returns the command's display name.
    pub fn display_name(&self) -> &str {
        match self {
            Command::AddBlock { .. } => "Add Block",
            Command::DeleteSelected => "Delete Block",
            Command::DuplicateSelected => "Duplicate Block",
            Command::MoveSelectedUp => "Move Block Up",
            Command::MoveSelectedDown => "Move Block Down",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Copy => "Copy Block",
            Command::Paste => "Paste Block",
            Command::Deselect => "Deselect",
            Command::Save => "Save",
            Command::SetDevice(Device::Desktop) => "Desktop Preview",
            Command::SetDevice(Device::Tablet) => "Tablet Preview",
            Command::SetDevice(Device::Mobile) => "Mobile Preview",
            Command::Custom { name, .. } => name,
        }
    }

    /// Parses a command name as written in the config file.
    pub fn parse(s: &str) -> Option<Self> {
        let cmd = match s {
            "composer.delete" => Command::DeleteSelected,
            "composer.duplicate" => Command::DuplicateSelected,
            "composer.move_up" => Command::MoveSelectedUp,
            "composer.move_down" => Command::MoveSelectedDown,
            "composer.undo" => Command::Undo,
            "composer.redo" => Command::Redo,
            "composer.copy" => Command::Copy,
            "composer.paste" => Command::Paste,
            "composer.deselect" => Command::Deselect,
            "composer.save" => Command::Save,
            _ => {
                if let Some(device) = s.strip_prefix("composer.device.") {
                    return Device::from_key(device).map(Command::SetDevice);
                }
                if let Some(type_key) = s.strip_prefix("composer.add.") {
                    return composer_blocks::registry::lookup(type_key).map(|def| {
                        Command::AddBlock {
                            type_key: def.key.to_string(),
                            index: None,
                        }
                    });
                }
                return None;
            }
        };
        Some(cmd)
    }

    /// Returns true for commands that act on the selected block.
    pub fn requires_selection(&self) -> bool {
        matches!(
            self,
            Command::DeleteSelected
                | Command::DuplicateSelected
                | Command::MoveSelectedUp
                | Command::MoveSelectedDown
                | Command::Copy
        )
    }
}

/// Context passed to command execution.
pub struct CommandContext<'a> {
    pub composer: &'a mut Composer,
    pub clipboard: &'a mut Clipboard,
}

/// Trait for custom command handlers.
///
/// ## Learning: Trait Objects
///
/// `dyn CommandHandler` allows storing different types that
/// implement this trait in the same collection. The `Send + Sync`
/// bounds ensure thread safety.
pub trait CommandHandler: Send + Sync {
    /// Returns the command name.
    fn name(&self) -> &str;

    /// Executes the command.
    fn execute(&self, ctx: &mut CommandContext, args: &[String]) -> CoreResult<()>;

    /// Returns a description for the command palette.
    fn description(&self) -> &str {
        self.name()
    }
}

/// Registry for commands.
pub struct CommandRegistry {
    /// Custom command handlers
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Creates a new registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a custom command handler.
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
        let name = handler.name().to_string();
        self.handlers.insert(name, handler);
    }

    /// Executes a command.
    ///
    /// Internal consistency errors (stale ids, nothing selected) are logged
    /// and swallowed. Everything else is returned.
    pub async fn execute(&self, cmd: &Command, ctx: &mut CommandContext<'_>) -> CoreResult<()> {
        match self.dispatch(cmd, ctx).await {
            Err(e) if e.is_internal() => {
                tracing::debug!("{} ignored: {}", cmd.display_name(), e);
                Ok(())
            }
            other => other,
        }
    }

    async fn dispatch(&self, cmd: &Command, ctx: &mut CommandContext<'_>) -> CoreResult<()> {
        let composer = &mut *ctx.composer;

        match cmd {
            Command::AddBlock { type_key, index } => {
                let index = index.unwrap_or(composer.document().len());
                composer.add_block(type_key, index).map(|_| ())
            }
            Command::DeleteSelected => composer.delete_selected().map(|_| ()),
            Command::DuplicateSelected => {
                let id = composer.selected_id()?;
                composer.duplicate_block(&id).map(|_| ())
            }
            Command::MoveSelectedUp => {
                let id = composer.selected_id()?;
                composer.move_block(&id, MoveDirection::Up).map(|_| ())
            }
            Command::MoveSelectedDown => {
                let id = composer.selected_id()?;
                composer.move_block(&id, MoveDirection::Down).map(|_| ())
            }
            Command::Undo => composer.undo().map(|_| ()),
            Command::Redo => composer.redo().map(|_| ()),
            Command::Copy => composer.copy_block(ctx.clipboard),
            Command::Paste => composer.paste_block(ctx.clipboard).map(|_| ()),
            Command::Deselect => {
                composer.deselect_all();
                Ok(())
            }
            Command::Save => composer.save().await.map(|_| ()),
            Command::SetDevice(device) => {
                composer.set_device(*device);
                Ok(())
            }
            Command::Custom { name, args } => {
                if let Some(handler) = self.handlers.get(name) {
                    handler.execute(ctx, args)
                } else {
                    Err(CoreError::CommandNotFound(name.clone()))
                }
            }
        }
    }

    /// Returns all registered command names.
    pub fn list(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
