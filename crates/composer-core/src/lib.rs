//! # Composer Core
//!
//! The editing session of the visual page composer.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Composer                          │
//! │  ┌──────────┐ ┌──────────┐ ┌───────────┐ ┌────────────┐  │
//! │  │  Config  │ │  Keymap  │ │ Event Bus │ │   Access   │  │
//! │  └──────────┘ └──────────┘ └───────────┘ └────────────┘  │
//! │        │                                                 │
//! │  ┌─────┴──────────────────────┐   ┌──────────────────┐   │
//! │  │          Document          │──▶│  CanvasRenderer  │   │
//! │  │  blocks · selection · dirty│   │  markup+bindings │   │
//! │  │  History (snapshots)       │   └──────────────────┘   │
//! │  └─────┬──────────────────────┘            │             │
//! │        │                          ┌──────────────────┐   │
//! │        │                          │  DragController  │   │
//! │        ▼                          └──────────────────┘   │
//! │  ┌────────────────────────────┐                          │
//! │  │ persistence ⇄ DocumentStore│                          │
//! │  └────────────────────────────┘                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Policy
//!
//! - Unknown block types and block ids are internal consistency errors:
//!   the session logs them and carries on as a no-op
//! - Store failures are surfaced to the user as a notification event
//! - Nothing is retried automatically

pub mod access;
pub mod canvas;
pub mod clipboard;
pub mod command;
pub mod composer;
pub mod config;
pub mod document;
pub mod dragdrop;
pub mod event;
pub mod keymap;
pub mod media;
pub mod persistence;
pub mod store;

pub use access::{Access, AccessPolicy, AllowAll, Permission, PermissionSet};
pub use canvas::{Binding, Bindings, CanvasRenderer, CanvasView, Device, ToolbarAction};
pub use clipboard::Clipboard;
pub use command::{Command, CommandContext, CommandHandler, CommandRegistry};
pub use composer::Composer;
pub use config::Config;
pub use document::{Document, MoveDirection};
pub use dragdrop::{DragController, DragSource, DropOutcome};
pub use event::{ComposerEvent, EventBus, EventHandler, NotificationLevel};
pub use keymap::{Key, KeyBinding, KeyPress, Keymap, Modifiers};
pub use media::MediaPicker;
pub use persistence::{SaveRequest, StoredDocument};
pub use store::{DocumentId, DocumentStore, DocumentSummary, FileStore, MemoryStore, StoreError};

use composer_blocks::BlockId;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("No block selected")]
    NothingSelected,

    #[error("Invalid block content: {0}")]
    Content(#[from] composer_blocks::BlockError),

    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Permission denied: {0}")]
    AccessDenied(Permission),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Command not found: {0}")]
    CommandNotFound(String),
}

impl CoreError {
    /// Returns true for errors that indicate a UI/state desync rather than
    /// something the user can act on. These are logged, never shown.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CoreError::UnknownBlockType(_)
                | CoreError::BlockNotFound(_)
                | CoreError::NothingSelected
                | CoreError::Content(_)
        )
    }
}
