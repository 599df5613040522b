//! Event system for composer notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! We use `tokio::sync::broadcast` for the event bus:
//! - Events are values, not callbacks
//! - Subscribers receive clones
//! - A slow subscriber lags instead of blocking the session

use composer_blocks::BlockId;
use tokio::sync::broadcast;

use crate::canvas::Device;
use crate::store::DocumentId;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

impl NotificationLevel {
    /// Material symbol shown next to the message.
    pub fn icon(self) -> &'static str {
        match self {
            NotificationLevel::Success => "check_circle",
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        }
    }
}

/// Events emitted by a composer session.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    // Block events
    /// A block was inserted at `index`
    BlockAdded { id: BlockId, index: usize },
    /// A block was removed
    BlockDeleted(BlockId),
    /// `copy` was inserted right after `source`
    BlockDuplicated { source: BlockId, copy: BlockId },
    /// A block now sits at `index`
    BlockMoved { id: BlockId, index: usize },
    /// One content field of a block changed
    BlockUpdated { id: BlockId, field: String },

    // Session events
    /// The selection changed
    SelectionChanged(Option<BlockId>),
    /// Undo/redo availability after a change
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// The canvas was re-rendered
    CanvasRendered { pass: u64 },
    /// The preview device changed
    DeviceChanged(Device),

    // Document events
    /// A stored document was loaded
    DocumentLoaded(DocumentId),
    /// The first save assigned this id
    DocumentCreated(DocumentId),
    /// A save finished
    DocumentSaved(DocumentId),

    /// A transient toast for the user
    Notification {
        level: NotificationLevel,
        message: String,
        duration_ms: u64,
    },
}

/// Event bus for broadcasting composer events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ComposerEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        // Capacity of 256 events in the buffer
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: ComposerEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to events.
    pub fn subscribe(&self) -> broadcast::Receiver<ComposerEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for processing events asynchronously.
///
/// ## Example
///
/// ```ignore
/// let mut handler = EventHandler::new(composer.subscribe());
///
/// tokio::spawn(async move {
///     while let Some(event) = handler.next().await {
///         if let ComposerEvent::Notification { message, .. } = event {
///             show_toast(&message);
///         }
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<ComposerEvent>,
}

impl EventHandler {
    /// Creates a new event handler.
    pub fn new(receiver: broadcast::Receiver<ComposerEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> Option<ComposerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<ComposerEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(_) => return None,
            }
        }
    }

    /// Drains every queued event.
    pub fn drain(&mut self) -> Vec<ComposerEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
