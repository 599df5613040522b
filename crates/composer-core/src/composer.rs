//! The composer session.
//!
//! ## Learning: The Facade Pattern
//!
//! `Composer` is the one object a host talks to. It owns the document, the
//! canvas, the drag state and the store handle, and after every change it
//! re-renders the canvas and broadcasts what happened on the event bus.
//!
//! ## Thread Safety
//!
//! A session is owned by a single task. Only the store is shared
//! (`Arc<dyn DocumentStore>`). Saving is split into [`Composer::prepare_save`]
//! and [`Composer::complete_save`] so a host can run the store call on
//! another task while the user keeps editing.

use std::sync::Arc;

use composer_blocks::{BlockId, ContentValue, PropertyField, property_fields};
use tokio::sync::broadcast;

use crate::access::{Access, AccessPolicy, AllowAll, Permission};
use crate::canvas::{Binding, CanvasRenderer, CanvasView, Device, ToolbarAction};
use crate::clipboard::Clipboard;
use crate::command::Command;
use crate::config::Config;
use crate::document::{Document, MoveDirection};
use crate::dragdrop::{DragController, DropOutcome};
use crate::event::{ComposerEvent, EventBus, NotificationLevel};
use crate::keymap::{KeyPress, Keymap};
use crate::media::MediaPicker;
use crate::persistence::SaveRequest;
use crate::store::{DocumentId, DocumentStore, StoreError, StoreResult};
use crate::{CoreError, CoreResult};

/// An editing session over one document.
pub struct Composer {
    /// The document being edited
    document: Document,

    /// Session configuration
    config: Config,

    /// Key bindings
    keymap: Keymap,

    /// Canvas renderer and the output of its last pass
    renderer: CanvasRenderer,
    view: CanvasView,

    /// Drag in progress
    drag: DragController,

    /// Where documents are loaded from and saved to
    store: Arc<dyn DocumentStore>,

    /// Authorization oracle
    access: Arc<dyn AccessPolicy>,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl Composer {
    /// Creates a session over an empty document.
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let document = Document::new(config.editor.history_limit);
        let keymap = Keymap::from_config(&config);
        let mut renderer = CanvasRenderer::new(config.editor.default_device);
        let view = renderer.render(&document);

        Self {
            document,
            config,
            keymap,
            renderer,
            view,
            drag: DragController::new(),
            store,
            access: Arc::new(AllowAll),
            event_bus: EventBus::new(),
        }
    }

    /// Replaces the authorization policy.
    pub fn with_access(mut self, access: Arc<dyn AccessPolicy>) -> Self {
        self.access = access;
        self
    }

    /// Creates a session, loading `id` if given.
    ///
    /// A failed load leaves the session on an empty document; the failure
    /// is reported as a notification.
    pub async fn open(
        config: Config,
        store: Arc<dyn DocumentStore>,
        id: Option<DocumentId>,
    ) -> Self {
        let mut composer = Self::new(config, store);
        if let Some(id) = id {
            if let Err(e) = composer.load(&id).await {
                tracing::warn!("Starting with an empty document: {}", e);
            }
        }
        composer
    }

    // ==================== Accessors ====================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document.id()
    }

    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output of the last canvas render.
    pub fn view(&self) -> &CanvasView {
        &self.view
    }

    pub fn device(&self) -> Device {
        self.renderer.device()
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Returns the selected block id.
    pub fn selected_id(&self) -> CoreResult<BlockId> {
        self.document
            .selected()
            .cloned()
            .ok_or(CoreError::NothingSelected)
    }

    /// Editable fields of the selected block, for the property panel.
    pub fn selected_properties(&self) -> Vec<PropertyField> {
        self.document
            .selected_block()
            .map(|block| property_fields(&block.content))
            .unwrap_or_default()
    }

    // ==================== Block Operations ====================

    /// Adds a block of the given type at `index`.
    pub fn add_block(&mut self, type_key: &str, index: usize) -> CoreResult<BlockId> {
        self.require(Permission::EditDocument)?;
        let id = self.document.add_block(type_key, index)?;
        self.emit_added(&id);
        self.changed();
        Ok(id)
    }

    /// Deletes a block.
    pub fn delete_block(&mut self, id: &BlockId) -> CoreResult<()> {
        self.require(Permission::EditDocument)?;
        let was_selected = self.document.selected() == Some(id);
        self.document.delete_block(id)?;

        self.emit(ComposerEvent::BlockDeleted(id.clone()));
        if was_selected {
            self.emit(ComposerEvent::SelectionChanged(None));
        }
        self.changed();
        Ok(())
    }

    /// Deletes the selected block.
    pub fn delete_selected(&mut self) -> CoreResult<()> {
        let id = self.selected_id()?;
        self.delete_block(&id)
    }

    /// Duplicates a block right after itself and selects the copy.
    pub fn duplicate_block(&mut self, id: &BlockId) -> CoreResult<BlockId> {
        self.require(Permission::EditDocument)?;
        let copy = self.document.duplicate_block(id)?;

        self.emit(ComposerEvent::BlockDuplicated {
            source: id.clone(),
            copy: copy.clone(),
        });
        self.emit(ComposerEvent::SelectionChanged(Some(copy.clone())));
        self.changed();
        self.notify(NotificationLevel::Success, "Block duplicated");
        Ok(copy)
    }

    /// Moves a block one step. Returns false at the boundaries.
    pub fn move_block(&mut self, id: &BlockId, direction: MoveDirection) -> CoreResult<bool> {
        self.require(Permission::EditDocument)?;
        let moved = self.document.move_block(id, direction)?;
        if moved {
            self.emit_moved(id);
            self.changed();
        }
        Ok(moved)
    }

    /// Moves a block to a drop-zone index. Returns false if it stays put.
    pub fn move_block_to(&mut self, id: &BlockId, zone: usize) -> CoreResult<bool> {
        self.require(Permission::EditDocument)?;
        let moved = self.document.move_block_to(id, zone)?;
        if moved {
            self.emit_moved(id);
            self.changed();
        }
        Ok(moved)
    }

    /// Sets one content field of a block.
    pub fn update_block_content(
        &mut self,
        id: &BlockId,
        key: &str,
        value: impl Into<ContentValue>,
    ) -> CoreResult<bool> {
        self.require(Permission::EditDocument)?;
        let updated = self.document.update_block_content(id, key, value)?;
        if updated {
            self.emit_updated(id, key);
        }
        Ok(updated)
    }

    /// Applies a media picker answer to a block.
    pub fn apply_media(
        &mut self,
        picker: MediaPicker,
        id: &BlockId,
        input: &str,
    ) -> CoreResult<bool> {
        self.require(Permission::EditDocument)?;
        let updated = picker.apply(&mut self.document, id, input)?;
        if updated {
            self.emit_updated(id, picker.field());
        }
        Ok(updated)
    }

    // ==================== Selection ====================

    /// Selects a block. Unknown ids are ignored.
    pub fn select_block(&mut self, id: &BlockId) -> bool {
        if self.document.selected() == Some(id) {
            return true;
        }
        if !self.document.select_block(id) {
            tracing::debug!("Select of unknown block {}", id);
            return false;
        }
        self.emit(ComposerEvent::SelectionChanged(Some(id.clone())));
        self.rerender();
        true
    }

    pub fn deselect_all(&mut self) {
        if self.document.selected().is_none() {
            return;
        }
        self.document.deselect_all();
        self.emit(ComposerEvent::SelectionChanged(None));
        self.rerender();
    }

    // ==================== History ====================

    pub fn undo(&mut self) -> CoreResult<bool> {
        self.require(Permission::EditDocument)?;
        let restored = self.document.undo();
        if restored {
            self.changed();
        }
        Ok(restored)
    }

    pub fn redo(&mut self) -> CoreResult<bool> {
        self.require(Permission::EditDocument)?;
        let restored = self.document.redo();
        if restored {
            self.changed();
        }
        Ok(restored)
    }

    // ==================== Clipboard ====================

    /// Copies the selected block.
    pub fn copy_block(&mut self, clipboard: &mut Clipboard) -> CoreResult<()> {
        self.document.copy_block(clipboard)?;
        self.notify(NotificationLevel::Success, "Block copied");
        Ok(())
    }

    /// Pastes the clipboard block after the selection.
    ///
    /// Returns `Ok(None)` if there was nothing usable to paste.
    pub fn paste_block(&mut self, clipboard: &Clipboard) -> CoreResult<Option<BlockId>> {
        self.require(Permission::EditDocument)?;
        let Some(id) = self.document.paste_block(clipboard) else {
            return Ok(None);
        };
        self.emit_added(&id);
        self.changed();
        self.notify(NotificationLevel::Success, "Block pasted");
        Ok(Some(id))
    }

    // ==================== Page Fields ====================

    pub fn set_title(&mut self, title: &str) -> CoreResult<()> {
        self.require(Permission::EditDocument)?;
        self.document.set_title(title);
        Ok(())
    }

    /// Replaces the site header markup.
    pub fn set_header(&mut self, markup: &str) -> CoreResult<()> {
        self.require(Permission::EditDocument)?;
        self.document.set_header(markup);
        Ok(())
    }

    /// Replaces the site footer markup.
    pub fn set_footer(&mut self, markup: &str) -> CoreResult<()> {
        self.require(Permission::EditDocument)?;
        self.document.set_footer(markup);
        Ok(())
    }

    // ==================== Canvas Interaction ====================

    pub fn set_device(&mut self, device: Device) {
        if device == self.renderer.device() {
            return;
        }
        self.renderer.set_device(device);
        self.emit(ComposerEvent::DeviceChanged(device));
        self.rerender();
    }

    /// Handles a click on a canvas target.
    pub fn click(&mut self, pass: u64, target: &str) -> CoreResult<()> {
        let binding = self.view.bindings.resolve(pass, target).cloned();
        match binding {
            Some(Binding::Block { id }) => {
                self.select_block(&id);
                Ok(())
            }
            Some(Binding::Toolbar { id, action }) => match action {
                ToolbarAction::MoveUp => self.move_block(&id, MoveDirection::Up).map(|_| ()),
                ToolbarAction::MoveDown => self.move_block(&id, MoveDirection::Down).map(|_| ()),
                ToolbarAction::Duplicate => self.duplicate_block(&id).map(|_| ()),
                ToolbarAction::Delete => self.delete_block(&id),
            },
            _ => {
                tracing::debug!("Click on inert target {}", target);
                Ok(())
            }
        }
    }

    /// Starts dragging a palette entry.
    pub fn start_palette_drag(&mut self, type_key: &str) {
        self.drag.start_palette(type_key);
    }

    /// Starts dragging a block by one of its canvas targets.
    pub fn start_block_drag(&mut self, pass: u64, target: &str) -> bool {
        self.drag.start_block(&self.view.bindings, pass, target)
    }

    /// Abandons the drag in progress.
    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    /// Drops the dragged item on `target`, or off the canvas with `None`.
    pub fn drop_on(&mut self, pass: u64, target: Option<&str>) -> CoreResult<DropOutcome> {
        if !self.drag.is_dragging() {
            return Ok(DropOutcome::Discarded);
        }
        if let Err(e) = self.require(Permission::EditDocument) {
            self.drag.end();
            return Err(e);
        }

        let outcome = self
            .drag
            .drop_on(&mut self.document, &self.view.bindings, pass, target)?;
        match &outcome {
            DropOutcome::Added(id) => {
                self.emit_added(id);
                self.changed();
            }
            DropOutcome::Moved(id) => {
                self.emit_moved(id);
                self.changed();
            }
            DropOutcome::Unchanged | DropOutcome::Discarded => {}
        }
        Ok(outcome)
    }

    /// Resolves a key press to a command.
    pub fn command_for_key(&self, key: &KeyPress) -> Option<Command> {
        self.keymap
            .lookup(key, self.document.selected().is_some())
            .cloned()
    }

    // ==================== Persistence ====================

    /// Loads a stored document, replacing the current one.
    pub async fn load(&mut self, id: &DocumentId) -> CoreResult<()> {
        self.require(Permission::ViewDocuments)?;

        match self.store.load(id).await {
            Ok(record) => {
                self.document.hydrate(id.clone(), record);
                tracing::info!("Loaded document {}", id);
                self.emit(ComposerEvent::DocumentLoaded(id.clone()));
                self.emit(ComposerEvent::SelectionChanged(None));
                self.changed();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Load error: {}", e);
                self.notify(NotificationLevel::Error, "Error loading document");
                Err(match e {
                    StoreError::NotFound(id) => CoreError::DocumentNotFound(id),
                    other => other.into(),
                })
            }
        }
    }

    /// Takes the record to save. Nothing is written yet.
    pub fn prepare_save(&self) -> CoreResult<SaveRequest> {
        let permission = match self.document.id() {
            Some(_) => Permission::EditDocument,
            None => Permission::CreateDocument,
        };
        self.require(permission)?;
        Ok(self.document.prepare_save())
    }

    /// Applies the outcome of a store call started from `request`.
    pub fn complete_save(
        &mut self,
        request: SaveRequest,
        result: StoreResult<DocumentId>,
    ) -> CoreResult<DocumentId> {
        match result {
            Ok(id) => {
                let created = request.id.is_none();
                self.document.mark_saved(id.clone(), request.revision);
                tracing::info!("Saved document {}", id);

                if created {
                    self.emit(ComposerEvent::DocumentCreated(id.clone()));
                }
                self.emit(ComposerEvent::DocumentSaved(id.clone()));
                self.notify(NotificationLevel::Success, "Document saved!");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("Save error: {}", e);
                self.notify(NotificationLevel::Error, "Error saving document");
                Err(e.into())
            }
        }
    }

    /// Saves the document to the store.
    pub async fn save(&mut self) -> CoreResult<DocumentId> {
        let request = self.prepare_save()?;
        let store = Arc::clone(&self.store);
        let result = store.save(request.id.as_ref(), &request.record).await;
        self.complete_save(request, result)
    }

    /// Publishable markup of the document.
    pub fn export_markup(&self) -> String {
        self.document.export_markup()
    }

    /// Standalone preview page of the document.
    pub fn preview(&self) -> String {
        self.document.preview_page(&self.config.export)
    }

    // ==================== Events ====================

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<ComposerEvent> {
        self.event_bus.subscribe()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    fn emit(&self, event: ComposerEvent) {
        self.event_bus.emit(event);
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.emit(ComposerEvent::Notification {
            level,
            message: message.into(),
            duration_ms: self.config.editor.toast_duration_ms,
        });
    }

    fn emit_added(&self, id: &BlockId) {
        let index = self.document.index_of(id).unwrap_or_default();
        self.emit(ComposerEvent::BlockAdded {
            id: id.clone(),
            index,
        });
        self.emit(ComposerEvent::SelectionChanged(Some(id.clone())));
    }

    fn emit_moved(&self, id: &BlockId) {
        let index = self.document.index_of(id).unwrap_or_default();
        self.emit(ComposerEvent::BlockMoved {
            id: id.clone(),
            index,
        });
    }

    fn emit_updated(&mut self, id: &BlockId, field: &str) {
        self.emit(ComposerEvent::BlockUpdated {
            id: id.clone(),
            field: field.to_string(),
        });
        self.changed();
    }

    /// Re-renders and reports history state after a document change.
    fn changed(&mut self) {
        self.rerender();
        self.emit(ComposerEvent::HistoryChanged {
            can_undo: self.document.can_undo(),
            can_redo: self.document.can_redo(),
        });
    }

    fn rerender(&mut self) {
        self.view = self.renderer.render(&self.document);
        self.emit(ComposerEvent::CanvasRendered {
            pass: self.view.bindings.pass(),
        });
    }

    fn require(&self, permission: Permission) -> CoreResult<()> {
        match self.access.authorize(permission) {
            Access::Allow => Ok(()),
            Access::Deny => {
                tracing::info!("Denied {}", permission);
                self.notify(
                    NotificationLevel::Error,
                    format!("Permission denied: {}", permission),
                );
                Err(CoreError::AccessDenied(permission))
            }
        }
    }
}
