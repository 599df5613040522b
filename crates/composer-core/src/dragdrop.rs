//! Drag and drop.
//!
//! Two gestures end on a drop zone:
//! - A palette entry dragged onto the canvas adds a new block there
//! - A block dragged by its handle is moved there
//!
//! Anything else (no drag in progress, a drop off the zones, a zone from an
//! old render pass) is discarded without touching the document.

use composer_blocks::BlockId;

use crate::CoreResult;
use crate::canvas::{Binding, Bindings};
use crate::document::Document;

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// A catalog entry from the palette, by type key
    Palette(String),
    /// An existing block
    Block(BlockId),
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// A new block was inserted
    Added(BlockId),
    /// A block changed position
    Moved(BlockId),
    /// A block was dropped next to itself
    Unchanged,
    /// The drop did not land on a valid target
    Discarded,
}

/// Tracks the drag in progress.
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<DragSource>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts dragging a palette entry.
    pub fn start_palette(&mut self, type_key: impl Into<String>) {
        self.active = Some(DragSource::Palette(type_key.into()));
    }

    /// Starts dragging the block behind a handle or block target.
    ///
    /// Returns false if the target is not a block of the given pass.
    pub fn start_block(&mut self, bindings: &Bindings, pass: u64, target: &str) -> bool {
        match bindings.resolve(pass, target) {
            Some(Binding::Handle { id }) | Some(Binding::Block { id }) => {
                self.active = Some(DragSource::Block(id.clone()));
                true
            }
            _ => false,
        }
    }

    /// Ends the drag without dropping.
    pub fn end(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&DragSource> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Completes the drag on `target`, or off every zone with `None`.
    ///
    /// The drag state is cleared whatever the outcome.
    pub fn drop_on(
        &mut self,
        doc: &mut Document,
        bindings: &Bindings,
        pass: u64,
        target: Option<&str>,
    ) -> CoreResult<DropOutcome> {
        let Some(source) = self.active.take() else {
            tracing::debug!("Drop without a drag in progress");
            return Ok(DropOutcome::Discarded);
        };

        let index = match target.and_then(|t| bindings.resolve(pass, t)) {
            Some(Binding::DropZone { index }) => *index,
            _ => {
                tracing::debug!("Drop outside any drop zone: {:?}", target);
                return Ok(DropOutcome::Discarded);
            }
        };

        match source {
            DragSource::Palette(type_key) => {
                let id = doc.add_block(&type_key, index)?;
                Ok(DropOutcome::Added(id))
            }
            DragSource::Block(id) => {
                if doc.move_block_to(&id, index)? {
                    Ok(DropOutcome::Moved(id))
                } else {
                    Ok(DropOutcome::Unchanged)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasRenderer;
    use composer_blocks::BlockKind;

    fn kinds(doc: &Document) -> Vec<BlockKind> {
        doc.blocks().iter().map(|b| b.kind()).collect()
    }

    #[test]
    fn test_palette_drop_on_empty_canvas() {
        let mut doc = Document::default();
        let view = CanvasRenderer::default().render(&doc);
        let mut drag = DragController::new();

        drag.start_palette("heading");
        let outcome = drag
            .drop_on(&mut doc, &view.bindings, view.bindings.pass(), Some("zone:0"))
            .unwrap();

        assert!(matches!(outcome, DropOutcome::Added(_)));
        assert_eq!(kinds(&doc), vec![BlockKind::Heading]);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_palette_drop_between_blocks() {
        let mut doc = Document::default();
        doc.add_block("heading", 0).unwrap();
        doc.add_block("divider", 1).unwrap();
        let view = CanvasRenderer::default().render(&doc);
        let mut drag = DragController::new();

        drag.start_palette("quote");
        drag.drop_on(&mut doc, &view.bindings, view.bindings.pass(), Some("zone:1"))
            .unwrap();
        assert_eq!(
            kinds(&doc),
            vec![BlockKind::Heading, BlockKind::Quote, BlockKind::Divider]
        );
    }

    #[test]
    fn test_block_drag_moves_with_one_history_entry() {
        let mut doc = Document::default();
        let a = doc.add_block("heading", 0).unwrap();
        doc.add_block("paragraph", 1).unwrap();
        doc.add_block("image", 2).unwrap();
        let before = doc.blocks().to_vec();

        let view = CanvasRenderer::default().render(&doc);
        let pass = view.bindings.pass();
        let mut drag = DragController::new();

        assert!(drag.start_block(&view.bindings, pass, &format!("handle:{}", a)));
        let outcome = drag
            .drop_on(&mut doc, &view.bindings, pass, Some("zone:3"))
            .unwrap();

        assert_eq!(outcome, DropOutcome::Moved(a));
        assert_eq!(
            kinds(&doc),
            vec![BlockKind::Paragraph, BlockKind::Image, BlockKind::Heading]
        );

        assert!(doc.undo());
        assert_eq!(doc.blocks(), before.as_slice());
    }

    #[test]
    fn test_block_dropped_next_to_itself() {
        let mut doc = Document::default();
        let a = doc.add_block("heading", 0).unwrap();
        doc.add_block("paragraph", 1).unwrap();
        let revision = doc.revision();

        let view = CanvasRenderer::default().render(&doc);
        let pass = view.bindings.pass();
        let mut drag = DragController::new();

        drag.start_block(&view.bindings, pass, &format!("block:{}", a));
        let outcome = drag.drop_on(&mut doc, &view.bindings, pass, Some("zone:1")).unwrap();
        assert_eq!(outcome, DropOutcome::Unchanged);
        assert_eq!(doc.revision(), revision);
    }

    #[test]
    fn test_discarded_drops() {
        let mut doc = Document::default();
        doc.add_block("heading", 0).unwrap();
        let mut renderer = CanvasRenderer::default();
        let stale = renderer.render(&doc);
        let view = renderer.render(&doc);
        let pass = view.bindings.pass();
        let revision = doc.revision();
        let mut drag = DragController::new();

        // No drag in progress
        let outcome = drag.drop_on(&mut doc, &view.bindings, pass, Some("zone:0")).unwrap();
        assert_eq!(outcome, DropOutcome::Discarded);

        // Outside any zone
        drag.start_palette("divider");
        let outcome = drag.drop_on(&mut doc, &view.bindings, pass, None).unwrap();
        assert_eq!(outcome, DropOutcome::Discarded);

        // Onto a non-zone target
        drag.start_palette("divider");
        let id = doc.blocks()[0].id.clone();
        let outcome = drag
            .drop_on(&mut doc, &view.bindings, pass, Some(&format!("block:{}", id)))
            .unwrap();
        assert_eq!(outcome, DropOutcome::Discarded);

        // Zone from a stale pass
        drag.start_palette("divider");
        let outcome = drag
            .drop_on(&mut doc, &view.bindings, stale.bindings.pass(), Some("zone:0"))
            .unwrap();
        assert_eq!(outcome, DropOutcome::Discarded);

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.revision(), revision);
    }

    #[test]
    fn test_end_clears_drag() {
        let mut drag = DragController::new();
        drag.start_palette("heading");
        assert_eq!(drag.active(), Some(&DragSource::Palette("heading".to_string())));
        drag.end();
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_start_block_rejects_zones() {
        let doc = Document::default();
        let view = CanvasRenderer::default().render(&doc);
        let mut drag = DragController::new();
        assert!(!drag.start_block(&view.bindings, view.bindings.pass(), "zone:0"));
        assert!(!drag.is_dragging());
    }
}
