//! The composed document: an ordered block list plus editing state.
//!
//! ## Learning: Fallible Mutations
//!
//! Every mutation returns a `CoreResult`. An unknown type or a stale block
//! id comes back as an error the session can log and ignore, and it never
//! touches the block list or the history. Boundary moves are not errors at
//! all: they return `Ok(false)`.

use chrono::{DateTime, Utc};
use composer_blocks::{Block, BlockId, ContentValue, History, registry};

use crate::store::DocumentId;
use crate::{CoreError, CoreResult};

/// Default site header markup, editable in place.
pub const DEFAULT_HEADER: &str = r#"<div class="max-w-4xl mx-auto px-6 py-4 flex items-center justify-between"><span class="text-xl font-bold" contenteditable="true">My Site</span><nav class="flex gap-6 text-sm text-slate-600" contenteditable="true">Home · About · Contact</nav></div>"#;

/// Default site footer markup, editable in place.
pub const DEFAULT_FOOTER: &str = r#"<div class="max-w-4xl mx-auto px-6 py-6 text-center text-sm text-slate-500" contenteditable="true">© My Site. All rights reserved.</div>"#;

/// Direction for a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// An editable document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Blocks in display order
    pub(crate) blocks: Vec<Block>,
    /// Currently selected block
    pub(crate) selected: Option<BlockId>,
    /// Store identifier, set after the first save or on load
    pub(crate) id: Option<DocumentId>,
    pub(crate) title: String,
    /// Inner markup of the site header
    pub(crate) header: String,
    /// Inner markup of the site footer
    pub(crate) footer: String,
    pub(crate) created_at: Option<DateTime<Utc>>,
    /// Unsaved changes exist
    dirty: bool,
    /// Bumped on every change, used to detect edits during a save
    revision: u64,
    pub(crate) history: History,
}

impl Document {
    /// Creates an empty, untitled document.
    ///
    /// `history_limit` caps the undo stack; `None` keeps every snapshot.
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            blocks: Vec::new(),
            selected: None,
            id: None,
            title: "Untitled".to_string(),
            header: DEFAULT_HEADER.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
            created_at: None,
            dirty: false,
            revision: 0,
            history: History::new(history_limit),
        }
    }

    // ==================== Accessors ====================

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the block with the given id.
    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Returns the position of a block.
    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    /// Returns the selected block, if any.
    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.as_ref().and_then(|id| self.block(id))
    }

    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo(&self.blocks)
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Block Operations ====================

    /// Inserts a block of the given type at `index` (clamped to the end)
    /// and selects it.
    pub fn add_block(&mut self, type_key: &str, index: usize) -> CoreResult<BlockId> {
        let def = registry::lookup(type_key)
            .ok_or_else(|| CoreError::UnknownBlockType(type_key.to_string()))?;
        Ok(self.insert_block(Block::from_definition(def), index))
    }

    /// Inserts a prepared block at `index` (clamped to the end) and selects
    /// it.
    pub fn insert_block(&mut self, block: Block, index: usize) -> BlockId {
        self.history.save(&self.blocks);

        let index = index.min(self.blocks.len());
        let id = block.id.clone();
        self.blocks.insert(index, block);
        self.selected = Some(id.clone());
        self.touch();
        id
    }

    /// Removes a block, clearing the selection if it pointed at it.
    pub fn delete_block(&mut self, id: &BlockId) -> CoreResult<Block> {
        let index = self.require(id)?;
        self.history.save(&self.blocks);

        let removed = self.blocks.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.touch();
        Ok(removed)
    }

    /// Removes the selected block.
    pub fn delete_selected(&mut self) -> CoreResult<Block> {
        let id = self.selected.clone().ok_or(CoreError::NothingSelected)?;
        self.delete_block(&id)
    }

    /// Inserts a deep copy right after the original and selects it.
    pub fn duplicate_block(&mut self, id: &BlockId) -> CoreResult<BlockId> {
        let index = self.require(id)?;
        let copy = self.blocks[index].duplicate();
        Ok(self.insert_block(copy, index + 1))
    }

    /// Swaps a block with its neighbour.
    ///
    /// Returns `Ok(false)` at the list boundaries, without recording
    /// history.
    pub fn move_block(&mut self, id: &BlockId, direction: MoveDirection) -> CoreResult<bool> {
        let index = self.require(id)?;
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < self.blocks.len()),
        };
        let Some(target) = target else {
            return Ok(false);
        };

        self.history.save(&self.blocks);
        self.blocks.swap(index, target);
        self.touch();
        Ok(true)
    }

    /// Moves a block to a drop-zone index.
    ///
    /// Zone `i` sits before block `i`, zone `len` after the last block.
    /// Dropping a block on either zone adjacent to it changes nothing and
    /// returns `Ok(false)`.
    pub fn move_block_to(&mut self, id: &BlockId, zone: usize) -> CoreResult<bool> {
        let from = self.require(id)?;
        let zone = zone.min(self.blocks.len());
        let to = if zone > from { zone - 1 } else { zone };
        if to == from {
            return Ok(false);
        }

        self.history.save(&self.blocks);
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.touch();
        Ok(true)
    }

    /// Sets one content field of a block.
    ///
    /// Returns `Ok(false)` if the value is unchanged.
    pub fn update_block_content(
        &mut self,
        id: &BlockId,
        key: &str,
        value: impl Into<ContentValue>,
    ) -> CoreResult<bool> {
        let index = self.require(id)?;
        let updated = self.blocks[index].content.with_field(key, value.into())?;
        if updated == self.blocks[index].content {
            return Ok(false);
        }

        self.history.save(&self.blocks);
        self.blocks[index].content = updated;
        self.touch();
        Ok(true)
    }

    // ==================== Selection ====================

    /// Selects a block. Unknown ids leave the selection untouched.
    pub fn select_block(&mut self, id: &BlockId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn deselect_all(&mut self) {
        self.selected = None;
    }

    // ==================== History ====================

    /// Restores the previous state. Returns false if there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.blocks) {
            Some(blocks) => {
                self.restore(blocks);
                true
            }
            None => false,
        }
    }

    /// Restores the next state. Returns false if there is none.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(blocks) => {
                self.restore(blocks);
                true
            }
            None => false,
        }
    }

    // ==================== Page Fields ====================

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title != self.title {
            self.title = title;
            self.touch();
        }
    }

    pub fn set_header(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        if markup != self.header {
            self.header = markup;
            self.touch();
        }
    }

    pub fn set_footer(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        if markup != self.footer {
            self.footer = markup;
            self.touch();
        }
    }

    // ==================== Save State ====================

    /// Records a finished save of the state at `revision`.
    ///
    /// The dirty flag is only cleared if nothing changed since.
    pub fn mark_saved(&mut self, id: DocumentId, revision: u64) {
        self.id = Some(id);
        if revision == self.revision {
            self.dirty = false;
        }
    }

    /// Marks the document clean without touching history.
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    fn restore(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        if let Some(selected) = &self.selected {
            if self.index_of(selected).is_none() {
                self.selected = None;
            }
        }
        self.touch();
    }

    fn require(&self, id: &BlockId) -> CoreResult<usize> {
        self.index_of(id)
            .ok_or_else(|| CoreError::BlockNotFound(id.clone()))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_blocks::{BlockContent, BlockKind, HeadingContent, HeadingLevel};

    fn kinds(doc: &Document) -> Vec<BlockKind> {
        doc.blocks().iter().map(Block::kind).collect()
    }

    #[test]
    fn test_add_heading_at_start() {
        let mut doc = Document::default();
        let id = doc.add_block("heading", 0).unwrap();

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.blocks()[0].id, id);
        assert_eq!(
            doc.blocks()[0].content,
            BlockContent::Heading(HeadingContent {
                text: "Heading".to_string(),
                level: HeadingLevel::H2,
            })
        );
        assert_eq!(doc.selected(), Some(&id));
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_add_index_is_clamped() {
        let mut doc = Document::default();
        doc.add_block("heading", 0).unwrap();
        doc.add_block("divider", 99).unwrap();
        assert_eq!(kinds(&doc), vec![BlockKind::Heading, BlockKind::Divider]);
    }

    #[test]
    fn test_unknown_type_is_no_op() {
        let mut doc = Document::default();
        let err = doc.add_block("bogus", 0).unwrap_err();

        assert!(matches!(err, CoreError::UnknownBlockType(_)));
        assert!(doc.is_empty());
        assert_eq!(doc.history.len(), 1);
        assert!(!doc.can_undo());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut doc = Document::default();
        let keep = doc.add_block("paragraph", 0).unwrap();
        let gone = doc.add_block("image", 1).unwrap();

        doc.delete_block(&gone).unwrap();
        assert_eq!(doc.selected(), None);
        assert_eq!(doc.len(), 1);

        doc.select_block(&keep);
        assert!(doc.delete_selected().is_ok());
        assert!(doc.is_empty());
        assert!(matches!(doc.delete_selected(), Err(CoreError::NothingSelected)));
    }

    #[test]
    fn test_delete_unknown_is_no_op() {
        let mut doc = Document::default();
        doc.add_block("paragraph", 0).unwrap();
        let snapshots = doc.history.len();

        let err = doc.delete_block(&BlockId::from("missing")).unwrap_err();
        assert!(matches!(err, CoreError::BlockNotFound(_)));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.history.len(), snapshots);
    }

    #[test]
    fn test_duplicate_inserts_after_original() {
        let mut doc = Document::default();
        let first = doc.add_block("quote", 0).unwrap();
        doc.add_block("divider", 1).unwrap();

        let copy = doc.duplicate_block(&first).unwrap();
        assert_ne!(copy, first);
        assert_eq!(doc.index_of(&copy), Some(1));
        assert_eq!(doc.blocks()[0].content, doc.blocks()[1].content);
        assert_eq!(doc.selected(), Some(&copy));

        doc.update_block_content(&copy, "text", "Changed").unwrap();
        assert_ne!(doc.blocks()[0].content, doc.blocks()[1].content);
    }

    #[test]
    fn test_move_at_boundary_is_no_op() {
        let mut doc = Document::default();
        let a = doc.add_block("heading", 0).unwrap();
        let b = doc.add_block("paragraph", 1).unwrap();
        let snapshots = doc.history.len();
        let revision = doc.revision();

        assert!(!doc.move_block(&a, MoveDirection::Up).unwrap());
        assert!(!doc.move_block(&b, MoveDirection::Down).unwrap());
        assert_eq!(doc.history.len(), snapshots);
        assert_eq!(doc.revision(), revision);

        assert!(doc.move_block(&a, MoveDirection::Down).unwrap());
        assert_eq!(kinds(&doc), vec![BlockKind::Paragraph, BlockKind::Heading]);
    }

    #[test]
    fn test_move_to_zone() {
        let mut doc = Document::default();
        let a = doc.add_block("heading", 0).unwrap();
        doc.add_block("paragraph", 1).unwrap();
        doc.add_block("image", 2).unwrap();

        // Zones 0 and 1 surround `a`
        assert!(!doc.move_block_to(&a, 0).unwrap());
        assert!(!doc.move_block_to(&a, 1).unwrap());

        assert!(doc.move_block_to(&a, 3).unwrap());
        assert_eq!(
            kinds(&doc),
            vec![BlockKind::Paragraph, BlockKind::Image, BlockKind::Heading]
        );

        assert!(doc.move_block_to(&a, 0).unwrap());
        assert_eq!(
            kinds(&doc),
            vec![BlockKind::Heading, BlockKind::Paragraph, BlockKind::Image]
        );
    }

    #[test]
    fn test_move_to_records_one_entry() {
        let mut doc = Document::default();
        let a = doc.add_block("heading", 0).unwrap();
        doc.add_block("paragraph", 1).unwrap();
        doc.add_block("image", 2).unwrap();
        let before = doc.blocks().to_vec();

        doc.move_block_to(&a, 3).unwrap();
        assert!(doc.undo());
        assert_eq!(doc.blocks(), before.as_slice());
    }

    #[test]
    fn test_update_content() {
        let mut doc = Document::default();
        let id = doc.add_block("heading", 0).unwrap();

        assert!(doc.update_block_content(&id, "text", "Welcome").unwrap());
        assert!(!doc.update_block_content(&id, "text", "Welcome").unwrap());
        assert!(doc.update_block_content(&id, "nope", "x").is_err());
        assert!(doc.update_block_content(&id, "level", "h9").is_err());

        assert!(doc.undo());
        assert_eq!(
            doc.blocks()[0].content,
            BlockContent::default_for(BlockKind::Heading)
        );
    }

    #[test]
    fn test_select_unknown_is_ignored() {
        let mut doc = Document::default();
        let id = doc.add_block("paragraph", 0).unwrap();
        assert!(!doc.select_block(&BlockId::from("ghost")));
        assert_eq!(doc.selected(), Some(&id));

        doc.deselect_all();
        assert_eq!(doc.selected(), None);
    }

    #[test]
    fn test_paragraph_image_move_scenario() {
        let mut doc = Document::default();
        let p = doc.add_block("paragraph", 0).unwrap();
        let i = doc.add_block("image", 1).unwrap();
        doc.move_block(&i, MoveDirection::Up).unwrap();
        assert_eq!(kinds(&doc), vec![BlockKind::Image, BlockKind::Paragraph]);

        assert!(doc.undo());
        assert_eq!(kinds(&doc), vec![BlockKind::Paragraph, BlockKind::Image]);
        assert!(doc.undo());
        assert_eq!(kinds(&doc), vec![BlockKind::Paragraph]);
        assert_eq!(doc.blocks()[0].id, p);
        assert!(doc.undo());
        assert!(doc.is_empty());
        assert!(!doc.undo());

        assert!(doc.redo());
        assert!(doc.redo());
        assert!(doc.redo());
        assert_eq!(kinds(&doc), vec![BlockKind::Image, BlockKind::Paragraph]);
        assert!(!doc.redo());
    }

    #[test]
    fn test_undo_drops_dangling_selection() {
        let mut doc = Document::default();
        doc.add_block("paragraph", 0).unwrap();
        assert!(doc.selected().is_some());

        doc.undo();
        assert_eq!(doc.selected(), None);
    }

    #[test]
    fn test_mark_saved_respects_later_edits() {
        let mut doc = Document::default();
        doc.add_block("paragraph", 0).unwrap();
        let revision = doc.revision();

        doc.set_title("Landing page");
        doc.mark_saved(DocumentId::from("doc-1"), revision);
        assert!(doc.is_dirty());
        assert_eq!(doc.id(), Some(&DocumentId::from("doc-1")));

        doc.mark_saved(DocumentId::from("doc-1"), doc.revision());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_page_fields_mark_dirty() {
        let mut doc = Document::default();
        doc.set_title("Untitled");
        assert!(!doc.is_dirty());

        doc.set_footer("<p>bye</p>");
        assert!(doc.is_dirty());
        assert_eq!(doc.footer(), "<p>bye</p>");
        assert!(!doc.can_undo());
    }
}
