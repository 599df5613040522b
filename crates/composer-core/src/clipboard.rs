//! Block clipboard.
//!
//! A session-scoped slot holding one block in its JSON wire form. The
//! session owns it and passes it explicitly to copy and paste, so two
//! sessions never share a clipboard by accident.

use composer_blocks::{Block, BlockId};

use crate::document::Document;
use crate::{CoreError, CoreResult};

/// Holds at most one serialized block.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a block.
    pub fn copy(&mut self, block: &Block) -> CoreResult<()> {
        self.slot = Some(block.to_json()?);
        Ok(())
    }

    /// Stores raw text, as pasted in from outside the composer.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.slot = Some(text.into());
    }

    pub fn text(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Parses the stored block.
    ///
    /// Malformed contents are logged and treated as an empty clipboard.
    pub fn read(&self) -> Option<Block> {
        let text = self.slot.as_deref()?;
        match Block::from_json(text) {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!("Discarding clipboard contents: {}", e);
                None
            }
        }
    }
}

impl Document {
    /// Copies the selected block into the clipboard.
    pub fn copy_block(&self, clipboard: &mut Clipboard) -> CoreResult<()> {
        let block = self.selected_block().ok_or(CoreError::NothingSelected)?;
        clipboard.copy(block)
    }

    /// Pastes the clipboard block after the selected block (or at the end)
    /// under a fresh id, and selects it.
    ///
    /// Returns `None` if the clipboard is empty or malformed.
    pub fn paste_block(&mut self, clipboard: &Clipboard) -> Option<BlockId> {
        let block = clipboard.read()?.duplicate();
        let index = self
            .selected()
            .and_then(|id| self.index_of(id))
            .map_or(self.len(), |i| i + 1);
        Some(self.insert_block(block, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_blocks::BlockKind;

    #[test]
    fn test_copy_requires_selection() {
        let mut doc = Document::default();
        doc.add_block("heading", 0).unwrap();
        doc.deselect_all();

        let mut clipboard = Clipboard::new();
        assert!(matches!(
            doc.copy_block(&mut clipboard),
            Err(CoreError::NothingSelected)
        ));
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_paste_after_selected() {
        let mut doc = Document::default();
        let first = doc.add_block("quote", 0).unwrap();
        doc.add_block("divider", 1).unwrap();

        let mut clipboard = Clipboard::new();
        doc.select_block(&first);
        doc.copy_block(&mut clipboard).unwrap();

        let pasted = doc.paste_block(&clipboard).unwrap();
        assert_ne!(pasted, first);
        assert_eq!(doc.index_of(&pasted), Some(1));
        assert_eq!(doc.selected(), Some(&pasted));
        assert_eq!(doc.blocks()[1].content, doc.blocks()[0].content);

        // Pasting twice yields distinct ids
        let again = doc.paste_block(&clipboard).unwrap();
        assert_ne!(again, pasted);
        assert_eq!(doc.index_of(&again), Some(2));
    }

    #[test]
    fn test_paste_without_selection_appends() {
        let mut doc = Document::default();
        doc.add_block("heading", 0).unwrap();
        let mut clipboard = Clipboard::new();
        doc.copy_block(&mut clipboard).unwrap();
        doc.add_block("image", 1).unwrap();
        doc.deselect_all();

        let pasted = doc.paste_block(&clipboard).unwrap();
        assert_eq!(doc.index_of(&pasted), Some(2));
        assert_eq!(doc.blocks()[2].kind(), BlockKind::Heading);
    }

    #[test]
    fn test_malformed_clipboard_is_ignored() {
        let mut doc = Document::default();
        let mut clipboard = Clipboard::new();

        assert!(doc.paste_block(&clipboard).is_none());

        clipboard.set_text("not a block");
        assert!(doc.paste_block(&clipboard).is_none());

        clipboard.set_text(r#"{"id":"x","type":"hologram","content":{}}"#);
        assert!(doc.paste_block(&clipboard).is_none());

        assert!(doc.is_empty());
        assert!(!doc.can_undo());
    }
}
