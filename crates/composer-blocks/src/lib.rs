//! # Composer Blocks
//!
//! The leaf crate of the composer: the block catalog, typed block content,
//! pure HTML renderers and the snapshot history used for undo/redo.
//!
//! ## Key Concepts
//!
//! ### Typed content
//! - Every block kind carries its own content struct inside [`BlockContent`]
//! - Field access is checked by the type system instead of string keys
//! - The JSON wire form stays `{ id, type, content, styles }`
//!
//! ### Pure rendering
//! - [`BlockContent::render`] depends only on the block it is given
//! - Rendering the same block twice yields byte-identical markup
//!
//! ### Snapshot history
//! - [`History`] stores full deep copies of the block list
//! - No diffing: simplicity over memory efficiency

mod block;
mod content;
mod fields;
mod history;
pub mod registry;
mod render;

pub use block::{Block, BlockId, Styles};
pub use content::{
    BlockContent, ButtonContent, CalloutContent, CalloutKind, CarouselContent, CodeContent,
    CollapsibleContent, ColumnsContent, ContentValue, DividerContent, EmbedContent,
    HeadingContent, HeadingLevel, ImageContent, ListContent, MapContent, PlaceholderContent,
    QuoteContent, SectionContent, SocialContent, SpacerContent, TextContent, TocContent,
    VideoContent, YoutubeContent,
};
pub use fields::{FieldKind, PropertyField, property_fields};
pub use history::History;
pub use registry::{BlockKind, BlockTypeDefinition};
pub use render::{RenderMode, escape_html, strip_editable};

/// Result type for block operations
pub type BlockResult<T> = Result<T, BlockError>;

/// Errors that can occur while building, editing or decoding blocks
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("Unknown block type: {0}")]
    UnknownType(String),

    #[error("Block type {kind} has no field named {field}")]
    UnknownField { kind: &'static str, field: String },

    #[error("Invalid value for {kind}.{field}: {reason}")]
    InvalidValue {
        kind: &'static str,
        field: String,
        reason: String,
    },

    #[error("Malformed block JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_from_registry_defaults() {
        let def = registry::lookup("heading").unwrap();
        let block = Block::from_definition(def);
        assert_eq!(block.kind(), BlockKind::Heading);
        assert_eq!(block.content, def.default_content());
        assert!(block.styles.is_empty());
    }

    #[test]
    fn test_unknown_type_lookup() {
        assert!(registry::lookup("bogus").is_none());
        assert!(matches!(
            BlockContent::from_parts("bogus", serde_json::json!({})),
            Err(BlockError::UnknownType(_))
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        let block = Block::new(BlockContent::default_for(BlockKind::Quote));
        let first = block.render(None, RenderMode::Edit);
        let second = block.render(None, RenderMode::Edit);
        assert_eq!(first, second);
    }

    #[test]
    fn test_history_round_trip() {
        let mut history = History::new(Some(10));
        let block = Block::new(BlockContent::default_for(BlockKind::Paragraph));

        history.save(&[]);
        let live = vec![block];

        assert_eq!(history.undo(&live), Some(Vec::new()));
        assert_eq!(history.redo(), Some(live));
    }
}
