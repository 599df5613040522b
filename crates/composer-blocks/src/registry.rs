//! The static block catalog.
//!
//! ## Learning: `'static` Data
//!
//! The catalog is a `static` array, so every [`BlockTypeDefinition`] lives
//! for the whole program and can be handed out as `&'static` references.
//! Nothing in the catalog is ever mutated at runtime.

use serde::{Deserialize, Serialize};

use crate::{Block, BlockContent, RenderMode};

/// The kind of a block, one variant per catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
    Image,
    Button,
    Divider,
    Spacer,
    Quote,
    Callout,
    Video,
    List,
    Section,
    Columns,
    Collapsible,
    Toc,
    Placeholder,
    Carousel,
    Youtube,
    Social,
    Map,
    Calendar,
    Docs,
    Slides,
    Sheets,
    Forms,
    Charts,
    Code,
}

impl BlockKind {
    /// Returns the catalog key (`"heading"`, `"youtube"`, ...).
    pub fn key(self) -> &'static str {
        definition(self).key
    }

    /// Parses a catalog key.
    pub fn from_key(key: &str) -> Option<Self> {
        lookup(key).map(|def| def.kind)
    }

    /// Returns the catalog definition of this kind.
    pub fn definition(self) -> &'static BlockTypeDefinition {
        definition(self)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Immutable template for one kind of block.
#[derive(Debug)]
pub struct BlockTypeDefinition {
    /// Which content variant this definition builds
    pub kind: BlockKind,
    /// Catalog key, also the `type` field of a serialized block
    pub key: &'static str,
    /// Material symbol shown in the palette
    pub icon: &'static str,
    /// Human label shown in the palette and property panel
    pub label: &'static str,
    /// Whether the renderer embeds nested children markup
    pub is_container: bool,
}

impl BlockTypeDefinition {
    /// Returns a fresh copy of this kind's default content.
    ///
    /// Every call builds a new value, so callers never share state with
    /// the catalog or with each other.
    pub fn default_content(&self) -> BlockContent {
        BlockContent::default_for(self.kind)
    }

    /// Renders a block of this kind.
    ///
    /// `children` is only used by container kinds; everything else ignores it.
    pub fn render(&self, block: &Block, children: Option<&str>, mode: RenderMode) -> String {
        let children = if self.is_container { children } else { None };
        block.content.render(&block.id, children, mode)
    }
}

const fn entry(
    kind: BlockKind,
    key: &'static str,
    icon: &'static str,
    label: &'static str,
) -> BlockTypeDefinition {
    BlockTypeDefinition {
        kind,
        key,
        icon,
        label,
        is_container: false,
    }
}

const fn container(
    kind: BlockKind,
    key: &'static str,
    icon: &'static str,
    label: &'static str,
) -> BlockTypeDefinition {
    BlockTypeDefinition {
        kind,
        key,
        icon,
        label,
        is_container: true,
    }
}

/// The catalog, in palette order. Indexed by `BlockKind as usize`.
static CATALOG: [BlockTypeDefinition; 26] = [
    entry(BlockKind::Heading, "heading", "title", "Heading"),
    entry(BlockKind::Paragraph, "paragraph", "notes", "Text"),
    entry(BlockKind::Image, "image", "image", "Image"),
    entry(BlockKind::Button, "button", "smart_button", "Button"),
    entry(BlockKind::Divider, "divider", "horizontal_rule", "Divider"),
    entry(BlockKind::Spacer, "spacer", "height", "Spacer"),
    entry(BlockKind::Quote, "quote", "format_quote", "Quote"),
    entry(BlockKind::Callout, "callout", "campaign", "Callout"),
    entry(BlockKind::Video, "video", "videocam", "Video"),
    entry(BlockKind::List, "list", "format_list_bulleted", "List"),
    container(BlockKind::Section, "section", "view_agenda", "Section"),
    container(BlockKind::Columns, "columns", "view_column", "Columns"),
    entry(BlockKind::Collapsible, "collapsible", "unfold_more", "Collapsible"),
    entry(BlockKind::Toc, "toc", "toc", "Table of Contents"),
    entry(BlockKind::Placeholder, "placeholder", "add_box", "Placeholder"),
    entry(BlockKind::Carousel, "carousel", "view_carousel", "Carousel"),
    entry(BlockKind::Youtube, "youtube", "smart_display", "YouTube"),
    entry(BlockKind::Social, "social", "groups", "Social Links"),
    entry(BlockKind::Map, "map", "location_on", "Map"),
    entry(BlockKind::Calendar, "calendar", "calendar_month", "Calendar"),
    entry(BlockKind::Docs, "docs", "description", "Google Docs"),
    entry(BlockKind::Slides, "slides", "slideshow", "Google Slides"),
    entry(BlockKind::Sheets, "sheets", "table_chart", "Google Sheets"),
    entry(BlockKind::Forms, "forms", "assignment", "Google Forms"),
    entry(BlockKind::Charts, "charts", "bar_chart", "Charts"),
    entry(BlockKind::Code, "code", "code", "Code"),
];

/// Looks up a definition by catalog key.
///
/// Returns `None` for unknown keys; callers treat that as a no-op.
pub fn lookup(key: &str) -> Option<&'static BlockTypeDefinition> {
    CATALOG.iter().find(|def| def.key == key)
}

/// Returns the definition of a kind.
pub fn definition(kind: BlockKind) -> &'static BlockTypeDefinition {
    &CATALOG[kind as usize]
}

/// Returns every definition in palette order.
pub fn all() -> &'static [BlockTypeDefinition] {
    &CATALOG
}
