//! Block instances.
//!
//! ## Learning: Newtypes for Identifiers
//!
//! `BlockId` wraps a `String` so a block id can't be confused with a
//! document id, a type key or any other string flowing through the
//! composer.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::registry::{self, BlockKind, BlockTypeDefinition};
use crate::{BlockContent, BlockError, BlockResult, RenderMode};

/// Unique identifier for a block.
///
/// Generated ids look like `block_1718200000000_3f9a1c2be`: creation time in
/// milliseconds plus a random suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Generates a fresh, collision-resistant id.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("block_{}_{}", millis, &suffix[..9]))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form style overrides attached to a block.
///
/// Values are kept as JSON so stored numbers and flags survive a round trip.
pub type Styles = BTreeMap<String, Value>;

/// One content unit in a composed document.
///
/// Serialized as `{ "id", "type", "content", "styles" }`, the same shape the
/// document store and the clipboard hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireBlock", into = "WireBlock")]
pub struct Block {
    /// Unique identifier, never reused
    pub id: BlockId,
    /// Typed content
    pub content: BlockContent,
    /// Style overrides
    pub styles: Styles,
}

impl Block {
    /// Creates a block with a fresh id.
    pub fn new(content: BlockContent) -> Self {
        Self {
            id: BlockId::generate(),
            content,
            styles: Styles::new(),
        }
    }

    /// Creates a block carrying a definition's default content.
    pub fn from_definition(def: &BlockTypeDefinition) -> Self {
        Self::new(def.default_content())
    }

    /// Returns the block kind.
    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    /// Returns the catalog definition of this block.
    pub fn definition(&self) -> &'static BlockTypeDefinition {
        registry::definition(self.kind())
    }

    /// Returns a deep copy of this block under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: BlockId::generate(),
            content: self.content.clone(),
            styles: self.styles.clone(),
        }
    }

    /// Renders the block through its catalog definition.
    pub fn render(&self, children: Option<&str>, mode: RenderMode) -> String {
        self.definition().render(self, children, mode)
    }

    /// Serializes the block to a JSON string (clipboard format).
    pub fn to_json(&self) -> BlockResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a block from a JSON string (clipboard format).
    pub fn from_json(json: &str) -> BlockResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The untyped wire shape of a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    styles: Styles,
}

/// Reads `"styles": null` as no styles.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Styles, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Styles>::deserialize(deserializer)?.unwrap_or_default())
}

impl TryFrom<WireBlock> for Block {
    type Error = BlockError;

    fn try_from(wire: WireBlock) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id,
            content: BlockContent::from_parts(&wire.kind, wire.content)?,
            styles: wire.styles,
        })
    }
}

impl From<Block> for WireBlock {
    fn from(block: Block) -> Self {
        Self {
            kind: block.kind().key().to_string(),
            content: Value::Object(block.content.fields()),
            id: block.id,
            styles: block.styles,
        }
    }
}
