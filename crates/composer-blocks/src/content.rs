//! Typed block content.
//!
//! ## Learning: Tagged Unions with Serde
//!
//! `BlockContent` is an *adjacently tagged* enum: serde writes it as
//! `{"type": "heading", "content": {...}}`. Each variant owns a plain struct,
//! so code that edits a heading works with `HeadingContent` fields instead
//! of looking up strings in a map.
//!
//! `#[serde(default)]` on every struct means a stored block that is missing
//! a field gets the catalog default for that field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::BlockKind;
use crate::{BlockError, BlockResult};

/// Heading levels `h1` to `h6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    #[default]
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Returns the HTML tag name.
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }
    }
}

/// Callout flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

impl CalloutKind {
    /// Tailwind color family used by the renderer.
    pub fn color(self) -> &'static str {
        match self {
            CalloutKind::Info => "blue",
            CalloutKind::Warning => "amber",
            CalloutKind::Success => "emerald",
            CalloutKind::Error => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadingContent {
    pub text: String,
    pub level: HeadingLevel,
}

impl Default for HeadingContent {
    fn default() -> Self {
        Self {
            text: "Heading".to_string(),
            level: HeadingLevel::H2,
        }
    }
}

/// Paragraph ("Text") content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextContent {
    pub text: String,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: "Start typing your text here...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
    pub caption: String,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: "Image".to_string(),
            caption: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonContent {
    pub text: String,
    pub url: String,
    pub style: String,
}

impl Default for ButtonContent {
    fn default() -> Self {
        Self {
            text: "Click Me".to_string(),
            url: "#".to_string(),
            style: "primary".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DividerContent {
    pub style: String,
}

impl Default for DividerContent {
    fn default() -> Self {
        Self {
            style: "solid".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacerContent {
    /// Height in pixels
    pub height: u32,
}

impl Default for SpacerContent {
    fn default() -> Self {
        Self { height: 40 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteContent {
    pub text: String,
    pub author: String,
}

impl Default for QuoteContent {
    fn default() -> Self {
        Self {
            text: "Your quote here...".to_string(),
            author: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalloutContent {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: CalloutKind,
}

impl Default for CalloutContent {
    fn default() -> Self {
        Self {
            text: "Important information here...".to_string(),
            kind: CalloutKind::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoContent {
    /// Embed URL; empty until the user picks a video
    pub url: String,
    #[serde(rename = "type")]
    pub provider: String,
}

impl Default for VideoContent {
    fn default() -> Self {
        Self {
            url: String::new(),
            provider: "youtube".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListContent {
    pub items: Vec<String>,
    pub ordered: bool,
}

impl Default for ListContent {
    fn default() -> Self {
        Self {
            items: vec![
                "Item 1".to_string(),
                "Item 2".to_string(),
                "Item 3".to_string(),
            ],
            ordered: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionContent {
    pub background: String,
    pub padding: String,
}

impl Default for SectionContent {
    fn default() -> Self {
        Self {
            background: "transparent".to_string(),
            padding: "md".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnsContent {
    pub count: u8,
    pub gap: String,
}

impl Default for ColumnsContent {
    fn default() -> Self {
        Self {
            count: 2,
            gap: "md".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollapsibleContent {
    pub title: String,
    pub content: String,
    pub open: bool,
}

impl Default for CollapsibleContent {
    fn default() -> Self {
        Self {
            title: "Click to expand".to_string(),
            content: "Hidden content goes here...".to_string(),
            open: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TocContent {
    pub title: String,
}

impl Default for TocContent {
    fn default() -> Self {
        Self {
            title: "Contents".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceholderContent {
    pub text: String,
}

impl Default for PlaceholderContent {
    fn default() -> Self {
        Self {
            text: "Placeholder content".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselContent {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YoutubeContent {
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialContent {
    pub links: BTreeMap<String, String>,
}

impl Default for SocialContent {
    fn default() -> Self {
        let links = ["facebook", "twitter", "linkedin", "instagram"]
            .into_iter()
            .map(|network| (network.to_string(), String::new()))
            .collect();
        Self { links }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapContent {
    pub embed_url: String,
    pub address: String,
}

impl Default for MapContent {
    fn default() -> Self {
        Self {
            embed_url: String::new(),
            address: "Your location".to_string(),
        }
    }
}

/// Content shared by the calendar, docs, slides, sheets, forms and charts
/// embeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbedContent {
    pub embed_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeContent {
    pub code: String,
    pub language: String,
}

impl Default for CodeContent {
    fn default() -> Self {
        Self {
            code: "// Your code here".to_string(),
            language: "javascript".to_string(),
        }
    }
}

/// The content of a block, one variant per catalog kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum BlockContent {
    Heading(HeadingContent),
    Paragraph(TextContent),
    Image(ImageContent),
    Button(ButtonContent),
    Divider(DividerContent),
    Spacer(SpacerContent),
    Quote(QuoteContent),
    Callout(CalloutContent),
    Video(VideoContent),
    List(ListContent),
    Section(SectionContent),
    Columns(ColumnsContent),
    Collapsible(CollapsibleContent),
    Toc(TocContent),
    Placeholder(PlaceholderContent),
    Carousel(CarouselContent),
    Youtube(YoutubeContent),
    Social(SocialContent),
    Map(MapContent),
    Calendar(EmbedContent),
    Docs(EmbedContent),
    Slides(EmbedContent),
    Sheets(EmbedContent),
    Forms(EmbedContent),
    Charts(EmbedContent),
    Code(CodeContent),
}

impl BlockContent {
    /// Builds the catalog default content for a kind.
    pub fn default_for(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Heading => Self::Heading(Default::default()),
            BlockKind::Paragraph => Self::Paragraph(Default::default()),
            BlockKind::Image => Self::Image(Default::default()),
            BlockKind::Button => Self::Button(Default::default()),
            BlockKind::Divider => Self::Divider(Default::default()),
            BlockKind::Spacer => Self::Spacer(Default::default()),
            BlockKind::Quote => Self::Quote(Default::default()),
            BlockKind::Callout => Self::Callout(Default::default()),
            BlockKind::Video => Self::Video(Default::default()),
            BlockKind::List => Self::List(Default::default()),
            BlockKind::Section => Self::Section(Default::default()),
            BlockKind::Columns => Self::Columns(Default::default()),
            BlockKind::Collapsible => Self::Collapsible(Default::default()),
            BlockKind::Toc => Self::Toc(Default::default()),
            BlockKind::Placeholder => Self::Placeholder(Default::default()),
            BlockKind::Carousel => Self::Carousel(Default::default()),
            BlockKind::Youtube => Self::Youtube(Default::default()),
            BlockKind::Social => Self::Social(Default::default()),
            BlockKind::Map => Self::Map(Default::default()),
            BlockKind::Calendar => Self::Calendar(Default::default()),
            BlockKind::Docs => Self::Docs(Default::default()),
            BlockKind::Slides => Self::Slides(Default::default()),
            BlockKind::Sheets => Self::Sheets(Default::default()),
            BlockKind::Forms => Self::Forms(Default::default()),
            BlockKind::Charts => Self::Charts(Default::default()),
            BlockKind::Code => Self::Code(Default::default()),
        }
    }

    /// Returns the kind of this content.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Heading(_) => BlockKind::Heading,
            Self::Paragraph(_) => BlockKind::Paragraph,
            Self::Image(_) => BlockKind::Image,
            Self::Button(_) => BlockKind::Button,
            Self::Divider(_) => BlockKind::Divider,
            Self::Spacer(_) => BlockKind::Spacer,
            Self::Quote(_) => BlockKind::Quote,
            Self::Callout(_) => BlockKind::Callout,
            Self::Video(_) => BlockKind::Video,
            Self::List(_) => BlockKind::List,
            Self::Section(_) => BlockKind::Section,
            Self::Columns(_) => BlockKind::Columns,
            Self::Collapsible(_) => BlockKind::Collapsible,
            Self::Toc(_) => BlockKind::Toc,
            Self::Placeholder(_) => BlockKind::Placeholder,
            Self::Carousel(_) => BlockKind::Carousel,
            Self::Youtube(_) => BlockKind::Youtube,
            Self::Social(_) => BlockKind::Social,
            Self::Map(_) => BlockKind::Map,
            Self::Calendar(_) => BlockKind::Calendar,
            Self::Docs(_) => BlockKind::Docs,
            Self::Slides(_) => BlockKind::Slides,
            Self::Sheets(_) => BlockKind::Sheets,
            Self::Forms(_) => BlockKind::Forms,
            Self::Charts(_) => BlockKind::Charts,
            Self::Code(_) => BlockKind::Code,
        }
    }

    /// Decodes content from its catalog key and the JSON object of its
    /// fields.
    pub fn from_parts(key: &str, fields: Value) -> BlockResult<Self> {
        if BlockKind::from_key(key).is_none() {
            return Err(BlockError::UnknownType(key.to_string()));
        }

        // Explicit nulls read as missing, so the field takes its default
        let fields = match fields {
            Value::Object(mut map) => {
                map.retain(|_, value| !value.is_null());
                Value::Object(map)
            }
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let mut tagged = Map::new();
        tagged.insert("type".to_string(), Value::String(key.to_string()));
        tagged.insert("content".to_string(), fields);
        Ok(serde_json::from_value(Value::Object(tagged))?)
    }

    /// Returns the JSON object of this content's fields (without the tag).
    pub fn fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut tagged)) => match tagged.remove("content") {
                Some(Value::Object(fields)) => fields,
                _ => Map::new(),
            },
            _ => Map::new(),
        }
    }

    /// Returns a copy of this content with one field replaced.
    ///
    /// The key must name an existing field of this kind, and the value must
    /// fit that field's type.
    pub fn with_field(&self, key: &str, value: ContentValue) -> BlockResult<Self> {
        let kind = self.kind();
        let mut fields = self.fields();

        let slot = fields.get_mut(key).ok_or_else(|| BlockError::UnknownField {
            kind: kind.key(),
            field: key.to_string(),
        })?;
        *slot = value.into_json();

        Self::from_parts(kind.key(), Value::Object(fields)).map_err(|e| BlockError::InvalidValue {
            kind: kind.key(),
            field: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// A value written into a content field by the property panel or a picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Bool(bool),
    Number(i64),
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl ContentValue {
    /// Converts the value to JSON for schema checking.
    pub fn into_json(self) -> Value {
        match self {
            ContentValue::Bool(b) => Value::Bool(b),
            ContentValue::Number(n) => Value::from(n),
            ContentValue::Text(s) => Value::String(s),
            ContentValue::List(items) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
            ContentValue::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::Text(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::Text(s)
    }
}

impl From<i64> for ContentValue {
    fn from(n: i64) -> Self {
        ContentValue::Number(n)
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Bool(b)
    }
}

impl From<Vec<String>> for ContentValue {
    fn from(items: Vec<String>) -> Self {
        ContentValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn test_every_kind_has_matching_default() {
        for def in registry::all() {
            let content = def.default_content();
            assert_eq!(content.kind(), def.kind);
        }
    }

    #[test]
    fn test_fields_use_wire_names() {
        let fields = BlockContent::default_for(BlockKind::Callout).fields();
        assert_eq!(fields.get("type"), Some(&Value::from("info")));

        let fields = BlockContent::default_for(BlockKind::Map).fields();
        assert!(fields.contains_key("embedUrl"));
        assert_eq!(fields.get("address"), Some(&Value::from("Your location")));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let content =
            BlockContent::from_parts("heading", serde_json::json!({ "text": "Hi" })).unwrap();
        assert_eq!(
            content,
            BlockContent::Heading(HeadingContent {
                text: "Hi".to_string(),
                level: HeadingLevel::H2,
            })
        );

        let content = BlockContent::from_parts("spacer", Value::Null).unwrap();
        assert_eq!(content, BlockContent::Spacer(SpacerContent { height: 40 }));
    }

    #[test]
    fn test_with_field_updates_text() {
        let content = BlockContent::default_for(BlockKind::Paragraph);
        let updated = content.with_field("text", "Hello".into()).unwrap();
        assert_eq!(
            updated,
            BlockContent::Paragraph(TextContent {
                text: "Hello".to_string()
            })
        );
        // The original is untouched
        assert_eq!(content, BlockContent::default_for(BlockKind::Paragraph));
    }

    #[test]
    fn test_with_field_checks_schema() {
        let spacer = BlockContent::default_for(BlockKind::Spacer);
        assert!(matches!(
            spacer.with_field("height", "tall".into()),
            Err(BlockError::InvalidValue { .. })
        ));
        assert!(matches!(
            spacer.with_field("width", ContentValue::Number(3)),
            Err(BlockError::UnknownField { .. })
        ));

        let heading = BlockContent::default_for(BlockKind::Heading);
        assert!(heading.with_field("level", "h7".into()).is_err());
        let h3 = heading.with_field("level", "h3".into()).unwrap();
        assert!(matches!(
            h3,
            BlockContent::Heading(HeadingContent {
                level: HeadingLevel::H3,
                ..
            })
        ));
    }

    #[test]
    fn test_with_field_list_and_number() {
        let carousel = BlockContent::default_for(BlockKind::Carousel);
        let updated = carousel
            .with_field("images", vec!["a.png".to_string(), "b.png".to_string()].into())
            .unwrap();
        assert_eq!(
            updated,
            BlockContent::Carousel(CarouselContent {
                images: vec!["a.png".to_string(), "b.png".to_string()],
            })
        );

        let spacer = BlockContent::default_for(BlockKind::Spacer);
        let updated = spacer.with_field("height", ContentValue::Number(80)).unwrap();
        assert_eq!(updated, BlockContent::Spacer(SpacerContent { height: 80 }));
    }

    #[test]
    fn test_content_value_untagged() {
        let value: ContentValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, ContentValue::Number(42));
        let value: ContentValue = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(value, ContentValue::Text("hi".to_string()));
        let value: ContentValue = serde_json::from_str("[\"a\"]").unwrap();
        assert_eq!(value, ContentValue::List(vec!["a".to_string()]));
    }
}
