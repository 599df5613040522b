//! Media pickers.
//!
//! Placeholders for empty media blocks carry a `data-action` hook
//! (`edit-image`, `edit-embed-map`, ...). The host asks the user for a URL
//! and hands the raw answer to [`MediaPicker::apply`], which normalizes it
//! and writes the right content field.

use composer_blocks::{BlockId, BlockKind, ContentValue};
use url::Url;

use crate::CoreResult;
use crate::document::Document;

/// A picker opened from a placeholder hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaPicker {
    Image,
    Video,
    Youtube,
    Carousel,
    /// Embed URL of a map or Google Workspace block
    Embed(BlockKind),
}

impl MediaPicker {
    /// Parses a `data-action` hook.
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "edit-image" => Some(MediaPicker::Image),
            "edit-video" => Some(MediaPicker::Video),
            "edit-youtube" => Some(MediaPicker::Youtube),
            "edit-carousel" => Some(MediaPicker::Carousel),
            _ => {
                let kind = BlockKind::from_key(action.strip_prefix("edit-embed-")?)?;
                is_embed(kind).then_some(MediaPicker::Embed(kind))
            }
        }
    }

    /// Question shown to the user.
    pub fn prompt(self) -> &'static str {
        match self {
            MediaPicker::Image => "Enter image URL:",
            MediaPicker::Video => "Enter video embed URL (YouTube/Vimeo):",
            MediaPicker::Youtube => "Enter YouTube URL or video ID:",
            MediaPicker::Carousel => "Enter image URLs (comma-separated):",
            MediaPicker::Embed(kind) => embed_prompt(kind),
        }
    }

    /// Content field the answer is written to.
    pub fn field(self) -> &'static str {
        match self {
            MediaPicker::Image => "src",
            MediaPicker::Video => "url",
            MediaPicker::Youtube => "videoId",
            MediaPicker::Carousel => "images",
            MediaPicker::Embed(_) => "embedUrl",
        }
    }

    /// Normalizes the user's answer into a field value.
    pub fn value(self, input: &str) -> ContentValue {
        let input = input.trim();
        match self {
            MediaPicker::Image | MediaPicker::Embed(_) => input.into(),
            MediaPicker::Video => video_embed_url(input).into(),
            MediaPicker::Youtube => youtube_video_id(input).into(),
            MediaPicker::Carousel => carousel_images(input).into(),
        }
    }

    /// Writes the answer into a block.
    ///
    /// A blank answer means the user cancelled: nothing changes and
    /// `Ok(false)` is returned.
    pub fn apply(self, doc: &mut Document, id: &BlockId, input: &str) -> CoreResult<bool> {
        if input.trim().is_empty() {
            return Ok(false);
        }
        doc.update_block_content(id, self.field(), self.value(input))
    }
}

fn is_embed(kind: BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::Map
            | BlockKind::Calendar
            | BlockKind::Docs
            | BlockKind::Slides
            | BlockKind::Sheets
            | BlockKind::Forms
            | BlockKind::Charts
    )
}

/// Prompt text for an embed block.
pub fn embed_prompt(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Map => "Enter Google Maps embed URL:",
        BlockKind::Calendar => "Enter Google Calendar embed URL:",
        BlockKind::Docs => "Enter Google Docs embed URL:",
        BlockKind::Slides => "Enter Google Slides embed URL:",
        BlockKind::Sheets => "Enter Google Sheets embed URL:",
        BlockKind::Forms => "Enter Google Forms embed URL:",
        BlockKind::Charts => "Enter chart embed URL:",
        _ => "Enter embed URL:",
    }
}

/// Extracts a YouTube video id from a watch URL or a short link.
///
/// Anything else is taken to be a bare id already.
pub fn youtube_video_id(input: &str) -> String {
    if input.contains("youtube.com/watch") {
        if let Ok(url) = Url::parse(input) {
            if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
                return v.into_owned();
            }
        }
        return input.to_string();
    }

    if let Some((_, rest)) = input.split_once("youtu.be/") {
        return rest.split(['?', '#']).next().unwrap_or_default().to_string();
    }

    input.to_string()
}

/// Turns a YouTube page URL into its embed URL. Other URLs pass through.
pub fn video_embed_url(input: &str) -> String {
    if input.contains("youtube.com/watch") || input.contains("youtu.be/") {
        format!("https://www.youtube.com/embed/{}", youtube_video_id(input))
    } else {
        input.to_string()
    }
}

/// Splits a comma-separated list of image URLs, dropping blanks.
pub fn carousel_images(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
