//! Conversion between a live [`Document`] and its stored record, plus the
//! export and preview markup.
//!
//! ## Learning: Lenient Deserialization
//!
//! A stored document may contain blocks written by a newer composer with
//! types this build does not know. `deserialize_with` lets the `blocks`
//! field decode each element separately and skip the ones that fail,
//! instead of rejecting the whole record.

use chrono::{DateTime, Utc};
use composer_blocks::{Block, RenderMode, escape_html, strip_editable};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::ExportConfig;
use crate::document::Document;
use crate::store::DocumentId;

/// The persisted form of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    #[serde(default = "untitled")]
    pub title: String,

    #[serde(default, deserialize_with = "known_blocks")]
    pub blocks: Vec<Block>,

    /// Inner markup of the site header
    #[serde(default)]
    pub header_content: String,

    /// Inner markup of the site footer
    #[serde(default)]
    pub footer_content: String,

    /// Compiled export markup
    #[serde(default)]
    pub html: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn untitled() -> String {
    "Untitled".to_string()
}

fn known_blocks<'de, D>(deserializer: D) -> Result<Vec<Block>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Block>(value) {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::warn!("Skipping stored block: {}", e);
                None
            }
        })
        .collect())
}

/// A save in flight: the record to write and the state it was taken from.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    /// Existing store id, `None` for a first save
    pub id: Option<DocumentId>,
    pub record: StoredDocument,
    /// Document revision at the time the record was taken
    pub revision: u64,
}

impl Document {
    /// Builds the stored record for the current state.
    pub fn to_record(&self) -> StoredDocument {
        StoredDocument {
            title: self.title.clone(),
            blocks: self.blocks.clone(),
            header_content: self.header.clone(),
            footer_content: self.footer.clone(),
            html: self.export_markup(),
            created_at: self.created_at,
            updated_at: None,
        }
    }

    /// Replaces the whole document with a stored record.
    ///
    /// Empty header or footer markup keeps the current one. History starts
    /// over from the loaded blocks and the document is clean.
    pub fn hydrate(&mut self, id: DocumentId, record: StoredDocument) {
        self.id = Some(id);
        self.title = record.title;
        self.blocks = record.blocks;
        if !record.header_content.is_empty() {
            self.header = record.header_content;
        }
        if !record.footer_content.is_empty() {
            self.footer = record.footer_content;
        }
        self.created_at = record.created_at;
        self.selected = None;
        self.history.reset(&self.blocks);
        self.mark_clean();
    }

    /// Snapshots the state for an asynchronous save.
    pub fn prepare_save(&self) -> SaveRequest {
        SaveRequest {
            id: self.id.clone(),
            record: self.to_record(),
            revision: self.revision(),
        }
    }

    /// Renders the publishable page body: header, blocks and footer with
    /// every editing affordance removed.
    pub fn export_markup(&self) -> String {
        let header = strip_editable(&format!(
            r#"<header id="site-header" class="border-b border-slate-200">{}</header>"#,
            self.header
        ));
        let footer = strip_editable(&format!(
            r#"<footer id="site-footer" class="border-t border-slate-200">{}</footer>"#,
            self.footer
        ));

        let main: String = self
            .blocks
            .iter()
            .map(|block| block.render(None, RenderMode::Export))
            .collect();

        format!("{}\n<main class=\"py-8\">{}</main>\n{}", header, main, footer)
    }

    /// Wraps the export markup in a standalone preview page.
    pub fn preview_page(&self, config: &ExportConfig) -> String {
        preview_page(&self.title, &self.export_markup(), config)
    }
}

/// Builds a standalone HTML page around exported markup.
pub fn preview_page(title: &str, markup: &str, config: &ExportConfig) -> String {
    let mut head = format!("<title>Preview - {}</title>\n", escape_html(title));
    for tag in &config.stylesheets {
        head.push_str(tag);
        head.push('\n');
    }
    head.push_str(&format!(
        "<style>body {{ font-family: 'Inter', sans-serif; max-width: {}px; margin: 0 auto; padding: 40px 20px; }}</style>\n",
        config.max_width_px
    ));

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{}</head>\n<body>{}</body>\n</html>\n",
        head, markup
    )
}
