//! Property panel fields.
//!
//! The property panel edits the scalar fields of the selected block: text
//! fields and number fields, in the order the content type declares them.
//! Lists, maps and flags are edited by dedicated pickers instead.

use serde_json::Value;

use crate::BlockContent;

/// Input kind of a property field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

/// One editable field of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyField {
    /// Wire name of the field (`embedUrl`)
    pub key: String,
    /// Human label (`Embed Url`)
    pub label: String,
    pub kind: FieldKind,
    /// Current value, formatted for an input box
    pub value: String,
}

/// Lists the editable fields of a block's content.
pub fn property_fields(content: &BlockContent) -> Vec<PropertyField> {
    content
        .fields()
        .into_iter()
        .filter_map(|(key, value)| {
            let (kind, value) = match value {
                Value::String(s) => (FieldKind::Text, s),
                Value::Number(n) => (FieldKind::Number, n.to_string()),
                _ => return None,
            };
            Some(PropertyField {
                label: label_for(&key),
                key,
                kind,
                value,
            })
        })
        .collect()
}

/// Turns a camelCase key into a label: `videoId` becomes `Video Id`.
fn label_for(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            label.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            label.push(' ');
            label.push(ch);
        } else {
            label.push(ch);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockKind;

    #[test]
    fn test_labels() {
        assert_eq!(label_for("text"), "Text");
        assert_eq!(label_for("embedUrl"), "Embed Url");
        assert_eq!(label_for("videoId"), "Video Id");
    }

    #[test]
    fn test_image_fields_in_declaration_order() {
        let fields = property_fields(&BlockContent::default_for(BlockKind::Image));
        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["src", "alt", "caption"]);
        assert!(fields.iter().all(|f| f.kind == FieldKind::Text));
        assert_eq!(fields[1].value, "Image");
    }

    #[test]
    fn test_number_fields() {
        let fields = property_fields(&BlockContent::default_for(BlockKind::Columns));
        assert_eq!(
            fields[0],
            PropertyField {
                key: "count".to_string(),
                label: "Count".to_string(),
                kind: FieldKind::Number,
                value: "2".to_string(),
            }
        );
    }

    #[test]
    fn test_non_scalar_fields_are_skipped() {
        let fields = property_fields(&BlockContent::default_for(BlockKind::List));
        assert!(fields.is_empty());

        let fields = property_fields(&BlockContent::default_for(BlockKind::Collapsible));
        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["title", "content"]);
    }
}
