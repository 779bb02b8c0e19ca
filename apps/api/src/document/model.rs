//! Wire data model for the external document service.
//!
//! Mirrors the JSON the service returns from a document fetch: a body of
//! structural elements, each a paragraph or a table, carrying absolute
//! `startIndex`/`endIndex` character offsets that increase strictly in
//! document-reading order. Tables recurse: every cell holds its own list of
//! structural elements, to unbounded depth.
//!
//! These types are an in-memory snapshot only. They are never persisted and
//! never mutated locally — all edits go back over the wire as operations
//! (see `document::ops`).

use serde::{Deserialize, Serialize};

/// A fetched document snapshot. Offsets are valid until the first edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTree {
    pub document_id: String,
    #[serde(default)]
    pub body: Vec<StructuralElement>,
}

/// One node of the document body: a paragraph, a table, or something we
/// don't understand (section breaks etc.). Every field is optional so a
/// partially populated node deserializes instead of failing the whole fetch;
/// the walker treats nodes with missing pieces as non-text and skips them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<ParagraphStyle>,
}

impl Paragraph {
    /// Concatenation of all text runs, ignoring formatting.
    pub fn flattened_text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|el| el.text_run.as_ref())
            .filter_map(|run| run.content.as_deref())
            .collect()
    }

    /// Named style, or "NORMAL_TEXT" when the service omitted it.
    pub fn named_style(&self) -> &str {
        self.paragraph_style
            .as_ref()
            .and_then(|s| s.named_style_type.as_deref())
            .unwrap_or("NORMAL_TEXT")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

/// A run of literal text. Formatting attributes ride along in the service's
/// JSON but are opaque to this engine; we only read `content`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

impl DocumentTree {
    /// The current end-of-document offset: the last body element's
    /// `endIndex`, or 0 for an empty body. Only meaningful on a fresh
    /// snapshot — stale after any edit.
    pub fn end_offset(&self) -> usize {
        self.body
            .iter()
            .rev()
            .find_map(|el| el.end_index)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_node_deserializes_from_wire_shape() {
        let json = serde_json::json!({
            "startIndex": 1,
            "endIndex": 25,
            "paragraph": {
                "elements": [
                    { "textRun": { "content": "Hello, " } },
                    { "textRun": { "content": "world\n" } }
                ],
                "paragraphStyle": { "namedStyleType": "HEADING_1" }
            }
        });
        let el: StructuralElement = serde_json::from_value(json).unwrap();
        let para = el.paragraph.unwrap();
        assert_eq!(para.flattened_text(), "Hello, world\n");
        assert_eq!(para.named_style(), "HEADING_1");
        assert_eq!(el.start_index, Some(1));
        assert_eq!(el.end_index, Some(25));
    }

    #[test]
    fn test_table_node_deserializes_with_nested_content() {
        let json = serde_json::json!({
            "table": {
                "tableRows": [
                    {
                        "tableCells": [
                            {
                                "content": [
                                    {
                                        "startIndex": 10,
                                        "endIndex": 16,
                                        "paragraph": {
                                            "elements": [ { "textRun": { "content": "cell\n" } } ]
                                        }
                                    }
                                ]
                            }
                        ]
                    }
                ]
            }
        });
        let el: StructuralElement = serde_json::from_value(json).unwrap();
        let table = el.table.unwrap();
        assert_eq!(table.table_rows.len(), 1);
        let cell = &table.table_rows[0].table_cells[0];
        assert_eq!(cell.content.len(), 1);
        assert!(cell.content[0].paragraph.is_some());
    }

    #[test]
    fn test_unknown_node_kind_is_tolerated() {
        // A sectionBreak-style element carries indexes but neither a
        // paragraph nor a table. It must deserialize cleanly.
        let json = serde_json::json!({ "startIndex": 0, "endIndex": 1 });
        let el: StructuralElement = serde_json::from_value(json).unwrap();
        assert!(el.paragraph.is_none());
        assert!(el.table.is_none());
    }

    #[test]
    fn test_flattened_text_skips_runless_elements() {
        let para = Paragraph {
            elements: vec![
                ParagraphElement { text_run: None },
                ParagraphElement {
                    text_run: Some(TextRun {
                        content: Some("abc".to_string()),
                    }),
                },
                ParagraphElement {
                    text_run: Some(TextRun { content: None }),
                },
            ],
            paragraph_style: None,
        };
        assert_eq!(para.flattened_text(), "abc");
        assert_eq!(para.named_style(), "NORMAL_TEXT");
    }

    #[test]
    fn test_end_offset_uses_last_indexed_element() {
        let tree = DocumentTree {
            document_id: "doc-1".to_string(),
            body: vec![
                StructuralElement {
                    start_index: Some(1),
                    end_index: Some(10),
                    ..Default::default()
                },
                StructuralElement::default(),
            ],
        };
        // Trailing element has no endIndex; fall back to the last one that does.
        assert_eq!(tree.end_offset(), 10);
    }

    #[test]
    fn test_end_offset_empty_body_is_zero() {
        let tree = DocumentTree {
            document_id: "doc-1".to_string(),
            body: vec![],
        };
        assert_eq!(tree.end_offset(), 0);
    }
}
