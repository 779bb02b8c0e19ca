//! In-memory `DocumentService` for tests.
//!
//! Holds each document as a plain string of newline-terminated paragraphs,
//! applies the three wire operations by character offset in request-list
//! order, and re-derives a paragraph tree with fresh offsets on every
//! fetch. This is what makes the offset-drift and round-trip tests
//! deterministic without a network.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::document::model::{
    DocumentTree, Paragraph, ParagraphElement, ParagraphStyle, StructuralElement, TextRun,
};
use crate::document::ops::EditOperation;

use super::{DocsError, DocumentService};

pub struct InMemoryDocs {
    bodies: Mutex<HashMap<String, String>>,
    /// While > 0, every submit fails and decrements — simulates transport
    /// failures for the batch failure-policy tests.
    failing_submits: Mutex<u32>,
}

impl InMemoryDocs {
    pub fn new() -> Self {
        Self {
            bodies: Mutex::new(HashMap::new()),
            failing_submits: Mutex::new(0),
        }
    }

    pub fn with_document(doc_id: &str, body: &str) -> Self {
        let docs = Self::new();
        docs.bodies
            .lock()
            .unwrap()
            .insert(doc_id.to_string(), body.to_string());
        docs
    }

    pub fn fail_next_submits(&self, count: u32) {
        *self.failing_submits.lock().unwrap() = count;
    }

    pub fn body(&self, doc_id: &str) -> String {
        self.bodies.lock().unwrap().get(doc_id).cloned().unwrap()
    }

    pub fn char_len(&self, doc_id: &str) -> usize {
        self.body(doc_id).chars().count()
    }

    fn apply(body: &str, op: &EditOperation) -> String {
        let chars: Vec<char> = body.chars().collect();
        match op {
            EditOperation::DeleteContentRange { range } => {
                assert!(range.start_index <= range.end_index, "inverted range");
                assert!(range.end_index <= chars.len(), "delete past end");
                let mut out: String = chars[..range.start_index].iter().collect();
                out.extend(&chars[range.end_index..]);
                out
            }
            EditOperation::InsertText { location, text } => {
                assert!(location.index <= chars.len(), "insert past end");
                let mut out: String = chars[..location.index].iter().collect();
                out.push_str(text);
                out.extend(&chars[location.index..]);
                out
            }
            EditOperation::ReplaceAllText {
                contains_text,
                replace_text,
            } => body.replace(&contains_text.text, replace_text),
        }
    }
}

#[async_trait]
impl DocumentService for InMemoryDocs {
    async fn fetch_document(&self, doc_id: &str) -> Result<DocumentTree, DocsError> {
        let bodies = self.bodies.lock().unwrap();
        let body = bodies.get(doc_id).ok_or_else(|| DocsError::Api {
            status: 404,
            message: format!("document {doc_id} not found"),
        })?;
        Ok(parse_body(doc_id, body))
    }

    async fn submit_edits(&self, doc_id: &str, ops: &[EditOperation]) -> Result<(), DocsError> {
        {
            let mut failing = self.failing_submits.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(DocsError::Api {
                    status: 503,
                    message: "injected submit failure".to_string(),
                });
            }
        }
        let mut bodies = self.bodies.lock().unwrap();
        let body = bodies.get_mut(doc_id).ok_or_else(|| DocsError::Api {
            status: 404,
            message: format!("document {doc_id} not found"),
        })?;
        for op in ops {
            *body = Self::apply(body, op);
        }
        Ok(())
    }
}

/// Splits a body string into newline-terminated paragraphs and assigns
/// fresh character offsets from zero, the way the real service recomputes
/// indexes after every applied batch.
fn parse_body(doc_id: &str, body: &str) -> DocumentTree {
    let mut elements = Vec::new();
    let mut cursor = 0usize;
    for segment in body.split_inclusive('\n') {
        let len = segment.chars().count();
        elements.push(StructuralElement {
            start_index: Some(cursor),
            end_index: Some(cursor + len),
            paragraph: Some(Paragraph {
                elements: vec![ParagraphElement {
                    text_run: Some(TextRun {
                        content: Some(segment.to_string()),
                    }),
                }],
                paragraph_style: Some(ParagraphStyle {
                    named_style_type: Some("NORMAL_TEXT".to_string()),
                }),
            }),
            ..Default::default()
        });
        cursor += len;
    }
    DocumentTree {
        document_id: doc_id.to_string(),
        body: elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_assigns_monotonic_offsets() {
        let docs = InMemoryDocs::with_document("d", "abc\ndefg\n");
        let tree = docs.fetch_document("d").await.unwrap();
        assert_eq!(tree.body.len(), 2);
        assert_eq!(tree.body[0].start_index, Some(0));
        assert_eq!(tree.body[0].end_index, Some(4));
        assert_eq!(tree.body[1].start_index, Some(4));
        assert_eq!(tree.body[1].end_index, Some(9));
        assert_eq!(tree.end_offset(), 9);
    }

    #[tokio::test]
    async fn test_delete_then_insert_in_one_request_list() {
        let docs = InMemoryDocs::with_document("d", "0123456789");
        docs.submit_edits(
            "d",
            &[EditOperation::delete(2, 5), EditOperation::insert(2, "XY")],
        )
        .await
        .unwrap();
        assert_eq!(docs.body("d"), "01XY56789");
    }

    #[tokio::test]
    async fn test_replace_all_text_hits_every_occurrence() {
        let docs = InMemoryDocs::with_document("d", "a <<<T>>> b <<<T>>>\n");
        docs.submit_edits("d", &[EditOperation::replace_all("<<<T>>>", "x")])
            .await
            .unwrap();
        assert_eq!(docs.body("d"), "a x b x\n");
    }

    #[tokio::test]
    async fn test_char_indexing_with_multibyte_text() {
        let docs = InMemoryDocs::with_document("d", "héllo\n");
        docs.submit_edits(
            "d",
            &[EditOperation::delete(1, 2), EditOperation::insert(1, "e")],
        )
        .await
        .unwrap();
        assert_eq!(docs.body("d"), "hello\n");
    }

    #[tokio::test]
    async fn test_injected_submit_failure() {
        let docs = InMemoryDocs::with_document("d", "abc\n");
        docs.fail_next_submits(1);
        let err = docs
            .submit_edits("d", &[EditOperation::insert(0, "x")])
            .await
            .unwrap_err();
        assert!(matches!(err, DocsError::Api { status: 503, .. }));
        // Next submit goes through.
        docs.submit_edits("d", &[EditOperation::insert(0, "x")])
            .await
            .unwrap();
        assert_eq!(docs.body("d"), "xabc\n");
    }

    #[tokio::test]
    async fn test_fetch_unknown_document_is_404() {
        let docs = InMemoryDocs::new();
        let err = docs.fetch_document("missing").await.unwrap_err();
        assert!(matches!(err, DocsError::Api { status: 404, .. }));
    }
}
