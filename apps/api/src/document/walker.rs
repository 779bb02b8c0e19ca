//! Document Tree Walker.
//!
//! Flattens the recursively nested body (paragraphs; tables of rows of
//! cells, each cell its own nested body) into a single document-order
//! sequence. Pure traversal: no node is skipped or reordered at this level,
//! and malformed nodes never abort the walk — they simply yield no
//! paragraph view downstream.

use crate::document::model::{DocumentTree, StructuralElement};

/// A text-bearing paragraph as seen by the locator: absolute offsets plus
/// the flattened run text and named style. Produced only for paragraphs
/// that carry both offsets; anything else is treated as non-text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatParagraph {
    pub start_index: usize,
    pub end_index: usize,
    pub text: String,
    pub style: String,
}

/// Walks `content` depth-first in document order, descending into every
/// table cell recursively, and returns the nodes as one owned sequence.
/// Plain recursion rather than a suspended iterator keeps the traversal
/// restartable and trivially testable.
pub fn walk(content: &[StructuralElement]) -> Vec<&StructuralElement> {
    let mut out = Vec::new();
    collect(content, &mut out);
    out
}

fn collect<'a>(content: &'a [StructuralElement], out: &mut Vec<&'a StructuralElement>) {
    for el in content {
        out.push(el);
        if let Some(table) = &el.table {
            for row in &table.table_rows {
                for cell in &row.table_cells {
                    collect(&cell.content, out);
                }
            }
        }
    }
}

/// Document-order sequence of text-bearing paragraphs for a whole tree.
/// Paragraphs missing offsets (malformed fetch data) are skipped, never an
/// error.
pub fn flat_paragraphs(tree: &DocumentTree) -> Vec<FlatParagraph> {
    walk(&tree.body)
        .into_iter()
        .filter_map(|el| {
            let para = el.paragraph.as_ref()?;
            let start_index = el.start_index?;
            let end_index = el.end_index?;
            Some(FlatParagraph {
                start_index,
                end_index,
                text: para.flattened_text(),
                style: para.named_style().to_string(),
            })
        })
        .collect()
}
