//! Range-Safe Mutator and Marker Substitution Mutator.
//!
//! Both plan wire operations; neither touches the network. The batch layer
//! owns submission order and failure policy.
//!
//! Range replacement is positional and order-sensitive: it must be a single
//! logical edit (delete `[start, end)` then insert at `start`, consecutive
//! entries of one request list) so the insert offset resolves against the
//! pre-delete state. Deleting `[start, end)` never moves offsets below
//! `start`, which is what makes inserting at `start` unconditionally safe.
//!
//! Placeholder replacement is content-addressed and offset-free, so it is
//! immune to index drift and may run in any order relative to other edits.

use tracing::warn;

use crate::document::model::DocumentTree;
use crate::document::ops::EditOperation;
use crate::document::walker::flat_paragraphs;

/// Outcome of planning one range replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeMutation {
    /// The delete+insert pair, in submission order.
    Edit(Vec<EditOperation>),
    /// `start >= end`: the region collapsed to nothing. Recoverable — the
    /// edit is skipped, never submitted, and the batch continues.
    EmptyRange,
}

/// Plans the atomic delete-then-insert for `[start, end)`.
pub fn replace_range(start: usize, end: usize, replacement: &str) -> RangeMutation {
    if start >= end {
        warn!("skipping empty range [{start}, {end}) — nothing to replace");
        return RangeMutation::EmptyRange;
    }
    RangeMutation::Edit(vec![
        EditOperation::delete(start, end),
        EditOperation::insert(start, replacement),
    ])
}

/// Signed length change a range replacement causes for every offset past
/// its `start`. Offsets at or below `start` are unaffected.
pub fn length_delta(start: usize, end: usize, replacement: &str) -> i64 {
    replacement.chars().count() as i64 - (end - start) as i64
}

/// Which occurrences of a placeholder token get replaced. Configured, not
/// assumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceholderScope {
    /// Every exact, case-sensitive occurrence (wire `replaceAllText`).
    #[default]
    AllOccurrences,
    /// Only the first occurrence in document order, planned as an
    /// offset-based edit against a fresh snapshot.
    FirstOccurrence,
}

/// Plans replacement of every occurrence of a token. Needs no snapshot:
/// the service matches by content. Zero occurrences is a no-op by
/// contract, never an error.
pub fn replace_placeholder_everywhere(token: &str, replacement: &str) -> Vec<EditOperation> {
    vec![EditOperation::replace_all(token, replacement)]
}

/// Plans replacement of only the first occurrence of a token, found by
/// walking the given snapshot. Zero occurrences plans zero operations.
pub fn replace_placeholder_first(
    tree: &DocumentTree,
    token: &str,
    replacement: &str,
) -> Vec<EditOperation> {
    for para in flat_paragraphs(tree) {
        if let Some(byte_pos) = para.text.find(token) {
            let char_pos = para.text[..byte_pos].chars().count();
            let start = para.start_index + char_pos;
            let end = start + token.chars().count();
            return vec![
                EditOperation::delete(start, end),
                EditOperation::insert(start, replacement),
            ];
        }
    }
    warn!("placeholder token '{token}' not present — leaving document unchanged");
    vec![]
}
