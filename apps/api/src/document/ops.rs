//! Mutation operations sent back to the document service.
//!
//! Exactly three operation kinds exist on the wire, and their ordering
//! within one submitted request list is the contract the batch layer relies
//! on: a delete and its companion insert for the same region must be
//! consecutive entries of one request so the service resolves the insert
//! offset against the pre-delete state.

use serde::{Deserialize, Serialize};

/// One entry of a batch-update request list. Serializes to the service's
/// externally tagged shape, e.g.
/// `{"deleteContentRange": {"range": {"startIndex": 5, "endIndex": 9}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditOperation {
    DeleteContentRange { range: ContentRange },
    InsertText { location: Location, text: String },
    ReplaceAllText { contains_text: SubstringMatch, replace_text: String },
}

/// Half-open `[startIndex, endIndex)` over absolute character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRange {
    pub start_index: usize,
    pub end_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: usize,
}

/// Exact-substring criterion for `replaceAllText`. `match_case` is always
/// true: placeholder tokens are case-sensitive by contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstringMatch {
    pub text: String,
    pub match_case: bool,
}

impl EditOperation {
    pub fn delete(start_index: usize, end_index: usize) -> Self {
        EditOperation::DeleteContentRange {
            range: ContentRange {
                start_index,
                end_index,
            },
        }
    }

    pub fn insert(index: usize, text: impl Into<String>) -> Self {
        EditOperation::InsertText {
            location: Location { index },
            text: text.into(),
        }
    }

    pub fn replace_all(token: impl Into<String>, replacement: impl Into<String>) -> Self {
        EditOperation::ReplaceAllText {
            contains_text: SubstringMatch {
                text: token.into(),
                match_case: true,
            },
            replace_text: replacement.into(),
        }
    }
}
