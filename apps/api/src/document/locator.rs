//! Region Locator.
//!
//! Resolves named logical regions of a document snapshot to absolute
//! half-open character ranges, using one of two strategies per region:
//!
//! - **Heading**: match a paragraph by named style AND label substring. The
//!   returned range is the heading paragraph's OWN `[start, end)` — using it
//!   as a replacement target rewrites the heading line itself, so callers
//!   choosing this mode must regenerate the label text in the replacement.
//! - **MarkerPair**: scan forward for the paragraph containing the START
//!   sentinel, then continue forward (never rescanning passed nodes) for
//!   the END sentinel. The range is `[startIndex(START), startIndex(END))`.
//!
//! Locating is all-or-nothing: a missing marker or heading, or any overlap
//! between located regions, fails the whole operation and no partial region
//! map is returned.

use thiserror::Error;
use tracing::debug;

use crate::document::model::DocumentTree;
use crate::document::walker::flat_paragraphs;

/// A named half-open range `[start, end)` over absolute character offsets.
/// `start == end` is a legal empty region; the mutator skips it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// How to find one named region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Paragraph style equals `style` and flattened text contains `label`.
    /// Returns the heading paragraph's own range — a replacement deletes
    /// the heading line, not some body that follows it.
    Heading { style: String, label: String },
    /// Sentinel substrings bounding the region by content. Both must occur,
    /// START strictly before END in document order.
    MarkerPair {
        start_marker: String,
        end_marker: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
    pub name: String,
    pub strategy: Strategy,
}

impl RegionSpec {
    pub fn heading(name: &str, style: &str, label: &str) -> Self {
        RegionSpec {
            name: name.to_string(),
            strategy: Strategy::Heading {
                style: style.to_string(),
                label: label.to_string(),
            },
        }
    }

    pub fn markers(name: &str, start_marker: &str, end_marker: &str) -> Self {
        RegionSpec {
            name: name.to_string(),
            strategy: Strategy::MarkerPair {
                start_marker: start_marker.to_string(),
                end_marker: end_marker.to_string(),
            },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("marker '{marker}' for region '{region}' not found in document")]
    MarkerNotFound { region: String, marker: String },

    #[error("no paragraph with style '{style}' containing '{label}' for region '{region}'")]
    SectionNotFound {
        region: String,
        style: String,
        label: String,
    },

    #[error("regions '{first}' and '{second}' overlap")]
    OverlappingRegions { first: String, second: String },
}

/// Resolves every spec against one snapshot. Fails loudly on the first
/// missing marker/heading or on any overlap between located regions;
/// callers never see a partial map.
pub fn locate_regions(
    tree: &DocumentTree,
    specs: &[RegionSpec],
) -> Result<Vec<Region>, LocateError> {
    let paragraphs = flat_paragraphs(tree);

    let mut regions = Vec::with_capacity(specs.len());
    for spec in specs {
        let region = match &spec.strategy {
            Strategy::Heading { style, label } => paragraphs
                .iter()
                .find(|p| p.style == *style && p.text.contains(label.as_str()))
                .map(|p| Region {
                    name: spec.name.clone(),
                    start: p.start_index,
                    end: p.end_index,
                })
                .ok_or_else(|| LocateError::SectionNotFound {
                    region: spec.name.clone(),
                    style: style.clone(),
                    label: label.clone(),
                })?,
            Strategy::MarkerPair {
                start_marker,
                end_marker,
            } => {
                let start_pos = paragraphs
                    .iter()
                    .position(|p| p.text.contains(start_marker.as_str()))
                    .ok_or_else(|| LocateError::MarkerNotFound {
                        region: spec.name.clone(),
                        marker: start_marker.clone(),
                    })?;
                // Forward continuation only: the END scan picks up after
                // the START paragraph and never revisits earlier nodes.
                let end_para = paragraphs[start_pos + 1..]
                    .iter()
                    .find(|p| p.text.contains(end_marker.as_str()))
                    .ok_or_else(|| LocateError::MarkerNotFound {
                        region: spec.name.clone(),
                        marker: end_marker.clone(),
                    })?;
                Region {
                    name: spec.name.clone(),
                    start: paragraphs[start_pos].start_index,
                    end: end_para.start_index,
                }
            }
        };
        debug!(
            "located region '{}' at [{}, {})",
            region.name, region.start, region.end
        );
        regions.push(region);
    }

    check_no_overlap(&regions)?;
    Ok(regions)
}

/// The default contract forbids overlapping regions: applying both would
/// corrupt content outside at least one of them.
fn check_no_overlap(regions: &[Region]) -> Result<(), LocateError> {
    let mut sorted: Vec<&Region> = regions.iter().collect();
    sorted.sort_by_key(|r| (r.start, r.end));
    for pair in sorted.windows(2) {
        if pair[0].end > pair[1].start {
            return Err(LocateError::OverlappingRegions {
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }
    }
    Ok(())
}
