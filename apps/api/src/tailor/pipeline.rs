//! CV Tailoring — orchestrates the full tailoring pipeline.
//!
//! Flow: resolve template → fetch snapshot → locate regions →
//!       LLM draft per section → batch apply (descending) →
//!       placeholder substitutions → append cover letter → report.
//!
//! All offsets come from the one snapshot fetched up front; the batch
//! layer owns the ordering that keeps them valid.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::docs_client::DocumentService;
use crate::document::batch::{apply_batch, ApplyReport, BatchPlan, PlaceholderEdit, RangeEdit};
use crate::document::locator::{locate_regions, Region, RegionSpec};
use crate::document::mutator::PlaceholderScope;
use crate::errors::AppError;
use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::LlmClient;
use crate::tailor::prompts::{
    fill, COVER_LETTER_PROMPT_TEMPLATE, HEADLINE_PROMPT_TEMPLATE, HIGHLIGHTS_PROMPT_TEMPLATE,
    SKILLS_PROMPT_TEMPLATE,
};

pub const SKILLS_LABEL: &str = "SKILLS";
pub const HIGHLIGHTS_LABEL: &str = "STANDOUT HIGHLIGHTS";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// How the template document marks its rewritable sections. The two modes
/// are NOT interchangeable: heading mode replaces the heading paragraph
/// itself, marker mode replaces the content between sentinel lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocateMode {
    #[default]
    Heading,
    Markers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceholderValue {
    pub token: String,
    pub text: String,
}

/// Request body for CV tailoring.
#[derive(Debug, Clone, Deserialize)]
pub struct TailorRequest {
    /// CV template key (e.g. "TME", "SDR", "Data", "AI/ML").
    pub template: String,
    pub jd_text: String,
    #[serde(default)]
    pub mode: LocateMode,
    /// Literal placeholder substitutions applied alongside the sections.
    #[serde(default)]
    pub placeholders: Vec<PlaceholderValue>,
    #[serde(default = "default_true")]
    pub append_cover_letter: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct TailorResponse {
    pub document_id: String,
    pub edit_link: String,
    pub report: ApplyReport,
}

/// The generated texts, one per rewritable section.
#[derive(Debug, Clone)]
pub struct SectionDrafts {
    pub headline: String,
    pub skills: String,
    pub highlights: String,
    pub cover_letter: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full tailoring pipeline against one template document.
///
/// Input validation (unknown template, empty JD) happens before any
/// network interaction. A locate failure aborts before any mutation; a
/// range-edit submit failure aborts mid-batch and surfaces as such.
pub async fn tailor_document(
    docs: &dyn DocumentService,
    llm: &LlmClient,
    config: &Config,
    request: TailorRequest,
) -> Result<TailorResponse, AppError> {
    // Step 1: resolve the template key. Fatal before any round-trip.
    let doc_id = config
        .templates
        .get(&request.template)
        .cloned()
        .ok_or_else(|| {
            AppError::Validation(format!(
                "unknown CV template '{}' (known: {})",
                request.template,
                known_templates(config)
            ))
        })?;

    info!(
        "tailoring template '{}' → document {} (mode {:?})",
        request.template, doc_id, request.mode
    );

    // Step 2: one snapshot; every located offset refers to it.
    let tree = docs.fetch_document(&doc_id).await?;

    // Step 3: locate all regions before generating anything — a broken
    // template should fail fast, not after three LLM calls.
    let specs = region_specs(request.mode, &config.headline_label);
    let regions = locate_regions(&tree, &specs)?;

    // Step 4: draft each section sequentially.
    let drafts = SectionDrafts {
        headline: llm
            .generate(
                &fill(HEADLINE_PROMPT_TEMPLATE, &request.template, &request.jd_text),
                PLAIN_TEXT_SYSTEM,
            )
            .await?,
        skills: llm
            .generate(
                &fill(SKILLS_PROMPT_TEMPLATE, &request.template, &request.jd_text),
                PLAIN_TEXT_SYSTEM,
            )
            .await?,
        highlights: llm
            .generate(
                &fill(HIGHLIGHTS_PROMPT_TEMPLATE, &request.template, &request.jd_text),
                PLAIN_TEXT_SYSTEM,
            )
            .await?,
        cover_letter: if request.append_cover_letter {
            Some(
                llm.generate(
                    &fill(COVER_LETTER_PROMPT_TEMPLATE, &request.template, &request.jd_text),
                    PLAIN_TEXT_SYSTEM,
                )
                .await?,
            )
        } else {
            None
        },
    };

    // Steps 5-7: one batch against the snapshot.
    let plan = build_plan(
        regions,
        request.mode,
        &config.headline_label,
        &drafts,
        request.placeholders,
        config.placeholder_scope,
    );
    let report = apply_batch(docs, &doc_id, plan).await?;

    Ok(TailorResponse {
        edit_link: config.doc_edit_url_template.replace("{id}", &doc_id),
        document_id: doc_id,
        report,
    })
}

fn known_templates(config: &Config) -> String {
    let mut keys: Vec<&str> = config.templates.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys.join(", ")
}

/// Region specs for the three rewritable sections, in discovery order.
pub fn region_specs(mode: LocateMode, headline_label: &str) -> Vec<RegionSpec> {
    match mode {
        LocateMode::Heading => vec![
            RegionSpec::heading("headline", "HEADING_1", headline_label),
            RegionSpec::heading("skills", "HEADING_2", SKILLS_LABEL),
            RegionSpec::heading("highlights", "HEADING_2", HIGHLIGHTS_LABEL),
        ],
        LocateMode::Markers => vec![
            RegionSpec::markers("headline", "[[HEADLINE_START]]", "[[HEADLINE_END]]"),
            RegionSpec::markers("skills", "[[SKILLS_START]]", "[[SKILLS_END]]"),
            RegionSpec::markers("highlights", "[[HIGHLIGHTS_START]]", "[[HIGHLIGHTS_END]]"),
        ],
    }
}

/// Builds the batch plan from located regions and drafted texts.
///
/// Replacement text re-establishes whatever the range replacement removes:
/// heading mode rewrites the heading paragraph itself, so the label line
/// (or the candidate name, for the headline) is prepended; marker mode's
/// range starts at the START marker line, so that line is prepended. Both
/// keep the template re-tailorable.
pub fn build_plan(
    regions: Vec<Region>,
    mode: LocateMode,
    headline_label: &str,
    drafts: &SectionDrafts,
    placeholders: Vec<PlaceholderValue>,
    placeholder_scope: PlaceholderScope,
) -> BatchPlan {
    let range_edits = regions
        .into_iter()
        .map(|region| {
            let draft = match region.name.as_str() {
                "skills" => &drafts.skills,
                "highlights" => &drafts.highlights,
                _ => &drafts.headline,
            };
            let label = match (mode, region.name.as_str()) {
                (LocateMode::Heading, "skills") => SKILLS_LABEL.to_string(),
                (LocateMode::Heading, "highlights") => HIGHLIGHTS_LABEL.to_string(),
                (LocateMode::Heading, _) => headline_label.to_string(),
                (LocateMode::Markers, name) => format!("[[{}_START]]", name.to_uppercase()),
            };
            RangeEdit {
                region,
                replacement: format!("{label}\n{}", ensure_newline(draft)),
            }
        })
        .collect();

    BatchPlan {
        range_edits,
        placeholder_edits: placeholders
            .into_iter()
            .map(|p| PlaceholderEdit {
                token: p.token,
                replacement: p.text,
            })
            .collect(),
        placeholder_scope,
        append: drafts
            .cover_letter
            .as_ref()
            .map(|cover| format!("\n\nCOVER LETTER\n\n{}", ensure_newline(cover))),
    }
}

fn ensure_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}
