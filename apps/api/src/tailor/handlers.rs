//! Axum route handlers for the Tailoring API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailor::pipeline::{tailor_document, TailorRequest, TailorResponse};

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<String>,
}

/// GET /api/v1/templates
///
/// Lists the configured CV template keys.
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<TemplatesResponse>, AppError> {
    let mut templates: Vec<String> = state.config.templates.keys().cloned().collect();
    templates.sort_unstable();
    Ok(Json(TemplatesResponse { templates }))
}

/// POST /api/v1/tailor
///
/// Full tailoring pipeline: fetch template doc → locate regions → draft
/// sections → batch apply → append cover letter. Returns the apply report
/// and the document's edit link.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }
    if request.template.trim().is_empty() {
        return Err(AppError::Validation("template cannot be empty".to_string()));
    }
    for placeholder in &request.placeholders {
        if placeholder.token.is_empty() {
            return Err(AppError::Validation(
                "placeholder token cannot be empty".to_string(),
            ));
        }
    }

    let response = tailor_document(
        state.docs.as_ref(),
        &state.llm,
        &state.config,
        request,
    )
    .await?;

    Ok(Json(response))
}
