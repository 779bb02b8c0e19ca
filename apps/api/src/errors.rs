use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::docs_client::DocsError;
use crate::document::batch::BatchError;
use crate::document::locator::LocateError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Locate error: {0}")]
    Locate(#[from] LocateError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("Document service error: {0}")]
    Docs(#[from] DocsError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            // Locating failed against the fetched document: the request was
            // well-formed but the template's structure didn't hold. The
            // error text carries region name and marker for diagnosis.
            AppError::Locate(e) => {
                let code = match e {
                    LocateError::MarkerNotFound { .. } => "MARKER_NOT_FOUND",
                    LocateError::SectionNotFound { .. } => "SECTION_NOT_FOUND",
                    LocateError::OverlappingRegions { .. } => "OVERLAPPING_REGIONS",
                };
                (StatusCode::UNPROCESSABLE_ENTITY, code, e.to_string())
            }
            AppError::Batch(e) => {
                tracing::error!("Batch error: {e}");
                let (status, code) = batch_error_code(e);
                (status, code, e.to_string())
            }
            AppError::Docs(e) => {
                tracing::error!("Document service error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "DOCS_ERROR",
                    "A document service error occurred".to_string(),
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Each batch failure mode carries its own code: a refetch failure is a
/// read problem, not a lost submit, and the caller diagnoses them
/// differently.
fn batch_error_code(e: &BatchError) -> (StatusCode, &'static str) {
    match e {
        BatchError::OverlappingRegions { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "OVERLAPPING_REGIONS")
        }
        BatchError::SubmitFailed { .. } => (StatusCode::BAD_GATEWAY, "SUBMIT_FAILED"),
        BatchError::RefetchFailed { .. } => (StatusCode::BAD_GATEWAY, "REFETCH_FAILED"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refetch_failure_gets_its_own_code() {
        let err = BatchError::RefetchFailed {
            doc_id: "d".to_string(),
            source: DocsError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        };
        assert_eq!(
            batch_error_code(&err),
            (StatusCode::BAD_GATEWAY, "REFETCH_FAILED")
        );

        let err = BatchError::SubmitFailed {
            doc_id: "d".to_string(),
            region: "skills".to_string(),
            source: DocsError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        };
        assert_eq!(
            batch_error_code(&err),
            (StatusCode::BAD_GATEWAY, "SUBMIT_FAILED")
        );
    }
}
