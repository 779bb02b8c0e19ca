//! Document service client — the single point of entry for all document
//! store round-trips.
//!
//! ARCHITECTURAL RULE: No other module may call the document API directly.
//! Everything goes through the `DocumentService` trait, so the batch layer
//! and handlers stay testable against an in-memory fake.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::document::model::DocumentTree;
use crate::document::ops::EditOperation;

#[cfg(test)]
pub mod fake;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum DocsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// The two round-trips the engine needs from the backing store. Injected as
/// a trait object so tests swap in `fake::InMemoryDocs`.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Reads the full document tree. Offsets in the result are a snapshot,
    /// valid until the next successful `submit_edits`.
    async fn fetch_document(&self, doc_id: &str) -> Result<DocumentTree, DocsError>;

    /// Submits one request list. Operations are applied by the service in
    /// list order; a delete and its companion insert must be consecutive.
    async fn submit_edits(&self, doc_id: &str, ops: &[EditOperation]) -> Result<(), DocsError>;
}

#[derive(Debug, Serialize)]
struct BatchUpdateBody<'a> {
    requests: &'a [EditOperation],
}

/// Production client over the document service's REST API.
/// Retries 429 and 5xx with exponential backoff, like every other outbound
/// client in this service.
#[derive(Clone)]
pub struct DocsClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl DocsClient {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    async fn execute_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, DocsError> {
        let mut last_error: Option<DocsError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "document API attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match build().bearer_auth(&self.api_token).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(DocsError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("document API returned {}: {}", status, body);
                last_error = Some(DocsError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(DocsError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            return Ok(response);
        }

        Err(last_error.unwrap_or(DocsError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl DocumentService for DocsClient {
    async fn fetch_document(&self, doc_id: &str) -> Result<DocumentTree, DocsError> {
        let url = format!("{}/v1/documents/{}", self.base_url, doc_id);
        let response = self.execute_with_retry(|| self.client.get(&url)).await?;
        let tree: DocumentTree = response.json().await?;
        debug!(
            "fetched document {} ({} top-level elements)",
            doc_id,
            tree.body.len()
        );
        Ok(tree)
    }

    async fn submit_edits(&self, doc_id: &str, ops: &[EditOperation]) -> Result<(), DocsError> {
        if ops.is_empty() {
            return Ok(());
        }
        let url = format!("{}/v1/documents/{}:batchUpdate", self.base_url, doc_id);
        let body = BatchUpdateBody { requests: ops };
        self.execute_with_retry(|| self.client.post(&url).json(&body))
            .await?;
        debug!("submitted {} operation(s) to document {}", ops.len(), doc_id);
        Ok(())
    }
}
