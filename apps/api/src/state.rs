use std::sync::Arc;

use crate::config::Config;
use crate::docs_client::DocumentService;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Document store handle. A trait object so pipeline tests run against
    /// an in-memory fake instead of the real API.
    pub docs: Arc<dyn DocumentService>,
    pub llm: LlmClient,
    pub config: Config,
}
