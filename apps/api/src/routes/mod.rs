pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailor::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tailoring API
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        .route("/api/v1/tailor", post(handlers::handle_tailor))
        .with_state(state)
}
