pub mod app_state;
pub mod config;
pub mod error;
pub mod github;
pub mod ollama;
pub mod relay;
pub mod routes;
pub mod utils;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::routes::health::health_handler;
use crate::routes::webhook_handler::webhook_handler;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/health", get(health_handler))
        .route("/", get(|| async { "agent-relay is listening" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
