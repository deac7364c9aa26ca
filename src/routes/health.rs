use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::app_state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub ollama_url: String,
    pub model: String,
    pub timestamp: String,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy",
        ollama_url: state.config.ollama_url.clone(),
        model: state.config.ollama_model.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
