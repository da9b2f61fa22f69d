//! HTTP request handlers

use super::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// Greeting text returned by [`say_hi`]
pub const GREETING: &str = "Good morning";

/// Greeting handler
pub async fn say_hi() -> &'static str {
    GREETING
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "cluster": state.cluster_state(),
    }))
}
