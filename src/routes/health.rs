use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Root endpoint - basic status
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.registry.current();

    Json(serde_json::json!({
        "name": "DaddyHub Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "channels": snapshot.len(),
        "playlist": "/playlist.m3u",
        "epg": "/epg.xml",
        "ui": "/ui"
    }))
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    uptime: u64,
    channel_count: usize,
    last_refresh: String,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.registry.current();

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        channel_count: snapshot.len(),
        last_refresh: snapshot.refreshed_at.to_rfc3339(),
    })
}
