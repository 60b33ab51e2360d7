//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog_items: usize,
}

/// GET /health: liveness plus the number of listed items.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let catalog_items = state.coordinator.list_items().await.len();
    Json(HealthResponse {
        status: "ok",
        catalog_items,
    })
}
