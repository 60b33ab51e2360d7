//! Catalog browsing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::Sku;
use domain::Item;
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

/// GET /items: every listed item, sorted by SKU.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<ItemsResponse> {
    Json(ItemsResponse {
        items: state.coordinator.list_items().await,
    })
}

/// GET /items/{sku}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(sku): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let item = state.coordinator.get_item(&Sku::new(sku)).await?;
    Ok(Json(item))
}
