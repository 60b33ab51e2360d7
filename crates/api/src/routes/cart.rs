//! Cart endpoints. All require a session token.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::Sku;
use domain::{Cart, Money};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::sessions::CurrentUser;

#[derive(Deserialize)]
pub struct CartLineRequest {
    pub sku: String,
    pub quantity: u32,
}

impl CartLineRequest {
    fn sku(&self) -> Result<Sku, ApiError> {
        if self.sku.trim().is_empty() {
            return Err(ApiError::BadRequest("Missing sku".to_string()));
        }
        Ok(Sku::new(self.sku.trim()))
    }
}

#[derive(Serialize)]
pub struct CartTotalResponse {
    pub total_price: Money,
}

/// GET /cart
pub async fn get(State(state): State<Arc<AppState>>, CurrentUser(user): CurrentUser) -> Json<Cart> {
    Json(state.coordinator.cart(&user).await)
}

/// POST /cart/add: adds units of an item, checking current stock.
#[tracing::instrument(skip(state, user, req), fields(user = %user.0))]
pub async fn add(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<CartLineRequest>,
) -> Result<Json<Cart>, ApiError> {
    let sku = req.sku()?;
    let cart = state
        .coordinator
        .add_to_cart(&user.0, &sku, req.quantity)
        .await?;
    Ok(Json(cart))
}

/// POST /cart/remove: removes up to `quantity` units of a line.
#[tracing::instrument(skip(state, user, req), fields(user = %user.0))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<CartLineRequest>,
) -> Result<Json<Cart>, ApiError> {
    let sku = req.sku()?;
    let cart = state
        .coordinator
        .remove_from_cart(&user.0, &sku, req.quantity)
        .await?;
    Ok(Json(cart))
}

/// GET /cart/total
pub async fn total(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<CartTotalResponse> {
    Json(CartTotalResponse {
        total_price: state.coordinator.cart_total(&user).await,
    })
}
