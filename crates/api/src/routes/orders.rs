//! Checkout, payment confirmation and order history endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use checkout::CardDetails;
use common::OrderId;
use domain::{LineItem, Money, Order};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::sessions::CurrentUser;

// -- Request types --

#[derive(Deserialize)]
pub struct ConfirmPurchaseRequest {
    /// Pending order to pay for. Absent or empty checks out the cart first.
    #[serde(default)]
    pub order_id: Option<String>,
    pub credit_card_details: CardDetails,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: String,
    pub state: &'static str,
    pub items: Vec<LineItem>,
    pub total_items: u32,
    pub total_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_confirmation: Option<String>,
    pub placed_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id().clone(),
            user_id: order.user_id().to_string(),
            state: order.state().as_str(),
            items: order.items().to_vec(),
            total_items: order.total_items(),
            total_price: order.total_price(),
            payment_confirmation: order.payment_confirmation().map(str::to_string),
            placed_at: order.placed_at(),
        }
    }
}

#[derive(Serialize)]
pub struct OrderHistoryResponse {
    pub orders: Vec<OrderResponse>,
}

// -- Handlers --

/// POST /checkout: turns the cart into a pending order.
#[tracing::instrument(skip(state, user), fields(user = %user.0))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.coordinator.checkout(&user.0).await?;
    Ok(Json(order.into()))
}

/// POST /orders/confirm: pays for a pending order.
#[tracing::instrument(skip(state, user, req), fields(user = %user.0))]
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<ConfirmPurchaseRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    if req.credit_card_details.number.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing credit card number".to_string()));
    }

    let order_id = req.order_id.map(OrderId::new);
    let order = state
        .coordinator
        .confirm_purchase(&user.0, order_id.as_ref(), &req.credit_card_details)
        .await?;
    Ok(Json(order.into()))
}

/// GET /orders: the caller's orders, newest first.
pub async fn history(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<OrderHistoryResponse> {
    let orders = state
        .coordinator
        .order_history(&user)
        .await
        .into_iter()
        .map(OrderResponse::from)
        .collect();
    Json(OrderHistoryResponse { orders })
}
