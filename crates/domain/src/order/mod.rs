//! Placed orders, their payment state and the per-user ledger.

mod id;
mod ledger;
mod state;

pub use id::{ORDER_ID_PREFIX, OrderIdSource, RandomOrderIds, SequentialOrderIds};
pub use ledger::OrderLedger;
pub use state::OrderState;

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{DomainError, Result};
use crate::value_objects::{LineItem, Money};

/// A checked-out order.
///
/// Lines and totals are frozen from the cart at checkout and never change.
/// The only mutable part is the payment confirmation, which is set at most
/// once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    items: Vec<LineItem>,
    total_items: u32,
    total_price: Money,
    payment_confirmation: Option<String>,
    placed_at: DateTime<Utc>,
}

impl Order {
    /// Freezes a cart's lines into a new pending order.
    pub fn from_cart(id: OrderId, cart: &Cart, placed_at: DateTime<Utc>) -> Result<Self> {
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        Ok(Self {
            id,
            user_id: cart.user_id().clone(),
            items: cart.lines().cloned().collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            payment_confirmation: None,
            placed_at,
        })
    }

    /// Returns the order id.
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Returns the owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the frozen line items.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the total quantity ordered.
    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Returns the amount to be paid.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the payment confirmation, if the order has been paid.
    pub fn payment_confirmation(&self) -> Option<&str> {
        self.payment_confirmation.as_deref()
    }

    /// Returns when the order was placed.
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> OrderState {
        if self.payment_confirmation.is_some() {
            OrderState::Confirmed
        } else {
            OrderState::Pending
        }
    }

    /// Returns true once a payment confirmation has been recorded.
    pub fn is_confirmed(&self) -> bool {
        self.state() == OrderState::Confirmed
    }

    /// Records the payment confirmation.
    ///
    /// Fails with `AlreadyConfirmed` if one is already set; the existing
    /// confirmation is never overwritten.
    pub fn confirm(&mut self, confirmation: impl Into<String>) -> Result<()> {
        if !self.state().can_confirm() {
            return Err(DomainError::AlreadyConfirmed {
                order_id: self.id.clone(),
            });
        }
        self.payment_confirmation = Some(confirmation.into());
        Ok(())
    }
}
