//! Per-user order ledger.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use common::{OrderId, UserId};

use super::{Order, OrderIdSource};
use crate::cart::Cart;
use crate::error::{DomainError, Result};

/// Sole owner of placed orders.
///
/// Each user's orders are kept newest first. Orders are never removed.
#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: HashMap<UserId, VecDeque<Order>>,
}

impl OrderLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pending order from a non-empty cart and records it.
    ///
    /// Stock is not touched here.
    pub fn place_order(
        &mut self,
        user_id: &UserId,
        cart: &Cart,
        ids: &dyn OrderIdSource,
    ) -> Result<Order> {
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let order = Order::from_cart(ids.next_id()?, cart, Utc::now())?;
        self.orders
            .entry(user_id.clone())
            .or_default()
            .push_front(order.clone());
        Ok(order)
    }

    /// Looks up one of the user's orders.
    pub fn find_order(&self, user_id: &UserId, order_id: &OrderId) -> Result<&Order> {
        self.orders
            .get(user_id)
            .and_then(|orders| orders.iter().find(|o| o.id() == order_id))
            .ok_or_else(|| DomainError::OrderNotFound {
                order_id: order_id.clone(),
            })
    }

    /// Records the payment confirmation on an order and returns the updated order.
    pub fn confirm_payment(
        &mut self,
        user_id: &UserId,
        order_id: &OrderId,
        confirmation: impl Into<String>,
    ) -> Result<Order> {
        let order = self
            .orders
            .get_mut(user_id)
            .and_then(|orders| orders.iter_mut().find(|o| o.id() == order_id))
            .ok_or_else(|| DomainError::OrderNotFound {
                order_id: order_id.clone(),
            })?;

        order.confirm(confirmation)?;
        Ok(order.clone())
    }

    /// Returns all of the user's orders, newest first.
    pub fn order_history(&self, user_id: &UserId) -> Vec<Order> {
        self.orders
            .get(user_id)
            .map(|orders| orders.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the total number of orders across all users.
    pub fn order_count(&self) -> usize {
        self.orders.values().map(VecDeque::len).sum()
    }
}
