//! Checkout coordinator driving orders from cart to confirmed payment.

use std::time::Instant;

use common::{OrderId, Sku, UserId};
use domain::{Cart, DomainError, Item, Money, Order};
use store::InMemoryStore;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result};
use crate::payment::{CardDetails, PaymentRequest, PaymentService};

/// Orchestrates catalog, cart and ledger operations for callers.
///
/// All inventory and ledger state lives in the [`InMemoryStore`]; the
/// coordinator adds the payment step, which runs without holding any store
/// lock. Only the final ledger write is serialized.
#[derive(Debug, Clone)]
pub struct CheckoutCoordinator<P>
where
    P: PaymentService,
{
    store: InMemoryStore,
    payment: P,
    config: CheckoutConfig,
}

impl<P> CheckoutCoordinator<P>
where
    P: PaymentService,
{
    /// Creates a coordinator with the default config.
    pub fn new(store: InMemoryStore, payment: P) -> Self {
        Self::with_config(store, payment, CheckoutConfig::default())
    }

    /// Creates a coordinator with an explicit config.
    pub fn with_config(store: InMemoryStore, payment: P, config: CheckoutConfig) -> Self {
        Self {
            store,
            payment,
            config,
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// Returns the active config.
    pub fn config(&self) -> CheckoutConfig {
        self.config
    }

    /// Returns every listed item, sorted by SKU.
    pub async fn list_items(&self) -> Vec<Item> {
        self.store.list_items().await
    }

    /// Returns the item for a SKU.
    pub async fn get_item(&self, sku: &Sku) -> Result<Item> {
        Ok(self.store.get_item(sku).await?)
    }

    /// Adds units of an item to the user's cart, checking current stock.
    pub async fn add_to_cart(&self, user_id: &UserId, sku: &Sku, quantity: u32) -> Result<Cart> {
        Ok(self.store.add_to_cart(user_id, sku, quantity).await?)
    }

    /// Removes up to `quantity` units of a SKU from the user's cart.
    pub async fn remove_from_cart(
        &self,
        user_id: &UserId,
        sku: &Sku,
        quantity: u32,
    ) -> Result<Cart> {
        Ok(self.store.remove_from_cart(user_id, sku, quantity).await?)
    }

    /// Returns a snapshot of the user's cart.
    pub async fn cart(&self, user_id: &UserId) -> Cart {
        self.store.cart(user_id).await
    }

    /// Returns the running total of the user's cart.
    pub async fn cart_total(&self, user_id: &UserId) -> Money {
        self.store.cart_total(user_id).await
    }

    /// Returns the user's orders, newest first.
    pub async fn order_history(&self, user_id: &UserId) -> Vec<Order> {
        self.store.order_history(user_id).await
    }

    /// Turns the user's cart into a PENDING order.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(&self, user_id: &UserId) -> Result<Order> {
        let started = Instant::now();
        let order = self.store.checkout(user_id).await?;
        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        Ok(order)
    }

    /// Pays for a PENDING order and marks it CONFIRMED.
    ///
    /// With no order id (or an empty one) the cart is checked out first and
    /// the fresh order is paid. A confirmed order is rejected with
    /// `AlreadyConfirmed` before the processor is called. If the processor
    /// fails or exceeds the payment timeout, `PaymentFailed` is returned and
    /// the order stays PENDING, so the same order id can be retried.
    #[tracing::instrument(skip(self, card))]
    pub async fn confirm_purchase(
        &self,
        user_id: &UserId,
        order_id: Option<&OrderId>,
        card: &CardDetails,
    ) -> Result<Order> {
        let order = match order_id.filter(|id| !id.is_empty()) {
            Some(order_id) => {
                let order = self.store.find_order(user_id, order_id).await?;
                if order.is_confirmed() {
                    tracing::warn!(%order_id, "order already confirmed");
                    return Err(DomainError::AlreadyConfirmed {
                        order_id: order_id.clone(),
                    }
                    .into());
                }
                order
            }
            None => self.checkout(user_id).await?,
        };

        let request = PaymentRequest::for_order(&order);
        let started = Instant::now();
        let outcome = tokio::time::timeout(
            self.config.payment_timeout,
            self.payment.process_payment(&request, card),
        )
        .await;
        metrics::histogram!("payment_duration_seconds").record(started.elapsed().as_secs_f64());

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => return Err(payment_failed(order.id(), e.to_string())),
            Err(_) => {
                return Err(payment_failed(
                    order.id(),
                    format!(
                        "payment timed out after {}ms",
                        self.config.payment_timeout.as_millis()
                    ),
                ));
            }
        };

        let confirmed = self
            .store
            .confirm_payment(user_id, order.id(), result.confirmation)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "payment confirmation rejected"))?;

        metrics::counter!("payments_confirmed_total").increment(1);
        tracing::info!(
            %user_id,
            order_id = %confirmed.id(),
            amount = %request.amount,
            "payment confirmed"
        );
        Ok(confirmed)
    }
}

fn payment_failed(order_id: &OrderId, reason: String) -> CheckoutError {
    metrics::counter!("payment_failures_total").increment(1);
    tracing::warn!(%order_id, %reason, "payment failed");
    CheckoutError::PaymentFailed {
        order_id: order_id.clone(),
        reason,
    }
}
