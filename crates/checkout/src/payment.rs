//! Payment processor trait and in-memory implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Money, Order};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A charge request sent to the payment processor.
///
/// `id` is the order id and doubles as the idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub id: OrderId,
    pub user_id: UserId,
    pub amount: Money,
}

impl PaymentRequest {
    /// Builds a request for the order's exact total.
    pub fn for_order(order: &Order) -> Self {
        Self {
            id: order.id().clone(),
            user_id: order.user_id().clone(),
            amount: order.total_price(),
        }
    }
}

/// Card details supplied by the buyer.
///
/// Passed through to the processor and never stored. `Debug` masks the card
/// number and CVV.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "credit_card_number")]
    pub number: String,
    #[serde(rename = "credit_card_expiration")]
    pub expiration: String,
    #[serde(rename = "credit_card_cvv")]
    pub cvv: String,
}

impl CardDetails {
    /// Returns the last four digits of the card number.
    pub fn last_four(&self) -> &str {
        let start = self.number.len().saturating_sub(4);
        self.number.get(start..).unwrap_or("")
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("number", &format_args!("****{}", self.last_four()))
            .field("expiration", &self.expiration)
            .field("cvv", &"***")
            .finish()
    }
}

/// Result of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    /// Confirmation identifier assigned by the processor.
    pub confirmation: String,
}

/// Errors reported by a payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The charge was refused.
    #[error("Payment declined: {0}")]
    Declined(String),

    /// The processor could not be reached or failed internally.
    #[error("Payment service unavailable: {0}")]
    Unavailable(String),
}

/// External payment processor.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Charges `request.amount` to the card.
    ///
    /// Implementations should deduplicate retried calls with the same
    /// `request.id`; the checkout flow does not rely on it.
    async fn process_payment(
        &self,
        request: &PaymentRequest,
        card: &CardDetails,
    ) -> Result<PaymentResult, PaymentError>;
}

#[async_trait]
impl<T: PaymentService + ?Sized> PaymentService for Arc<T> {
    async fn process_payment(
        &self,
        request: &PaymentRequest,
        card: &CardDetails,
    ) -> Result<PaymentResult, PaymentError> {
        (**self).process_payment(request, card).await
    }
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    charges: HashMap<OrderId, (String, PaymentRequest)>,
    next_id: u32,
    calls: usize,
    fail_on_charge: bool,
    latency: Option<Duration>,
}

/// In-memory payment processor for tests and local runs.
///
/// Confirmations are `PAY-0001`, `PAY-0002`, ... A retried idempotency key
/// returns the confirmation of the first successful charge.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentService {
    state: Arc<Mutex<InMemoryPaymentState>>,
}

impl InMemoryPaymentService {
    /// Creates a new in-memory payment service.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryPaymentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configures the service to decline every charge while set.
    pub fn set_fail_on_charge(&self, fail: bool) {
        self.state().fail_on_charge = fail;
    }

    /// Delays every charge by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state().latency = latency;
    }

    /// Returns the number of distinct orders charged.
    pub fn payment_count(&self) -> usize {
        self.state().charges.len()
    }

    /// Returns the number of `process_payment` calls, including failures.
    pub fn call_count(&self) -> usize {
        self.state().calls
    }

    /// Returns the amount charged for an order, if any.
    pub fn charged_amount(&self, order_id: &OrderId) -> Option<Money> {
        self.state()
            .charges
            .get(order_id)
            .map(|(_, request)| request.amount)
    }
}

#[async_trait]
impl PaymentService for InMemoryPaymentService {
    async fn process_payment(
        &self,
        request: &PaymentRequest,
        card: &CardDetails,
    ) -> Result<PaymentResult, PaymentError> {
        let latency = {
            let mut state = self.state();
            state.calls += 1;
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state();
        if state.fail_on_charge {
            return Err(PaymentError::Declined(format!(
                "card ending {} declined",
                card.last_four()
            )));
        }

        if let Some((confirmation, _)) = state.charges.get(&request.id) {
            return Ok(PaymentResult {
                confirmation: confirmation.clone(),
            });
        }

        state.next_id += 1;
        let confirmation = format!("PAY-{:04}", state.next_id);
        state
            .charges
            .insert(request.id.clone(), (confirmation.clone(), request.clone()));

        Ok(PaymentResult { confirmation })
    }
}
