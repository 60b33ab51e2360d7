//! Checkout error types.

use common::OrderId;
use domain::{DomainError, ErrorKind};
use thiserror::Error;

/// Errors returned by the checkout coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A catalog, cart or ledger rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The payment processor declined, failed or timed out.
    ///
    /// The order is left pending and unmodified.
    #[error("Payment failed for order {order_id}: {reason}")]
    PaymentFailed { order_id: OrderId, reason: String },
}

impl CheckoutError {
    /// Returns the caller-facing error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::Domain(e) => e.kind(),
            CheckoutError::PaymentFailed { .. } => ErrorKind::PaymentFailed,
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
