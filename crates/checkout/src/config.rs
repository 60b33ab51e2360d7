//! Checkout configuration.

use std::time::Duration;

/// Default upper bound on a single payment call.
pub const DEFAULT_PAYMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for the checkout coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// How long to wait for the payment processor before reporting failure.
    pub payment_timeout: Duration,
}

impl CheckoutConfig {
    /// Returns a config with the given payment timeout.
    pub fn with_payment_timeout(payment_timeout: Duration) -> Self {
        Self { payment_timeout }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            payment_timeout: DEFAULT_PAYMENT_TIMEOUT,
        }
    }
}
