//! Checkout coordination for the storefront order core.
//!
//! Orders move through two states:
//! 1. `checkout` turns a cart into a PENDING order, debiting stock
//! 2. `confirm_purchase` charges the external payment processor and records
//!    the confirmation, making the order CONFIRMED
//!
//! A failed or timed-out payment leaves the order PENDING and untouched, so
//! the caller may retry with the same order id. A confirmed order can never
//! be paid again.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod payment;

pub use config::CheckoutConfig;
pub use coordinator::CheckoutCoordinator;
pub use error::{CheckoutError, Result};
pub use payment::{
    CardDetails, InMemoryPaymentService, PaymentError, PaymentRequest, PaymentResult,
    PaymentService,
};
