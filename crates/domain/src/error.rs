//! Domain error types.

use common::{OrderId, Sku};
use thiserror::Error;

/// Coarse classification of every failure the core can report.
///
/// Callers translate a kind into a response code; the identifying payload
/// (SKU, order id) travels on the error itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Item, order or cart line is absent.
    NotFound,
    /// Requested quantity exceeds available stock.
    InsufficientStock,
    /// Checkout attempted with no cart lines.
    EmptyCart,
    /// The order already carries a payment confirmation.
    AlreadyConfirmed,
    /// The external payment processor rejected or did not answer.
    PaymentFailed,
    /// An argument was rejected before any state was touched.
    InvalidInput,
    /// The core could not complete an operation for internal reasons.
    Internal,
}

impl ErrorKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::InsufficientStock => "InsufficientStock",
            ErrorKind::EmptyCart => "EmptyCart",
            ErrorKind::AlreadyConfirmed => "AlreadyConfirmed",
            ErrorKind::PaymentFailed => "PaymentFailed",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during catalog, cart and order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The SKU is not in the catalog.
    #[error("Item not found: {sku}")]
    ItemNotFound { sku: Sku },

    /// The cart holds no line for the SKU.
    #[error("Cart line not found: {sku}")]
    LineNotFound { sku: Sku },

    /// The order is not in the user's ledger.
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// Not enough stock to satisfy the request.
    #[error("Insufficient stock for {sku}: requested {requested}, available {available}")]
    InsufficientStock {
        sku: Sku,
        requested: u32,
        available: u32,
    },

    /// Checkout attempted on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// The order's payment confirmation is already set.
    #[error("Order {order_id} is already confirmed")]
    AlreadyConfirmed { order_id: OrderId },

    /// Quantities must be greater than zero.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Adding the quantity would overflow the cart's line or totals.
    #[error("Adding {quantity} of {sku} exceeds the cart's limits")]
    QuantityOverflow { sku: Sku, quantity: u32 },

    /// Prices must not be negative.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: i64 },

    /// The order id source failed to produce an identifier.
    #[error("Unable to generate order id: {0}")]
    IdGeneration(String),
}

impl DomainError {
    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::ItemNotFound { .. }
            | DomainError::LineNotFound { .. }
            | DomainError::OrderNotFound { .. } => ErrorKind::NotFound,
            DomainError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            DomainError::EmptyCart => ErrorKind::EmptyCart,
            DomainError::AlreadyConfirmed { .. } => ErrorKind::AlreadyConfirmed,
            DomainError::InvalidQuantity { .. }
            | DomainError::QuantityOverflow { .. }
            | DomainError::InvalidPrice { .. } => ErrorKind::InvalidInput,
            DomainError::IdGeneration(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
