//! In-memory authority over inventory, carts and orders.
//!
//! [`InMemoryStore`] owns the catalog, every user's cart and the order ledger
//! behind interior locks and exposes them only through operation contracts.
//! The checkout critical section (validate stock, debit, place the order,
//! clear the cart) runs under all three locks at once.

pub mod memory;
pub mod seed;

pub use common::{OrderId, Sku, UserId};
pub use domain::{DomainError, ErrorKind};
pub use memory::InMemoryStore;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, DomainError>;
