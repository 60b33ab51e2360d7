//! Domain layer for the storefront order core.
//!
//! This crate holds the entities and their invariants, with no locking and
//! no I/O:
//! - [`Catalog`]: purchasable items and their stock levels
//! - [`Cart`]: a per-user basket with incrementally maintained totals
//! - [`Order`] and [`OrderLedger`]: placed orders and their payment state
//! - [`OrderIdSource`]: pluggable generation of unguessable order ids
//!
//! Serializing access across callers is the job of the `store` crate.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod order;
pub mod value_objects;

pub use cart::Cart;
pub use catalog::Catalog;
pub use common::{OrderId, Sku, UserId};
pub use error::{DomainError, ErrorKind};
pub use order::{
    ORDER_ID_PREFIX, Order, OrderIdSource, OrderLedger, OrderState, RandomOrderIds,
    SequentialOrderIds,
};
pub use value_objects::{Item, LineItem, Money};
