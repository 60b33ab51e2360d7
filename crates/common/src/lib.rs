//! Identifier types shared by every layer of the storefront order core.

mod types;

pub use types::{OrderId, Sku, UserId};
