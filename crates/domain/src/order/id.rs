//! Order identifier sources.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use common::OrderId;
use rand::{RngCore, rngs::OsRng};

use crate::error::{DomainError, Result};

/// Prefix carried by every order id.
pub const ORDER_ID_PREFIX: &str = "order-";

/// Number of random bytes behind a generated order id.
const ORDER_ID_BYTES: usize = 32;

/// Source of fresh order identifiers.
pub trait OrderIdSource: Send + Sync + std::fmt::Debug {
    /// Returns a new identifier that has not been handed out before.
    fn next_id(&self) -> Result<OrderId>;
}

/// Unguessable ids: 32 bytes from the operating system CSPRNG, base64url encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderIds;

impl RandomOrderIds {
    /// Creates a new random id source.
    pub fn new() -> Self {
        Self
    }
}

impl OrderIdSource for RandomOrderIds {
    fn next_id(&self) -> Result<OrderId> {
        let mut bytes = [0u8; ORDER_ID_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| DomainError::IdGeneration(e.to_string()))?;
        Ok(OrderId::new(format!(
            "{ORDER_ID_PREFIX}{}",
            URL_SAFE.encode(bytes)
        )))
    }
}

/// Deterministic ids (`order-0001`, `order-0002`, ...) for tests.
#[derive(Debug, Default)]
pub struct SequentialOrderIds {
    next: AtomicU64,
}

impl SequentialOrderIds {
    /// Creates a source starting at `order-0001`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderIdSource for SequentialOrderIds {
    fn next_id(&self) -> Result<OrderId> {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(OrderId::new(format!("{ORDER_ID_PREFIX}{n:04}")))
    }
}
