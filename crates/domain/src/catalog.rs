//! Catalog of purchasable items and their stock levels.

use std::collections::HashMap;

use common::Sku;

use crate::error::{DomainError, Result};
use crate::value_objects::{Item, LineItem, Money};

/// Purchasable items and the in-stock quantity per item.
///
/// Stock is held as an unsigned count and is only ever decremented after a
/// successful availability check, so it can never go negative. The catalog
/// performs no locking; callers serialize access.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<Sku, Item>,
    stock: HashMap<Sku, u32>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all known items, sorted by SKU.
    pub fn list_items(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.items.values().cloned().collect();
        items.sort_by(|a, b| a.sku.cmp(&b.sku));
        items
    }

    /// Returns the item for a SKU.
    pub fn get_item(&self, sku: &Sku) -> Result<&Item> {
        self.items
            .get(sku)
            .ok_or_else(|| DomainError::ItemNotFound { sku: sku.clone() })
    }

    /// Returns true if the SKU is known.
    pub fn contains(&self, sku: &Sku) -> bool {
        self.items.contains_key(sku)
    }

    /// Returns the quantity currently in stock (zero for unknown SKUs).
    pub fn stock_level(&self, sku: &Sku) -> u32 {
        self.stock.get(sku).copied().unwrap_or(0)
    }

    /// Returns the number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the catalog lists no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Upserts item metadata and adds `quantity` to its stock.
    ///
    /// Metadata is first-write-wins: re-adding a known SKU only restocks it.
    pub fn add_item(&mut self, item: Item, quantity: u32) -> Result<()> {
        if item.price.is_negative() {
            return Err(DomainError::InvalidPrice {
                price: item.price.cents(),
            });
        }

        let sku = item.sku.clone();
        self.items.entry(sku.clone()).or_insert(item);
        let level = self.stock.entry(sku).or_insert(0);
        *level = level.saturating_add(quantity);
        Ok(())
    }

    /// Checks that `quantity` units of the SKU are in stock.
    pub fn ensure_available(&self, sku: &Sku, quantity: u32) -> Result<()> {
        if !self.contains(sku) {
            return Err(DomainError::ItemNotFound { sku: sku.clone() });
        }
        let available = self.stock_level(sku);
        if quantity > available {
            return Err(DomainError::InsufficientStock {
                sku: sku.clone(),
                requested: quantity,
                available,
            });
        }
        Ok(())
    }

    /// Removes `quantity` units of the SKU from stock.
    pub fn remove_item(&mut self, sku: &Sku, quantity: u32) -> Result<()> {
        self.ensure_available(sku, quantity)?;
        if let Some(level) = self.stock.get_mut(sku) {
            *level -= quantity;
        }
        Ok(())
    }

    /// Debits stock for every line, or for none of them.
    ///
    /// All lines are validated first; the first line that cannot be satisfied
    /// is reported and stock is left untouched.
    pub fn debit_all(&mut self, lines: &[LineItem]) -> Result<()> {
        for line in lines {
            self.ensure_available(line.sku(), line.quantity)?;
        }
        for line in lines {
            if let Some(level) = self.stock.get_mut(line.sku()) {
                *level -= line.quantity;
            }
        }
        Ok(())
    }

    /// Returns previously debited quantities to stock.
    pub fn restore_all(&mut self, lines: &[LineItem]) {
        for line in lines {
            if let Some(level) = self.stock.get_mut(line.sku()) {
                *level = level.saturating_add(line.quantity);
            }
        }
    }

    /// Changes the unit price of a listed item.
    ///
    /// Existing cart lines and placed orders keep the price they captured.
    pub fn update_price(&mut self, sku: &Sku, price: Money) -> Result<()> {
        if price.is_negative() {
            return Err(DomainError::InvalidPrice {
                price: price.cents(),
            });
        }
        let item = self
            .items
            .get_mut(sku)
            .ok_or_else(|| DomainError::ItemNotFound { sku: sku.clone() })?;
        item.price = price;
        Ok(())
    }
}
