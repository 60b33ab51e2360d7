//! Per-user shopping cart.

use std::collections::BTreeMap;

use common::{Sku, UserId};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::value_objects::{Item, LineItem, Money};

/// A user's basket of (item, quantity) lines.
///
/// Lines are unique per SKU; repeated adds accumulate. `total_items` and
/// `total_price` are maintained on every mutation and always equal the sums
/// recomputed from the lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    user_id: UserId,
    lines: BTreeMap<Sku, LineItem>,
    total_items: u32,
    total_price: Money,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            lines: BTreeMap::new(),
            total_items: 0,
            total_price: Money::zero(),
        }
    }

    /// Returns the owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns all lines, ordered by SKU.
    pub fn lines(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.values()
    }

    /// Returns the line for a SKU.
    pub fn line(&self, sku: &Sku) -> Option<&LineItem> {
        self.lines.get(sku)
    }

    /// Returns the quantity held for a SKU (zero if absent).
    pub fn quantity_of(&self, sku: &Sku) -> u32 {
        self.lines.get(sku).map_or(0, |line| line.quantity)
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the maintained sum of line quantities.
    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Returns the maintained sum of line totals.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Recomputes the total quantity from the lines.
    pub fn recompute_total_items(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    /// Recomputes the total price from the lines.
    pub fn recompute_total_price(&self) -> Money {
        self.lines.values().map(LineItem::total_price).sum()
    }

    /// Adds `quantity` units of an item.
    ///
    /// Merges into the existing line for the SKU, keeping the snapshot taken
    /// on the first add. Stock is not checked here. Fails with
    /// `QuantityOverflow`, leaving the cart untouched, if the line or either
    /// total would overflow.
    pub fn add(&mut self, item: Item, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }

        let overflow = || DomainError::QuantityOverflow {
            sku: item.sku.clone(),
            quantity,
        };
        let unit_price = self
            .lines
            .get(&item.sku)
            .map_or(item.price, |line| line.item.price);
        let line_quantity = self
            .quantity_of(&item.sku)
            .checked_add(quantity)
            .ok_or_else(overflow)?;
        unit_price
            .checked_multiply(line_quantity)
            .ok_or_else(overflow)?;
        let total_items = self
            .total_items
            .checked_add(quantity)
            .ok_or_else(overflow)?;
        let total_price = unit_price
            .checked_multiply(quantity)
            .and_then(|added| self.total_price.checked_add(added))
            .ok_or_else(overflow)?;

        self.lines
            .entry(item.sku.clone())
            .or_insert_with(|| LineItem::new(item, 0))
            .quantity = line_quantity;
        self.total_items = total_items;
        self.total_price = total_price;
        Ok(())
    }

    /// Removes up to `quantity` units of a SKU and returns how many were removed.
    ///
    /// If the line holds more than `quantity`, it is decremented in place;
    /// otherwise the whole line is dropped. Both totals are reduced by the
    /// quantity actually removed, priced at the line's snapshot price.
    pub fn remove(&mut self, sku: &Sku, quantity: u32) -> Result<u32> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }

        let line = self
            .lines
            .get_mut(sku)
            .ok_or_else(|| DomainError::LineNotFound { sku: sku.clone() })?;

        let removed = quantity.min(line.quantity);
        let unit_price = line.item.price;
        if line.quantity > quantity {
            line.quantity -= quantity;
        } else {
            self.lines.remove(sku);
        }

        self.total_items -= removed;
        self.total_price -= unit_price.multiply(removed);
        Ok(removed)
    }

    /// Empties the cart, keeping its owner.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total_items = 0;
        self.total_price = Money::zero();
    }
}
