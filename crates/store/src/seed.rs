//! Demo catalog used by the development server and tests.

use domain::{Item, Money};

use crate::{InMemoryStore, Result};

/// Stock given to every demo item.
pub const DEMO_STOCK: u32 = 2;

/// Returns the demo items: `item-1`..`item-3` at 100.00, 200.00 and 300.00.
pub fn demo_items() -> Vec<Item> {
    vec![
        Item::new("item-1", "Item 1", Money::from_dollars(100)),
        Item::new("item-2", "Item 2", Money::from_dollars(200)),
        Item::new("item-3", "Item 3", Money::from_dollars(300)),
    ]
}

/// Lists every demo item in the store with [`DEMO_STOCK`] units each.
pub async fn seed_demo_catalog(store: &InMemoryStore) -> Result<()> {
    for item in demo_items() {
        store.restock(item, DEMO_STOCK).await?;
    }
    tracing::debug!("demo catalog seeded");
    Ok(())
}

impl InMemoryStore {
    /// Creates a store seeded with the demo catalog.
    pub async fn with_demo_catalog() -> Result<Self> {
        let store = Self::new();
        seed_demo_catalog(&store).await?;
        Ok(store)
    }
}
