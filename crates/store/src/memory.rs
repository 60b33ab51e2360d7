use std::collections::HashMap;
use std::sync::Arc;

use domain::{
    Cart, Catalog, DomainError, Item, LineItem, Money, Order, OrderIdSource, OrderLedger,
    RandomOrderIds,
};
use tokio::sync::{Mutex, RwLock};

use crate::{OrderId, Result, Sku, UserId};

/// In-memory store for the catalog, carts and orders.
///
/// Each datastore sits behind its own lock. Operations that need more than
/// one lock always acquire them in the order carts, catalog, ledger, so
/// concurrent callers cannot deadlock.
#[derive(Clone)]
pub struct InMemoryStore {
    carts: Arc<Mutex<HashMap<UserId, Cart>>>,
    catalog: Arc<RwLock<Catalog>>,
    ledger: Arc<RwLock<OrderLedger>>,
    ids: Arc<dyn OrderIdSource>,
}

impl InMemoryStore {
    /// Creates an empty store issuing random order ids.
    pub fn new() -> Self {
        Self::with_id_source(Arc::new(RandomOrderIds::new()))
    }

    /// Creates an empty store issuing ids from the given source.
    pub fn with_id_source(ids: Arc<dyn OrderIdSource>) -> Self {
        Self {
            carts: Arc::new(Mutex::new(HashMap::new())),
            catalog: Arc::new(RwLock::new(Catalog::new())),
            ledger: Arc::new(RwLock::new(OrderLedger::new())),
            ids,
        }
    }

    // -- Catalog --

    /// Returns a snapshot of all items.
    pub async fn list_items(&self) -> Vec<Item> {
        self.catalog.read().await.list_items()
    }

    /// Returns the item for a SKU.
    pub async fn get_item(&self, sku: &Sku) -> Result<Item> {
        self.catalog.read().await.get_item(sku).cloned()
    }

    /// Returns the quantity in stock for a SKU.
    pub async fn stock_level(&self, sku: &Sku) -> u32 {
        self.catalog.read().await.stock_level(sku)
    }

    /// Lists an item (first write wins) and adds `quantity` to its stock.
    #[tracing::instrument(skip(self, item), fields(sku = %item.sku))]
    pub async fn restock(&self, item: Item, quantity: u32) -> Result<()> {
        self.catalog.write().await.add_item(item, quantity)
    }

    /// Takes `quantity` units of a SKU out of stock.
    #[tracing::instrument(skip(self))]
    pub async fn withdraw(&self, sku: &Sku, quantity: u32) -> Result<()> {
        self.catalog.write().await.remove_item(sku, quantity)
    }

    /// Changes an item's listed price.
    #[tracing::instrument(skip(self))]
    pub async fn update_price(&self, sku: &Sku, price: Money) -> Result<()> {
        self.catalog.write().await.update_price(sku, price)
    }

    // -- Carts --

    /// Returns a snapshot of the user's cart, creating an empty one if needed.
    pub async fn cart(&self, user_id: &UserId) -> Cart {
        let mut carts = self.carts.lock().await;
        get_or_create(&mut carts, user_id).clone()
    }

    /// Returns the running total of the user's cart.
    pub async fn cart_total(&self, user_id: &UserId) -> Money {
        let mut carts = self.carts.lock().await;
        get_or_create(&mut carts, user_id).total_price()
    }

    /// Adds `quantity` units of a catalog item to the user's cart.
    ///
    /// The item snapshot is taken from the catalog now. The request is
    /// rejected if the cart would then hold more units than are in stock;
    /// nothing is held back, checkout validates again.
    #[tracing::instrument(skip(self))]
    pub async fn add_to_cart(&self, user_id: &UserId, sku: &Sku, quantity: u32) -> Result<Cart> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }

        let mut carts = self.carts.lock().await;
        let catalog = self.catalog.read().await;

        let item = catalog.get_item(sku)?.clone();
        let cart = get_or_create(&mut carts, user_id);
        let wanted = cart.quantity_of(sku).saturating_add(quantity);
        if let Err(e) = catalog.ensure_available(sku, wanted) {
            tracing::warn!(%user_id, %sku, wanted, "add to cart rejected");
            return Err(e);
        }

        cart.add(item, quantity)?;
        Ok(cart.clone())
    }

    /// Removes up to `quantity` units of a SKU from the user's cart.
    #[tracing::instrument(skip(self))]
    pub async fn remove_from_cart(
        &self,
        user_id: &UserId,
        sku: &Sku,
        quantity: u32,
    ) -> Result<Cart> {
        let mut carts = self.carts.lock().await;
        let cart = get_or_create(&mut carts, user_id);
        cart.remove(sku, quantity)?;
        Ok(cart.clone())
    }

    // -- Checkout --

    /// Converts the user's cart into a pending order.
    ///
    /// Under all three locks: re-validates stock for every line, debits it,
    /// records the order and clears the cart. Either every step happens or
    /// none does.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(&self, user_id: &UserId) -> Result<Order> {
        let mut carts = self.carts.lock().await;
        let cart = get_or_create(&mut carts, user_id);
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }
        let lines: Vec<LineItem> = cart.lines().cloned().collect();

        let mut catalog = self.catalog.write().await;
        if let Err(e) = catalog.debit_all(&lines) {
            metrics::counter!("checkout_rejected_total").increment(1);
            tracing::warn!(%user_id, error = %e, "checkout rejected");
            return Err(e);
        }

        let mut ledger = self.ledger.write().await;
        let order = match ledger.place_order(user_id, cart, self.ids.as_ref()) {
            Ok(order) => order,
            Err(e) => {
                catalog.restore_all(&lines);
                return Err(e);
            }
        };
        cart.clear();

        metrics::counter!("checkouts_total").increment(1);
        tracing::info!(
            %user_id,
            order_id = %order.id(),
            total = %order.total_price(),
            "order placed"
        );
        Ok(order)
    }

    // -- Orders --

    /// Looks up one of the user's orders.
    pub async fn find_order(&self, user_id: &UserId, order_id: &OrderId) -> Result<Order> {
        self.ledger
            .read()
            .await
            .find_order(user_id, order_id)
            .cloned()
    }

    /// Records a payment confirmation on a pending order.
    ///
    /// Concurrent confirmations of the same order are serialized by the ledger
    /// lock; exactly one succeeds and the rest fail with `AlreadyConfirmed`.
    #[tracing::instrument(skip(self, confirmation))]
    pub async fn confirm_payment(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
        confirmation: String,
    ) -> Result<Order> {
        self.ledger
            .write()
            .await
            .confirm_payment(user_id, order_id, confirmation)
    }

    /// Returns the user's orders, newest first.
    pub async fn order_history(&self, user_id: &UserId) -> Vec<Order> {
        self.ledger.read().await.order_history(user_id)
    }

    /// Returns the number of orders across all users.
    pub async fn order_count(&self) -> usize {
        self.ledger.read().await.order_count()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

fn get_or_create<'a>(carts: &'a mut HashMap<UserId, Cart>, user_id: &UserId) -> &'a mut Cart {
    carts
        .entry(user_id.clone())
        .or_insert_with(|| Cart::new(user_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{OrderState, SequentialOrderIds};

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::with_id_source(Arc::new(SequentialOrderIds::new()));
        store
            .restock(Item::new("item-1", "Item 1", Money::from_dollars(100)), 2)
            .await
            .unwrap();
        store
            .restock(Item::new("item-2", "Item 2", Money::from_dollars(200)), 2)
            .await
            .unwrap();
        store
    }

    fn user() -> UserId {
        UserId::new("test")
    }

    #[tokio::test]
    async fn cart_is_created_on_first_access() {
        let store = seeded().await;
        let cart = store.cart(&user()).await;
        assert!(cart.is_empty());
        assert_eq!(store.cart_total(&user()).await, Money::zero());
    }

    #[tokio::test]
    async fn add_to_cart_snapshots_catalog_item() {
        let store = seeded().await;
        let cart = store
            .add_to_cart(&user(), &Sku::new("item-2"), 2)
            .await
            .unwrap();

        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Money::from_dollars(400));
        assert_eq!(store.stock_level(&Sku::new("item-2")).await, 2);
    }

    #[tokio::test]
    async fn add_to_cart_unknown_sku() {
        let store = seeded().await;
        let err = store
            .add_to_cart(&user(), &Sku::new("item-9"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ItemNotFound { .. }));
    }

    #[tokio::test]
    async fn add_to_cart_counts_what_is_already_held() {
        let store = seeded().await;
        let sku = Sku::new("item-1");
        store.add_to_cart(&user(), &sku, 2).await.unwrap();

        let err = store.add_to_cart(&user(), &sku, 1).await.unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                sku: sku.clone(),
                requested: 3,
                available: 2,
            }
        );
        assert_eq!(store.cart(&user()).await.quantity_of(&sku), 2);
    }

    #[tokio::test]
    async fn add_zero_is_invalid() {
        let store = seeded().await;
        let err = store
            .add_to_cart(&user(), &Sku::new("item-1"), 0)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), domain::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn remove_from_cart_missing_line() {
        let store = seeded().await;
        let err = store
            .remove_from_cart(&user(), &Sku::new("item-1"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::LineNotFound { .. }));
    }

    #[tokio::test]
    async fn checkout_debits_stock_and_clears_cart() {
        let store = seeded().await;
        store
            .add_to_cart(&user(), &Sku::new("item-2"), 2)
            .await
            .unwrap();

        let order = store.checkout(&user()).await.unwrap();

        assert_eq!(order.id().as_str(), "order-0001");
        assert_eq!(order.state(), OrderState::Pending);
        assert_eq!(order.total_price(), Money::from_dollars(400));
        assert_eq!(store.stock_level(&Sku::new("item-2")).await, 0);
        assert!(store.cart(&user()).await.is_empty());
        assert_eq!(store.order_history(&user()).await.len(), 1);
    }

    #[tokio::test]
    async fn checkout_empty_cart() {
        let store = seeded().await;
        let err = store.checkout(&user()).await.unwrap_err();
        assert_eq!(err, DomainError::EmptyCart);
    }

    #[tokio::test]
    async fn checkout_revalidates_stock() {
        let store = seeded().await;
        store
            .add_to_cart(&user(), &Sku::new("item-1"), 1)
            .await
            .unwrap();
        store
            .add_to_cart(&user(), &Sku::new("item-2"), 2)
            .await
            .unwrap();
        store.withdraw(&Sku::new("item-2"), 1).await.unwrap();

        let err = store.checkout(&user()).await.unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { ref sku, .. } if sku.as_str() == "item-2"));

        // Nothing debited, cart untouched
        assert_eq!(store.stock_level(&Sku::new("item-1")).await, 2);
        assert_eq!(store.stock_level(&Sku::new("item-2")).await, 1);
        assert_eq!(store.cart(&user()).await.line_count(), 2);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn confirm_payment_once() {
        let store = seeded().await;
        store
            .add_to_cart(&user(), &Sku::new("item-1"), 1)
            .await
            .unwrap();
        let order = store.checkout(&user()).await.unwrap();

        let confirmed = store
            .confirm_payment(&user(), order.id(), "PAY-0001".to_string())
            .await
            .unwrap();
        assert_eq!(confirmed.state(), OrderState::Confirmed);

        let err = store
            .confirm_payment(&user(), order.id(), "PAY-0002".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyConfirmed { .. }));
    }

    #[tokio::test]
    async fn find_order_of_other_user() {
        let store = seeded().await;
        store
            .add_to_cart(&user(), &Sku::new("item-1"), 1)
            .await
            .unwrap();
        let order = store.checkout(&user()).await.unwrap();

        let err = store
            .find_order(&UserId::new("admin"), order.id())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), domain::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = seeded().await;
        let other = store.clone();
        other
            .add_to_cart(&user(), &Sku::new("item-1"), 1)
            .await
            .unwrap();
        assert_eq!(store.cart(&user()).await.total_items(), 1);
    }

    #[tokio::test]
    async fn add_rejects_price_overflow_without_touching_cart() {
        let store = InMemoryStore::new();
        store
            .restock(Item::new("a", "A", Money::from_cents(i64::MAX / 2)), 3)
            .await
            .unwrap();

        let err = store
            .add_to_cart(&user(), &Sku::new("a"), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::QuantityOverflow { .. }));
        assert_eq!(err.kind(), domain::ErrorKind::InvalidInput);
        assert!(store.cart(&user()).await.is_empty());
        assert_eq!(store.stock_level(&Sku::new("a")).await, 3);
    }

    #[tokio::test]
    async fn add_rejects_item_count_overflow_without_touching_cart() {
        let store = InMemoryStore::new();
        store
            .restock(Item::new("a", "A", Money::zero()), u32::MAX)
            .await
            .unwrap();
        store
            .restock(Item::new("b", "B", Money::from_cents(1)), 1)
            .await
            .unwrap();
        store
            .add_to_cart(&user(), &Sku::new("a"), u32::MAX)
            .await
            .unwrap();

        let err = store
            .add_to_cart(&user(), &Sku::new("b"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::QuantityOverflow { .. }));

        let cart = store.cart(&user()).await;
        assert_eq!(cart.total_items(), u32::MAX);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_price(), Money::zero());
    }
}
