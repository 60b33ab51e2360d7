//! Concurrency properties of the in-memory store.
//!
//! Every test runs on a multi-threaded runtime and races real tasks against
//! the same store.

use std::sync::Arc;

use domain::{DomainError, Item, Money, SequentialOrderIds};
use futures_util::future::join_all;
use store::{InMemoryStore, Sku, UserId};

async fn store_with(sku: &str, stock: u32) -> InMemoryStore {
    let store = InMemoryStore::with_id_source(Arc::new(SequentialOrderIds::new()));
    store
        .restock(Item::new(sku, "Contested", Money::from_dollars(10)), stock)
        .await
        .unwrap();
    store
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn contested_checkouts_never_oversell() {
    let sku = Sku::new("item-hot");
    let store = store_with("item-hot", 3).await;

    // Ten users each hold 2 units; only one checkout can be satisfied.
    let users: Vec<UserId> = (0..10).map(|n| UserId::new(format!("user-{n}"))).collect();
    for user in &users {
        store.add_to_cart(user, &sku, 2).await.unwrap();
    }

    let tasks = users.iter().cloned().map(|user| {
        let store = store.clone();
        tokio::spawn(async move { store.checkout(&user).await })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    for result in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(result, DomainError::InsufficientStock { .. }));
    }
    assert_eq!(store.stock_level(&sku).await, 1);
    assert_eq!(store.order_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stock_debits_sum_to_what_was_sold() {
    let sku = Sku::new("item-bulk");
    let store = store_with("item-bulk", 25).await;

    let users: Vec<UserId> = (0..40).map(|n| UserId::new(format!("user-{n}"))).collect();
    for user in &users {
        store.add_to_cart(user, &sku, 1).await.unwrap();
    }

    let tasks = users.iter().cloned().map(|user| {
        let store = store.clone();
        tokio::spawn(async move { store.checkout(&user).await })
    });
    let succeeded = join_all(tasks)
        .await
        .into_iter()
        .filter(|joined| matches!(joined, Ok(Ok(_))))
        .count();

    assert_eq!(succeeded, 25);
    assert_eq!(store.stock_level(&sku).await, 0);
    assert_eq!(store.order_count().await, 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_confirmations_succeed_once() {
    let sku = Sku::new("item-1");
    let store = store_with("item-1", 1).await;
    let user = UserId::new("test");
    store.add_to_cart(&user, &sku, 1).await.unwrap();
    let order = store.checkout(&user).await.unwrap();

    let tasks = (0..8).map(|n| {
        let store = store.clone();
        let user = user.clone();
        let order_id = order.id().clone();
        tokio::spawn(async move {
            store
                .confirm_payment(&user, &order_id, format!("PAY-{n}"))
                .await
        })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    let confirmation = winners[0].payment_confirmation().unwrap().to_string();
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, DomainError::AlreadyConfirmed { .. }))
    );

    let stored = store.find_order(&user, order.id()).await.unwrap();
    assert_eq!(stored.payment_confirmation(), Some(confirmation.as_str()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_to_one_cart_keep_totals_exact() {
    let sku = Sku::new("item-1");
    let store = store_with("item-1", 100).await;
    let user = UserId::new("test");

    let tasks = (0..50).map(|_| {
        let store = store.clone();
        let user = user.clone();
        let sku = sku.clone();
        tokio::spawn(async move { store.add_to_cart(&user, &sku, 1).await })
    });
    for joined in join_all(tasks).await {
        joined.unwrap().unwrap();
    }

    let cart = store.cart(&user).await;
    assert_eq!(cart.total_items(), 50);
    assert_eq!(cart.total_price(), cart.recompute_total_price());
    assert_eq!(cart.total_price(), Money::from_dollars(500));
}
