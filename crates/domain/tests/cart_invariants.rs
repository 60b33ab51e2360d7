//! Integration tests for cart totals and order snapshots.
//!
//! These tests drive long mutation sequences through the public API and check
//! that the maintained totals never drift from the line set.

use domain::{
    Cart, Catalog, DomainError, Item, Money, OrderLedger, OrderState, SequentialOrderIds, Sku,
    UserId,
};

fn seeded_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .add_item(Item::new("item-1", "Item 1", Money::from_dollars(100)), 2)
        .unwrap();
    catalog
        .add_item(Item::new("item-2", "Item 2", Money::from_dollars(200)), 2)
        .unwrap();
    catalog
        .add_item(Item::new("item-3", "Item 3", Money::from_cents(29_999)), 2)
        .unwrap();
    catalog
}

fn assert_consistent(cart: &Cart, step: usize) {
    assert_eq!(
        cart.total_price(),
        cart.recompute_total_price(),
        "price drifted after step {step}"
    );
    assert_eq!(
        cart.total_items(),
        cart.recompute_total_items(),
        "item count drifted after step {step}"
    );
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(&'static str, u32),
    Remove(&'static str, u32),
}

#[test]
fn totals_match_recomputation_after_every_mutation() {
    let catalog = seeded_catalog();
    let mut cart = Cart::new(UserId::new("test"));

    let ops = [
        Op::Add("item-1", 1),
        Op::Add("item-2", 3),
        Op::Add("item-1", 4),
        Op::Remove("item-2", 1),
        Op::Add("item-3", 2),
        Op::Remove("item-1", 10),
        Op::Remove("item-3", 2),
        Op::Remove("item-2", 1),
        Op::Add("item-3", 7),
        Op::Remove("item-9", 1),
        Op::Add("item-1", 0),
        Op::Remove("item-2", 5),
    ];

    for (step, op) in ops.iter().enumerate() {
        match *op {
            Op::Add(sku, qty) => {
                let item = catalog.get_item(&Sku::new(sku)).unwrap().clone();
                let _ = cart.add(item, qty);
            }
            Op::Remove(sku, qty) => {
                let _ = cart.remove(&Sku::new(sku), qty);
            }
        }
        assert_consistent(&cart, step);
        assert!(!cart.total_price().is_negative());
    }

    assert_eq!(cart.line_count(), 1);
    assert_eq!(cart.quantity_of(&Sku::new("item-3")), 7);
}

#[test]
fn over_removal_reduces_totals_by_held_quantity() {
    let catalog = seeded_catalog();
    let mut cart = Cart::new(UserId::new("test"));
    let item = catalog.get_item(&Sku::new("item-2")).unwrap().clone();
    cart.add(item, 2).unwrap();

    let removed = cart.remove(&Sku::new("item-2"), 5).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(cart.total_items(), 0);
    assert_eq!(cart.total_price(), Money::zero());
}

#[test]
fn placed_order_ignores_later_price_changes() {
    let mut catalog = seeded_catalog();
    let mut ledger = OrderLedger::new();
    let user = UserId::new("test");
    let mut cart = Cart::new(user.clone());

    let sku = Sku::new("item-2");
    cart.add(catalog.get_item(&sku).unwrap().clone(), 2).unwrap();
    let order = ledger
        .place_order(&user, &cart, &SequentialOrderIds::new())
        .unwrap();

    catalog.update_price(&sku, Money::from_dollars(1)).unwrap();

    let stored = ledger.find_order(&user, order.id()).unwrap();
    assert_eq!(stored.total_price(), Money::from_dollars(400));
    assert_eq!(stored.items()[0].item.price, Money::from_dollars(200));
    assert_eq!(stored.state(), OrderState::Pending);
}

#[test]
fn remove_from_catalog_never_goes_negative() {
    let mut catalog = seeded_catalog();
    let sku = Sku::new("item-1");

    for _ in 0..5 {
        let _ = catalog.remove_item(&sku, 1);
    }

    assert_eq!(catalog.stock_level(&sku), 0);
    assert!(matches!(
        catalog.remove_item(&sku, 1),
        Err(DomainError::InsufficientStock { available: 0, .. })
    ));
}
