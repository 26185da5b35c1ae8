//! File-backed cart tests.
//!
//! These exercise the cart the way the CLI uses it: one process writes the
//! slot, a later process reopens it.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use flower_shop_client::{CART_SLOT, CartStore, FileStorage};
use flower_shop_core::{CategoryId, Price, Product, ProductId, ProductType};
use rust_decimal::Decimal;

fn product(id: i32, cents: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: None,
        price: Price::new(Decimal::new(cents, 2)).expect("valid price"),
        stock_quantity: stock,
        image_url: None,
        category_id: CategoryId::new(1),
        category: None,
        product_type: ProductType::Flower,
    }
}

#[test]
fn test_cart_round_trips_through_data_dir() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut cart = CartStore::open(FileStorage::new(dir.path()));
    cart.add(&product(1, 4599, 50), 2);
    cart.add(&product(2, 2899, 3), 10);
    drop(cart);

    let cart = CartStore::open(FileStorage::new(dir.path()));
    assert_eq!(cart.quantity_of(ProductId::new(1)), 2);
    assert_eq!(cart.quantity_of(ProductId::new(2)), 3);
    assert_eq!(cart.total_items(), 5);
    assert_eq!(cart.total_price(), Decimal::new(17_895, 2));
}

#[test]
fn test_slot_file_is_plain_json() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut cart = CartStore::open(FileStorage::new(dir.path()));
    cart.add(&product(7, 1000, 5), 1);

    let path = dir.path().join(format!("{CART_SLOT}.json"));
    let raw = fs::read_to_string(path).expect("slot written");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

    assert_eq!(value[0]["quantity"], 1);
    assert_eq!(value[0]["product"]["id"], 7);
}

#[test]
fn test_corrupt_slot_starts_empty_and_recovers() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(format!("{CART_SLOT}.json")), "{{not json").expect("write");

    let mut cart = CartStore::open(FileStorage::new(dir.path()));
    assert!(cart.is_empty());

    cart.add(&product(3, 500, 5), 1);
    drop(cart);

    let cart = CartStore::open(FileStorage::new(dir.path()));
    assert_eq!(cart.quantity_of(ProductId::new(3)), 1);
}

#[test]
fn test_listener_sees_every_persisted_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mut cart = CartStore::open(FileStorage::new(dir.path()));
    let sink = Rc::clone(&seen);
    cart.subscribe(move |lines| {
        sink.borrow_mut()
            .push(lines.iter().map(|l| l.quantity).sum::<u32>());
    });

    cart.add(&product(1, 100, 10), 4);
    cart.set_quantity(ProductId::new(1), 2);
    cart.clear();

    assert_eq!(*seen.borrow(), vec![0, 4, 2, 0]);
}
