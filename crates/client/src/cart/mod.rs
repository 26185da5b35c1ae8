//! The shopping cart.
//!
//! A [`CartStore`] owns an ordered list of [`CartLine`]s, at most one per
//! product. Every mutation clamps quantities to the product's stock, writes
//! the whole cart to the `flower-shop-cart` storage slot, then publishes the
//! new snapshot to subscribers.
//!
//! # Invariants
//!
//! - No two lines share a product id.
//! - Every quantity is in `1..=product.stock_quantity` as of the mutation
//!   that wrote it; a quantity clamped to zero removes the line.
//!
//! Nothing here returns an error. Unreadable or malformed storage restores as
//! an empty cart, and failed writes are logged; the in-memory cart and the
//! notifications carry on regardless.

mod broadcast;
mod storage;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flower_shop_core::{Product, ProductId};

pub use broadcast::{Broadcast, SubscriptionId};
pub use storage::{FileStorage, MemoryStorage, SlotStorage, StorageError};

/// Storage slot the cart is persisted under.
pub const CART_SLOT: &str = "flower-shop-cart";

/// One product in the cart and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    #[serde(alias = "qty")]
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// Single-owner cart backed by a storage slot.
pub struct CartStore<S: SlotStorage> {
    storage: S,
    channel: Broadcast<Vec<CartLine>>,
}

impl<S: SlotStorage> CartStore<S> {
    /// Restore the cart from `storage`.
    ///
    /// A missing slot gives an empty cart. A slot that cannot be read or
    /// parsed also gives an empty cart, with a warning. Restored lines are
    /// normalized against the invariants.
    pub fn open(storage: S) -> Self {
        let lines = restore(&storage);
        Self {
            storage,
            channel: Broadcast::new(lines),
        }
    }

    /// Add `quantity` units of `product`, clamped to its stock.
    ///
    /// Non-positive quantities are ignored. An existing line takes the new
    /// product snapshot along with the increased quantity.
    pub fn add(&mut self, product: &Product, quantity: i64) {
        if quantity <= 0 {
            return;
        }

        let mut lines = self.lines().to_vec();
        if let Some(pos) = lines.iter().position(|l| l.product.id == product.id) {
            let existing = lines.get(pos).map_or(0, |line| line.quantity);
            let wanted = i64::from(existing).saturating_add(quantity);
            let clamped = clamp(wanted, product.stock_quantity);
            if clamped == 0 {
                lines.remove(pos);
            } else if let Some(line) = lines.get_mut(pos) {
                line.product = product.clone();
                line.quantity = clamped;
            }
        } else {
            let clamped = clamp(quantity, product.stock_quantity);
            if clamped == 0 {
                tracing::debug!(product_id = %product.id, "Out of stock, not added to cart");
                return;
            }
            lines.push(CartLine {
                product: product.clone(),
                quantity: clamped,
            });
        }
        self.commit(lines);
    }

    /// Set the quantity of an existing line, clamped to `0..=stock`.
    ///
    /// Zero removes the line. Unknown products are ignored.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        let mut lines = self.lines().to_vec();
        let Some(pos) = lines.iter().position(|l| l.product.id == product_id) else {
            return;
        };

        let clamped = lines
            .get(pos)
            .map_or(0, |line| clamp(quantity, line.product.stock_quantity));
        if clamped == 0 {
            lines.remove(pos);
        } else if let Some(line) = lines.get_mut(pos) {
            line.quantity = clamped;
        }
        self.commit(lines);
    }

    /// Remove the line for `product_id`.
    ///
    /// Removing a product that is not in the cart still persists and
    /// notifies, so callers can rely on one notification per call.
    pub fn remove(&mut self, product_id: ProductId) {
        let mut lines = self.lines().to_vec();
        lines.retain(|l| l.product.id != product_id);
        self.commit(lines);
    }

    pub fn clear(&mut self) {
        self.commit(Vec::new());
    }

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.channel.current()
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines().iter().find(|l| l.product.id == product_id)
    }

    /// Units of `product_id` in the cart, zero when absent.
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map_or(0, |l| l.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u64 {
        self.lines().iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `quantity * price` over all lines.
    pub fn total_price(&self) -> Decimal {
        self.lines().iter().map(CartLine::line_total).sum()
    }

    /// Receive the current snapshot now and every later one.
    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&[CartLine]) + 'static,
    {
        self.channel.subscribe(move |lines: &Vec<CartLine>| listener(lines))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist, then publish.
    fn commit(&mut self, lines: Vec<CartLine>) {
        match serde_json::to_string(&lines) {
            Ok(json) => {
                if let Err(e) = self.storage.write(CART_SLOT, &json) {
                    tracing::warn!(error = %e, "Failed to save cart");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize cart"),
        }
        self.channel.publish(lines);
    }
}

impl<S: SlotStorage + std::fmt::Debug> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("lines", &self.lines())
            .finish_non_exhaustive()
    }
}

/// Clamp a requested quantity to `0..=stock`.
fn clamp(quantity: i64, stock: u32) -> u32 {
    u32::try_from(quantity.clamp(0, i64::from(stock))).unwrap_or(0)
}

fn restore<S: SlotStorage>(storage: &S) -> Vec<CartLine> {
    let text = match storage.read(CART_SLOT) {
        Ok(Some(text)) => text,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read saved cart, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLine>>(&text) {
        Ok(lines) => {
            let (lines, changed) = normalize(lines);
            if changed > 0 {
                tracing::warn!(changed, "Saved cart contained invalid lines");
            }
            lines
        }
        Err(e) => {
            tracing::warn!(error = %e, "Saved cart is malformed, starting empty");
            Vec::new()
        }
    }
}

/// Drop duplicate products (first wins) and re-clamp quantities to stock.
///
/// Also returns how many lines were dropped or clamped.
fn normalize(lines: Vec<CartLine>) -> (Vec<CartLine>, usize) {
    let mut changed = 0;
    let mut out: Vec<CartLine> = Vec::with_capacity(lines.len());
    for mut line in lines {
        if out.iter().any(|l| l.product.id == line.product.id) {
            changed += 1;
            continue;
        }
        let clamped = line.quantity.min(line.product.stock_quantity);
        if clamped == 0 {
            changed += 1;
            continue;
        }
        if clamped != line.quantity {
            line.quantity = clamped;
            changed += 1;
        }
        out.push(line);
    }
    (out, changed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use flower_shop_core::{CategoryId, Price, ProductType};

    use super::*;

    fn product(id: i32, price: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Price::new(Decimal::from(price)).unwrap(),
            stock_quantity: stock,
            image_url: None,
            category_id: CategoryId::new(1),
            category: None,
            product_type: ProductType::Flower,
        }
    }

    fn empty_store() -> CartStore<MemoryStorage> {
        CartStore::open(MemoryStorage::new())
    }

    fn assert_invariants(store: &CartStore<MemoryStorage>) {
        let lines = store.lines();
        for (i, line) in lines.iter().enumerate() {
            assert!(line.quantity > 0);
            assert!(line.quantity <= line.product.stock_quantity);
            assert!(lines[i + 1..].iter().all(|l| l.product.id != line.product.id));
        }
    }

    #[test]
    fn test_add_to_empty_clamps_to_stock() {
        for (requested, expected) in [(1, 1), (3, 3), (5, 5), (9, 5)] {
            let mut store = empty_store();
            store.add(&product(1, 10, 5), requested);
            assert_eq!(store.lines().len(), 1);
            assert_eq!(store.quantity_of(ProductId::new(1)), expected);
        }
    }

    #[test]
    fn test_add_ignores_non_positive() {
        let mut store = empty_store();
        store.add(&product(1, 10, 5), 0);
        store.add(&product(1, 10, 5), -3);
        assert!(store.is_empty());
        assert!(store.storage().get(CART_SLOT).is_none());
    }

    #[test]
    fn test_add_out_of_stock_creates_no_line() {
        let mut store = empty_store();
        store.add(&product(1, 10, 0), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_merges_and_refreshes_snapshot() {
        let mut store = empty_store();
        store.add(&product(1, 10, 5), 2);

        let mut restocked = product(1, 12, 8);
        restocked.name = "Renamed".to_string();
        store.add(&restocked, 4);

        let line = store.line(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 6);
        assert_eq!(line.product.name, "Renamed");
        assert_eq!(store.lines().len(), 1);
    }

    #[test]
    fn test_set_quantity_clamps_and_is_idempotent() {
        let mut store = empty_store();
        store.add(&product(1, 10, 5), 1);

        store.set_quantity(ProductId::new(1), 50);
        let once = store.lines().to_vec();
        store.set_quantity(ProductId::new(1), 50);

        assert_eq!(store.lines(), once.as_slice());
        assert_eq!(store.quantity_of(ProductId::new(1)), 5);
    }

    #[test]
    fn test_set_quantity_unknown_is_noop() {
        let mut store = empty_store();
        let calls = Rc::new(RefCell::new(0));
        let c = Rc::clone(&calls);
        store.subscribe(move |_| *c.borrow_mut() += 1);

        store.set_quantity(ProductId::new(99), 3);

        assert_eq!(*calls.borrow(), 1);
        assert!(store.storage().get(CART_SLOT).is_none());
    }

    #[test]
    fn test_set_zero_equals_remove() {
        let mut a = empty_store();
        let mut b = empty_store();
        for store in [&mut a, &mut b] {
            store.add(&product(1, 10, 5), 2);
            store.add(&product(2, 3, 9), 4);
        }

        a.set_quantity(ProductId::new(1), 0);
        b.remove(ProductId::new(1));

        assert_eq!(a.lines(), b.lines());
        assert!(a.line(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_negative_set_removes() {
        let mut store = empty_store();
        store.add(&product(1, 10, 5), 2);
        store.set_quantity(ProductId::new(1), -4);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_absent_still_notifies_and_persists() {
        let mut store = empty_store();
        let calls = Rc::new(RefCell::new(0));
        let c = Rc::clone(&calls);
        store.subscribe(move |_| *c.borrow_mut() += 1);

        store.remove(ProductId::new(42));

        assert_eq!(*calls.borrow(), 2);
        assert_eq!(store.storage().get(CART_SLOT), Some("[]"));
    }

    #[test]
    fn test_totals() {
        let mut store = empty_store();
        store.add(&product(1, 10, 5), 2);
        store.add(&product(2, 3, 9), 4);
        assert_eq!(store.total_items(), 6);
        assert_eq!(store.total_price(), Decimal::from(32));

        store.clear();
        assert_eq!(store.total_items(), 0);
        assert_eq!(store.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let a = product(1, 10, 5);
        let mut store = empty_store();

        store.add(&a, 3);
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.quantity_of(a.id), 3);
        assert_eq!(store.total_price(), Decimal::from(30));

        store.add(&a, 4);
        assert_eq!(store.quantity_of(a.id), 5);
        assert_eq!(store.total_price(), Decimal::from(50));

        store.remove(ProductId::new(1));
        assert!(store.is_empty());
        assert_eq!(store.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_invariants_hold_over_mixed_operations() {
        let products = [product(1, 10, 5), product(2, 4, 1), product(3, 7, 12)];
        let mut store = empty_store();

        let ops: [(usize, i64, u8); 12] = [
            (0, 3, 0),
            (1, 2, 0),
            (2, 20, 0),
            (0, 9, 0),
            (1, -1, 1),
            (2, 4, 1),
            (0, 0, 1),
            (1, 1, 0),
            (2, 0, 2),
            (0, 2, 0),
            (2, 13, 0),
            (1, 5, 1),
        ];
        for (idx, qty, op) in ops {
            let p = &products[idx];
            match op {
                0 => store.add(p, qty),
                1 => store.set_quantity(p.id, qty),
                _ => store.remove(p.id),
            }
            assert_invariants(&store);
            let expected: u64 = store.lines().iter().map(|l| u64::from(l.quantity)).sum();
            assert_eq!(store.total_items(), expected);
        }
    }

    #[test]
    fn test_subscriber_sees_snapshots_in_order() {
        let mut store = empty_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |lines| {
            sink.borrow_mut()
                .push(lines.iter().map(|l| l.quantity).sum::<u32>());
        });

        store.add(&product(1, 10, 5), 2);
        store.add(&product(1, 10, 5), 1);
        store.clear();

        assert_eq!(*seen.borrow(), vec![0, 2, 3, 0]);
    }

    #[test]
    fn test_late_subscriber_gets_latest() {
        let mut store = empty_store();
        store.add(&product(1, 10, 5), 4);

        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        store.subscribe(move |lines| *sink.borrow_mut() = Some(lines.len()));

        assert_eq!(*seen.borrow(), Some(1));
    }

    #[test]
    fn test_persists_after_every_mutation() {
        let mut store = empty_store();
        store.add(&product(1, 10, 5), 2);

        let saved = store.storage().get(CART_SLOT).unwrap();
        let lines: Vec<CartLine> = serde_json::from_str(saved).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);

        let reopened = CartStore::open(store.storage().clone());
        assert_eq!(reopened.lines(), store.lines());
    }

    #[test]
    fn test_corrupt_storage_restores_empty() {
        for garbage in ["{not json", "42", r#"[{"product": {}, "quantity": 1}]"#, ""] {
            let storage = MemoryStorage::new().with_slot(CART_SLOT, garbage);
            let store = CartStore::open(storage);
            assert_eq!(store.total_items(), 0);
        }
    }

    #[test]
    fn test_restore_normalizes_lines() {
        let p = product(1, 10, 2);
        let lines = vec![
            CartLine { product: p.clone(), quantity: 7 },
            CartLine { product: p, quantity: 1 },
            CartLine { product: product(2, 1, 3), quantity: 0 },
        ];
        let storage =
            MemoryStorage::new().with_slot(CART_SLOT, &serde_json::to_string(&lines).unwrap());

        let store = CartStore::open(storage);

        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.quantity_of(ProductId::new(1)), 2);
    }

    #[test]
    fn test_normalize_counts_clamped_lines() {
        let lines = vec![
            CartLine { product: product(1, 10, 2), quantity: 5 },
            CartLine { product: product(2, 10, 9), quantity: 3 },
        ];

        let (lines, changed) = normalize(lines);

        assert_eq!(changed, 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].quantity, 3);
    }

    #[test]
    fn test_normalize_valid_cart_is_unchanged() {
        let lines = vec![CartLine { product: product(1, 10, 4), quantity: 4 }];
        let (out, changed) = normalize(lines.clone());
        assert_eq!(changed, 0);
        assert_eq!(out, lines);
    }

    #[test]
    fn test_add_to_line_whose_product_sold_out_drops_it() {
        let mut store = empty_store();
        store.add(&product(1, 10, 5), 2);
        store.add(&product(1, 10, 0), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_accepts_legacy_qty_field() {
        let legacy = r#"[{"product":{"id":5,"name":"Tulip Mix","price":6.5,"stockQty":150,"categoryId":1},"qty":3}]"#;
        let store = CartStore::open(MemoryStorage::new().with_slot(CART_SLOT, legacy));
        assert_eq!(store.quantity_of(ProductId::new(5)), 3);
        assert_eq!(store.total_price(), Decimal::new(195, 1));
    }
}
