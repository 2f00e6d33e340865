//! The shopping cart list.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use electro_core::ProductId;

use crate::storage::Storage;

/// Storage key for the cart list.
const STORAGE_KEY: &str = "cart";

/// One cart line: a product snapshot plus a mutable quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product this line refers to.
    pub id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price at the time it was added.
    pub price: Decimal,
    /// Optional image URL for rendering.
    pub image: Option<String>,
    /// Number of units.
    pub quantity: u32,
}

impl CartEntry {
    /// Create a cart entry.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        image: Option<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image,
            quantity,
        }
    }

    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

type Subscriber = Box<dyn Fn(&[CartEntry]) + Send>;

/// The shopping cart: an ordered list keyed by product id.
///
/// Adding a product that is already present increments its quantity instead
/// of appending a second line. Every mutation persists to the storage
/// backend and then notifies subscribers.
pub struct Cart {
    storage: Arc<dyn Storage>,
    entries: Vec<CartEntry>,
    subscribers: Vec<Subscriber>,
}

impl Cart {
    /// Load the cart from storage, starting empty if nothing is stored or
    /// the stored value cannot be parsed.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let entries = crate::storage_load_list(storage.as_ref(), STORAGE_KEY);
        Self {
            storage,
            entries,
            subscribers: Vec::new(),
        }
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Add a product to the cart.
    ///
    /// If the product is already present its quantity is incremented by the
    /// entry's quantity; otherwise the entry is appended.
    pub fn add(&mut self, entry: CartEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            existing.quantity += entry.quantity;
        } else {
            self.entries.push(entry);
        }
        self.commit();
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Returns `false` if the product
    /// is not in the cart.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id);
        }
        let Some(existing) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        existing.quantity = quantity;
        self.commit();
        true
    }

    /// Remove a product from the cart. Returns `false` if it was not there.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.commit();
        true
    }

    /// Empty the cart (e.g. after a completed checkout).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.commit();
    }

    /// Register a callback invoked after every mutation with the new state.
    pub fn subscribe(&mut self, subscriber: impl Fn(&[CartEntry]) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn commit(&self) {
        crate::storage_store_list(self.storage.as_ref(), STORAGE_KEY, &self.entries);
        for subscriber in &self.subscribers {
            subscriber(&self.entries);
        }
    }
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("entries", &self.entries)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::MemoryStorage;

    fn entry(id: i32, price: i64, quantity: u32) -> CartEntry {
        CartEntry::new(
            ProductId::new(id),
            format!("Product {id}"),
            Decimal::from(price),
            None,
            quantity,
        )
    }

    fn new_cart() -> (Cart, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let cart = Cart::load(Arc::clone(&storage) as Arc<dyn Storage>);
        (cart, storage)
    }

    #[test]
    fn test_add_new_product_appends() {
        let (mut cart, _storage) = new_cart();
        cart.add(entry(1, 100, 1));
        cart.add(entry(2, 50, 2));
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_add_existing_product_increments_quantity() {
        let (mut cart, _storage) = new_cart();
        cart.add(entry(1, 100, 1));
        cart.add(entry(1, 100, 2));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_remove_deletes_entry() {
        let (mut cart, _storage) = new_cart();
        cart.add(entry(1, 100, 2));
        assert!(cart.remove(ProductId::new(1)));
        assert!(cart.is_empty());
        assert!(!cart.remove(ProductId::new(1)));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let (mut cart, _storage) = new_cart();
        cart.add(entry(1, 100, 2));
        assert!(cart.set_quantity(ProductId::new(1), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal() {
        let (mut cart, _storage) = new_cart();
        cart.add(entry(1, 100, 2));
        cart.add(entry(2, 50, 1));
        assert_eq!(cart.subtotal(), Decimal::from(250));
    }

    #[test]
    fn test_persists_across_instances() {
        let (mut cart, storage) = new_cart();
        cart.add(entry(1, 100, 2));

        let restored = Cart::load(storage as Arc<dyn Storage>);
        assert_eq!(restored.items(), cart.items());
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.store("cart", "not json").unwrap();
        let cart = Cart::load(storage as Arc<dyn Storage>);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subscriber_sees_every_mutation() {
        let (mut cart, _storage) = new_cart();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        cart.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        cart.add(entry(1, 100, 1));
        cart.set_quantity(ProductId::new(1), 5);
        cart.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
