//! The wishlist.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use electro_core::ProductId;

use crate::storage::Storage;

/// Storage key for the wishlist.
const STORAGE_KEY: &str = "wishlist";

/// One wishlist entry: a product snapshot without quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Product this entry refers to.
    pub id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price at the time it was added.
    pub price: Decimal,
    /// Optional image URL for rendering.
    pub image: Option<String>,
}

impl WishlistEntry {
    /// Create a wishlist entry.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        image: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image,
        }
    }
}

type Subscriber = Box<dyn Fn(&[WishlistEntry]) + Send>;

/// The wishlist: an ordered set of products keyed by product id.
///
/// Unlike the cart there is no quantity; adding a product twice is a no-op.
/// Checkout does not touch the wishlist.
pub struct Wishlist {
    storage: Arc<dyn Storage>,
    entries: Vec<WishlistEntry>,
    subscribers: Vec<Subscriber>,
}

impl Wishlist {
    /// Load the wishlist from storage, starting empty if nothing is stored
    /// or the stored value cannot be parsed.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let entries = crate::storage_load_list(storage.as_ref(), STORAGE_KEY);
        Self {
            storage,
            entries,
            subscribers: Vec::new(),
        }
    }

    /// Current entries, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the given product is on the wishlist.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Add a product. Returns `false` (and changes nothing) if it is
    /// already on the wishlist.
    pub fn add(&mut self, entry: WishlistEntry) -> bool {
        if self.contains(entry.id) {
            return false;
        }
        self.entries.push(entry);
        self.commit();
        true
    }

    /// Remove a product. Returns `false` if it was not on the wishlist.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.commit();
        true
    }

    /// Register a callback invoked after every mutation with the new state.
    pub fn subscribe(&mut self, subscriber: impl Fn(&[WishlistEntry]) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn commit(&self) {
        crate::storage_store_list(self.storage.as_ref(), STORAGE_KEY, &self.entries);
        for subscriber in &self.subscribers {
            subscriber(&self.entries);
        }
    }
}

impl std::fmt::Debug for Wishlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wishlist")
            .field("entries", &self.entries)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::MemoryStorage;

    fn entry(id: i32) -> WishlistEntry {
        WishlistEntry::new(
            ProductId::new(id),
            format!("Product {id}"),
            Decimal::from(10),
            None,
        )
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let mut wishlist = Wishlist::load(storage as Arc<dyn Storage>);

        assert!(wishlist.add(entry(1)));
        assert!(!wishlist.add(entry(1)));
        assert_eq!(wishlist.count(), 1);
    }

    #[test]
    fn test_remove() {
        let storage = Arc::new(MemoryStorage::new());
        let mut wishlist = Wishlist::load(storage as Arc<dyn Storage>);

        wishlist.add(entry(1));
        assert!(wishlist.contains(ProductId::new(1)));
        assert!(wishlist.remove(ProductId::new(1)));
        assert!(!wishlist.contains(ProductId::new(1)));
        assert!(!wishlist.remove(ProductId::new(1)));
    }

    #[test]
    fn test_persists_across_instances() {
        let storage = Arc::new(MemoryStorage::new());
        let mut wishlist = Wishlist::load(Arc::clone(&storage) as Arc<dyn Storage>);
        wishlist.add(entry(1));
        wishlist.add(entry(2));

        let restored = Wishlist::load(storage as Arc<dyn Storage>);
        assert_eq!(restored.items(), wishlist.items());
    }
}
