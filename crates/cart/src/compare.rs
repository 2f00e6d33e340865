//! The product compare list.

use std::sync::Arc;

use thiserror::Error;

use electro_core::ProductId;

use crate::storage::Storage;

/// Storage key for the compare list.
const STORAGE_KEY: &str = "compareList";

/// Rejections from [`CompareList::add`].
///
/// These surface as user-facing notices, not failures; the list is left
/// unchanged in both cases.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    /// The list already holds the maximum number of products.
    #[error("maximum {max} products can be compared at once")]
    Full {
        /// The configured cap.
        max: usize,
    },

    /// The product is already on the compare list.
    #[error("product already in compare list")]
    AlreadyListed,
}

type Subscriber = Box<dyn Fn(&[ProductId]) + Send>;

/// The compare list: an ordered list of product ids capped at
/// [`Self::MAX_ITEMS`].
pub struct CompareList {
    storage: Arc<dyn Storage>,
    ids: Vec<ProductId>,
    subscribers: Vec<Subscriber>,
}

impl CompareList {
    /// Maximum number of products that can be compared at once.
    pub const MAX_ITEMS: usize = 4;

    /// Load the compare list from storage, starting empty if nothing is
    /// stored or the stored value cannot be parsed.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let ids = crate::storage_load_list(storage.as_ref(), STORAGE_KEY);
        Self {
            storage,
            ids,
            subscribers: Vec::new(),
        }
    }

    /// Current product ids, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ProductId] {
        &self.ids
    }

    /// Number of products on the list.
    #[must_use]
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    /// Whether the given product is on the list.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Add a product to the compare list.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Full`] when the list already holds
    /// [`Self::MAX_ITEMS`] products and [`CompareError::AlreadyListed`] for
    /// a duplicate; the list is unchanged in both cases.
    pub fn add(&mut self, id: ProductId) -> Result<(), CompareError> {
        if self.ids.len() >= Self::MAX_ITEMS {
            return Err(CompareError::Full {
                max: Self::MAX_ITEMS,
            });
        }
        if self.contains(id) {
            return Err(CompareError::AlreadyListed);
        }
        self.ids.push(id);
        self.commit();
        Ok(())
    }

    /// Remove a product. Returns `false` if it was not on the list.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        if self.ids.len() == before {
            return false;
        }
        self.commit();
        true
    }

    /// Empty the compare list.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.commit();
    }

    /// Register a callback invoked after every mutation with the new state.
    pub fn subscribe(&mut self, subscriber: impl Fn(&[ProductId]) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn commit(&self) {
        crate::storage_store_list(self.storage.as_ref(), STORAGE_KEY, &self.ids);
        for subscriber in &self.subscribers {
            subscriber(&self.ids);
        }
    }
}

impl std::fmt::Debug for CompareList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompareList")
            .field("ids", &self.ids)
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

    fn new_list() -> CompareList {
        CompareList::load(Arc::new(MemoryStorage::new()) as Arc<dyn Storage>)
    }

    #[test]
    fn test_fifth_add_rejected_list_unchanged() {
        let mut list = new_list();
        for id in 1..=4 {
            list.add(ProductId::new(id)).unwrap();
        }

        let before: Vec<ProductId> = list.items().to_vec();
        assert_eq!(
            list.add(ProductId::new(5)),
            Err(CompareError::Full {
                max: CompareList::MAX_ITEMS
            })
        );
        assert_eq!(list.items(), before.as_slice());
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut list = new_list();
        list.add(ProductId::new(1)).unwrap();
        assert_eq!(list.add(ProductId::new(1)), Err(CompareError::AlreadyListed));
        assert_eq!(list.count(), 1);
    }

    #[test]
    fn test_remove_then_add_again() {
        let mut list = new_list();
        for id in 1..=4 {
            list.add(ProductId::new(id)).unwrap();
        }
        assert!(list.remove(ProductId::new(2)));
        assert!(list.add(ProductId::new(5)).is_ok());
        assert_eq!(list.count(), 4);
    }

    #[test]
    fn test_persists_across_instances() {
        let storage = Arc::new(MemoryStorage::new());
        let mut list = CompareList::load(Arc::clone(&storage) as Arc<dyn Storage>);
        list.add(ProductId::new(9)).unwrap();

        let restored = CompareList::load(storage as Arc<dyn Storage>);
        assert_eq!(restored.items(), list.items());
    }
}
