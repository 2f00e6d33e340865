//! Electro Cart - client-local cart, wishlist and compare state.
//!
//! This crate holds the state a shopper accumulates while browsing: the
//! cart, the wishlist and the compare list. The state lives entirely on the
//! client - it is keyed by product id, survives only as long as its storage
//! backend, and is never tied to a server session.
//!
//! # Architecture
//!
//! Each list is a small store over a shared [`Storage`] backend:
//!
//! - [`Cart`] - ordered entries with a mutable quantity; adding an existing
//!   product increments its quantity
//! - [`Wishlist`] - ordered set of entries, duplicate adds are no-ops
//! - [`CompareList`] - capped at [`CompareList::MAX_ITEMS`] entries; a full
//!   list rejects further adds without changing
//!
//! Every mutation persists to the backend and then notifies subscribers, so
//! rendering stays decoupled from state management. Persistence backends are
//! swappable: [`MemoryStorage`] mirrors browser local storage semantics for
//! tests, [`JsonFileStorage`] keeps one JSON file per list.
//!
//! # Example
//!
//! ```
//! use electro_cart::{Cart, CartEntry, MemoryStorage, Storage};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
//! let mut cart = Cart::load(Arc::clone(&storage));
//!
//! cart.add(CartEntry::new(1.into(), "Laptop", Decimal::from(999), None, 1));
//! cart.add(CartEntry::new(1.into(), "Laptop", Decimal::from(999), None, 2));
//! assert_eq!(cart.count(), 3);
//!
//! // A fresh cart over the same storage sees the persisted state.
//! let restored = Cart::load(storage);
//! assert_eq!(restored.count(), 3);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cart;
mod compare;
mod storage;
mod wishlist;

pub use cart::{Cart, CartEntry};
pub use compare::{CompareError, CompareList};
pub use storage::{JsonFileStorage, MemoryStorage, Storage, StorageError};
pub use wishlist::{Wishlist, WishlistEntry};

/// Load a serialized list from storage, starting empty on any failure.
///
/// Client state is best-effort: an unreadable or corrupt stored list is the
/// same as a cleared one, so failures degrade to empty rather than propagate.
pub(crate) fn storage_load_list<T: serde::de::DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Vec<T> {
    match storage.load(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "discarding unreadable stored list");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to load stored list");
            Vec::new()
        }
    }
}

/// Persist a list to storage, logging and swallowing failures.
pub(crate) fn storage_store_list<T: serde::Serialize>(
    storage: &dyn Storage,
    key: &str,
    items: &[T],
) {
    match serde_json::to_string(items) {
        Ok(raw) => {
            if let Err(e) = storage.store(key, &raw) {
                tracing::warn!(key, error = %e, "failed to persist list");
            }
        }
        Err(e) => tracing::warn!(key, error = %e, "failed to serialize list"),
    }
}
