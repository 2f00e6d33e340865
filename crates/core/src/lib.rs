//! Electro Core - Shared types library.
//!
//! This crate provides common types used across all Electro components:
//! - `storefront` - JSON API backend for the store
//! - `cart` - Client-local cart/wishlist/compare state
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
