//! Database operations for the storefront `PostgreSQL` database.
//!
//! # Tables
//!
//! - `users` - Customer accounts and credentials
//! - `categories`, `tags`, `product_tags` - Catalog reference data
//! - `products`, `product_images` - The catalog itself
//! - `orders`, `order_items` - Committed orders with product snapshots
//! - `coupons` - Discount codes
//! - `user_behavior` - Append-only behavior log feeding recommendations
//! - `password_reset_tokens` - Pending password resets
//! - `tower_sessions` - Session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p electro-cli -- migrate
//! ```

pub mod behavior;
pub mod coupons;
pub mod orders;
pub mod products;
pub mod recommendations;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use behavior::BehaviorRepository;
pub use coupons::CouponRepository;
pub use orders::{OrderCreateError, OrderRepository};
pub use products::{ProductFilter, ProductRepository, SortOrder};
pub use recommendations::RecommendationRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
