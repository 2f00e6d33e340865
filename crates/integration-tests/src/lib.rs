//! Integration tests for Electro.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p electro-cli -- migrate
//! cargo run -p electro-cli -- seed
//!
//! # Start the storefront
//! cargo run -p electro-storefront
//!
//! # Run integration tests
//! cargo test -p electro-integration-tests -- --ignored
//! ```
//!
//! Tests live in `tests/` and are `#[ignore]`d by default because they
//! require a running storefront server and a seeded database.

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
