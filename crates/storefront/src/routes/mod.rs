//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (DB ping)
//!
//! # Auth
//! POST /api/auth/register           - Create an account
//! POST /api/auth/login              - Log in
//! POST /api/auth/logout             - Log out
//! GET  /api/auth/me                 - Current user
//! POST /api/auth/profile            - Update profile
//! POST /api/auth/password           - Change password
//! POST /api/auth/password/forgot    - Request a password reset
//!
//! # Catalog
//! GET  /api/products                - Filtered, paginated listing
//! GET  /api/products/featured       - Featured products
//! GET  /api/products/{identifier}   - Detail by id or slug
//! GET  /api/categories              - Categories with product counts
//! GET  /api/brands                  - Brands with product counts
//! GET  /api/search                  - Free-text search
//!
//! # Orders (require auth)
//! POST /api/orders                  - Create an order
//! GET  /api/orders                  - Current user's orders
//! GET  /api/orders/{id}             - One order
//! GET  /api/orders/statuses         - Status lookup table
//! GET  /api/orders/payment-methods  - Payment method lookup table
//!
//! # Recommendations
//! GET  /api/recommendations                               - Personalized
//! GET  /api/recommendations/trending                      - Trending
//! GET  /api/recommendations/frequently-bought/{product_id}
//! GET  /api/recommendations/category/{category_id}
//! GET  /api/recommendations/stats                         - Aggregate counts
//! POST /api/recommendations/track                         - Record a behavior event
//! ```

pub mod auth;
pub mod orders;
pub mod products;
pub mod recommendations;

use axum::{
    Router,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/profile", post(auth::update_profile))
        .route("/password", post(auth::change_password))
        .route("/password/forgot", post(auth::forgot_password))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/featured", get(products::featured))
        .route("/products/{identifier}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/brands", get(products::brands))
        .route("/search", get(products::search))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::list))
        .route("/statuses", get(orders::statuses))
        .route("/payment-methods", get(orders::payment_methods))
        .route("/{id}", get(orders::show))
}

/// Create the recommendation routes router.
pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recommendations::personalized))
        .route("/trending", get(recommendations::trending))
        .route(
            "/frequently-bought/{product_id}",
            get(recommendations::frequently_bought),
        )
        .route("/category/{category_id}", get(recommendations::category))
        .route("/stats", get(recommendations::stats))
        .route("/track", post(recommendations::track))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .merge(catalog_routes())
        .nest("/orders", order_routes())
        .nest("/recommendations", recommendation_routes())
        .fallback(unknown_action);

    Router::new().nest("/api", api)
}

/// Unknown API paths are malformed requests, not business failures.
async fn unknown_action() -> AppError {
    AppError::BadRequest("Invalid action".to_string())
}
