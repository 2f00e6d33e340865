//! Business services for the storefront.
//!
//! Services own the multi-step flows (validation, pricing, persistence,
//! side effects) and keep the route handlers thin.

pub mod auth;
pub mod orders;
pub mod pricing;
pub mod recommendations;

pub use auth::{AuthError, AuthService};
pub use orders::{OrderError, OrderService};
pub use recommendations::RecommendationService;
