//! Domain models for the storefront.
//!
//! Row types derive `sqlx::FromRow` and serialize directly into the JSON
//! envelope; request types deserialize from handler bodies.

pub mod behavior;
pub mod coupon;
pub mod order;
pub mod product;
pub mod user;

pub use behavior::{BehaviorEvent, BehaviorStats, NewBehaviorEvent, PopularProduct};
pub use coupon::Coupon;
pub use order::{NewOrderLine, Order, OrderDraft, OrderItem};
pub use product::{Brand, Category, Pagination, ProductDetail, ProductImage, ProductSummary};
pub use user::{NewUser, ProfileUpdate, User};
