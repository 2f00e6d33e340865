//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use electro_core::{CouponId, OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

/// A committed order.
///
/// The monetary breakdown is computed once at creation and never
/// recomputed; `total_amount` always equals
/// `subtotal + tax_amount + shipping_amount - discount_amount`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Human-readable order number (`ORD-<year>-<sequence>`).
    pub order_number: String,
    pub user_id: UserId,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub shipping_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub billing_address: String,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_country: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of line items (computed alongside the row).
    pub item_count: i64,
    /// Line items, attached after the row fetch.
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
}

/// One order line with its product snapshot.
///
/// `image_url` and `slug` come from the live product tables for rendering
/// and may be gone if the product was deleted; the snapshot columns are
/// what the customer actually bought.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub image_url: Option<String>,
    pub slug: Option<String>,
}

/// A validated, priced order ready to persist.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub order_number: String,
    pub user_id: UserId,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub shipping_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub shipping_address: String,
    pub billing_address: String,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_country: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub phone: String,
    pub email: String,
    pub notes: Option<String>,
    /// Coupon whose `used_count` should be bumped, when a discount applied.
    pub coupon_id: Option<CouponId>,
    pub lines: Vec<NewOrderLine>,
}

/// A validated order line carrying the product snapshot to persist.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_sku: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}
