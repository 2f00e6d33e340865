//! Coupon domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use electro_core::{CouponId, DiscountType};

/// A discount coupon.
///
/// Read-only at order time; only `used_count` is mutated, inside the order
/// transaction, when a discount was actually applied.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub discount_type: DiscountType,
    /// Percentage (0-100) or fixed amount, depending on `discount_type`.
    pub discount_value: Decimal,
    /// Subtotal required before the coupon applies.
    pub minimum_order_amount: Decimal,
    /// Cap on the computed discount for percentage coupons.
    pub maximum_discount: Option<Decimal>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
}
