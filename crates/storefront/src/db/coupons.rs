//! Coupon repository.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Coupon;

/// Repository for coupon lookups.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a coupon that is valid right now: active, inside its date
    /// window, and under its usage cap.
    ///
    /// Returns `None` for unknown codes as well as expired or exhausted
    /// ones; callers treat all of these as "invalid or expired".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_valid(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let coupon = sqlx::query_as::<_, Coupon>(
            "SELECT id, code, discount_type, discount_value, minimum_order_amount, \
             maximum_discount, starts_at, expires_at, usage_limit, used_count, is_active \
             FROM coupons \
             WHERE code = $1 AND is_active = TRUE \
             AND (starts_at IS NULL OR starts_at <= NOW()) \
             AND (expires_at IS NULL OR expires_at >= NOW()) \
             AND (usage_limit IS NULL OR used_count < usage_limit)",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(coupon)
    }
}
