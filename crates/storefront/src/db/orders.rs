//! Order repository: transactional order creation and order history.

use sqlx::PgPool;
use thiserror::Error;

use electro_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderDraft, OrderItem};

/// Columns selected for every order row, with the item count subquery.
const ORDER_COLUMNS: &str = "o.id, o.order_number, o.user_id, o.subtotal, o.tax_amount, \
     o.shipping_amount, o.discount_amount, o.total_amount, o.payment_method, o.status, \
     o.shipping_address, o.billing_address, o.shipping_city, o.shipping_state, \
     o.shipping_country, o.shipping_postal_code, o.phone, o.email, o.notes, \
     o.created_at, o.updated_at, \
     (SELECT COUNT(*) FROM order_items oi WHERE oi.order_id = o.id) AS item_count";

/// Errors from [`OrderRepository::create`].
#[derive(Debug, Error)]
pub enum OrderCreateError {
    /// A stock decrement lost the race: the product no longer has enough
    /// stock. The whole transaction is rolled back.
    #[error("Insufficient stock for {0}")]
    OutOfStock(String),

    /// Database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderCreateError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reserve the next order number for the given year.
    ///
    /// Backed by a database sequence, so concurrent checkouts can never
    /// collide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the sequence fetch fails.
    pub async fn next_order_number(&self, year: i32) -> Result<String, RepositoryError> {
        let seq: i64 = sqlx::query_scalar("SELECT nextval('order_number_seq')")
            .fetch_one(self.pool)
            .await?;

        Ok(format!("ORD-{year}-{seq:04}"))
    }

    /// Persist a priced order atomically.
    ///
    /// One transaction covers the order row, every line item, the
    /// conditional stock decrements and the coupon usage bump. Stock is
    /// decremented with `WHERE stock_quantity >= quantity`; a zero
    /// affected-row count means a concurrent checkout took the stock first,
    /// and the whole transaction rolls back.
    ///
    /// # Errors
    ///
    /// Returns [`OrderCreateError::OutOfStock`] when a decrement loses the
    /// race, [`OrderCreateError::Repository`] for database failures.
    pub async fn create(&self, draft: &OrderDraft) -> Result<Order, OrderCreateError> {
        let mut tx = self.pool.begin().await?;

        let order_id: OrderId = sqlx::query_scalar(
            "INSERT INTO orders (order_number, user_id, subtotal, tax_amount, shipping_amount, \
             discount_amount, total_amount, payment_method, shipping_address, billing_address, \
             shipping_city, shipping_state, shipping_country, shipping_postal_code, phone, \
             email, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING id",
        )
        .bind(&draft.order_number)
        .bind(draft.user_id)
        .bind(draft.subtotal)
        .bind(draft.tax_amount)
        .bind(draft.shipping_amount)
        .bind(draft.discount_amount)
        .bind(draft.total_amount)
        .bind(draft.payment_method)
        .bind(&draft.shipping_address)
        .bind(&draft.billing_address)
        .bind(&draft.shipping_city)
        .bind(&draft.shipping_state)
        .bind(&draft.shipping_country)
        .bind(&draft.shipping_postal_code)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.notes)
        .fetch_one(&mut *tx)
        .await?;

        for line in &draft.lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, product_sku, \
                 quantity, unit_price, total_price) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(&line.product_sku)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.total_price)
            .execute(&mut *tx)
            .await?;

            // Conditional decrement: refuses to take stock below zero even
            // when a concurrent checkout raced past the earlier validation.
            let updated = sqlx::query(
                "UPDATE products \
                 SET stock_quantity = stock_quantity - $1, sales_count = sales_count + $1 \
                 WHERE id = $2 AND stock_quantity >= $1",
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(OrderCreateError::OutOfStock(line.product_name.clone()));
            }
        }

        if let Some(coupon_id) = draft.coupon_id {
            sqlx::query("UPDATE coupons SET used_count = used_count + 1 WHERE id = $1")
                .bind(coupon_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let order = self
            .get(order_id)
            .await?
            .ok_or(RepositoryError::NotFound)
            .map_err(OrderCreateError::Repository)?;

        Ok(order)
    }

    /// Fetch an order by id, with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let mut order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(order) = order.as_mut() {
            order.items = self.items(order.id).await?;
        }

        Ok(order)
    }

    /// Fetch an order by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = $1 AND o.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(order) = order.as_mut() {
            order.items = self.items(order.id).await?;
        }

        Ok(order)
    }

    /// All orders for a user, newest first, with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o \
             WHERE o.user_id = $1 \
             ORDER BY o.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        for order in &mut orders {
            order.items = self.items(order.id).await?;
        }

        Ok(orders)
    }

    /// Line items for an order, joined with the live product's slug and
    /// primary image for rendering.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.product_name, oi.product_sku, \
             oi.quantity, oi.unit_price, oi.total_price, \
             pi.image_url, p.slug \
             FROM order_items oi \
             LEFT JOIN products p ON oi.product_id = p.id \
             LEFT JOIN product_images pi ON oi.product_id = pi.product_id AND pi.is_primary = TRUE \
             WHERE oi.order_id = $1 \
             ORDER BY oi.id ASC",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
