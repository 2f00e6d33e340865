//! Recommendation scoring queries.
//!
//! Every ranking here is a weighted count with explicit tie-breaks; the
//! ORDER BY clauses *are* the algorithm and must not be reordered.

use sqlx::PgPool;

use electro_core::{CategoryId, ProductId, UserId};

use super::RepositoryError;
use crate::models::ProductSummary;

/// Columns selected for recommended product rows.
const PRODUCT_COLUMNS: &str = "p.id, p.slug, p.sku, p.name, p.description, p.short_description, \
     p.brand, p.price, p.stock_quantity, p.sales_count, p.views, p.rating_avg, p.is_featured, \
     p.category_id, c.name AS category_name, c.slug AS category_slug, p.created_at";

/// Repository for recommendation scoring queries.
pub struct RecommendationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RecommendationRepository<'a> {
    /// Create a new recommendation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Users who share at least one identical (product, action) event with
    /// the target user, ranked by shared-event count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn similar_users(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<UserId>, RepositoryError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            "SELECT b2.user_id \
             FROM user_behavior b1 \
             JOIN user_behavior b2 ON b1.product_id = b2.product_id \
                 AND b1.action_type = b2.action_type \
                 AND b2.user_id IS NOT NULL \
                 AND b2.user_id <> b1.user_id \
             WHERE b1.user_id = $1 \
             GROUP BY b2.user_id \
             ORDER BY COUNT(*) DESC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }

    /// Products that the given users purchased or wishlisted and the target
    /// user has never interacted with, ranked by contributing-event count
    /// then rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_liked_by(
        &self,
        users: &[UserId],
        target: UserId,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let user_ids: Vec<i32> = users.iter().map(|u| u.as_i32()).collect();

        let products = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS}, COUNT(ub.id) AS popularity_score \
             FROM products p \
             LEFT JOIN categories c ON p.category_id = c.id \
             JOIN user_behavior ub ON p.id = ub.product_id \
             WHERE p.is_active = TRUE \
             AND ub.user_id = ANY($1) \
             AND ub.action_type IN ('purchase', 'wishlist_add') \
             AND p.id NOT IN ( \
                 SELECT product_id FROM user_behavior \
                 WHERE user_id = $2 AND product_id IS NOT NULL \
             ) \
             GROUP BY p.id, c.name, c.slug \
             ORDER BY popularity_score DESC, p.rating_avg DESC \
             LIMIT $3"
        ))
        .bind(user_ids)
        .bind(target)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// The target user's most recent distinct (product, action) events,
    /// newest first, as product ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_interactions(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            "SELECT product_id FROM ( \
                 SELECT DISTINCT ON (product_id, action_type) product_id, created_at \
                 FROM user_behavior \
                 WHERE user_id = $1 AND product_id IS NOT NULL \
                 ORDER BY product_id, action_type, created_at DESC \
             ) recent \
             ORDER BY created_at DESC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(ProductId::new).collect())
    }

    /// Active products sharing a category or at least one tag with any of
    /// the given products, excluding the products themselves, ranked by
    /// matching-tag count then rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn content_matches(
        &self,
        seed_products: &[ProductId],
        limit: i64,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let product_ids: Vec<i32> = seed_products.iter().map(|p| p.as_i32()).collect();

        let products = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS}, COUNT(DISTINCT pt.tag_id) AS tag_similarity \
             FROM products p \
             LEFT JOIN categories c ON p.category_id = c.id \
             LEFT JOIN product_tags pt ON p.id = pt.product_id \
             WHERE p.is_active = TRUE \
             AND p.id <> ALL($1) \
             AND ( \
                 p.category_id IN ( \
                     SELECT category_id FROM products \
                     WHERE id = ANY($1) AND category_id IS NOT NULL \
                 ) \
                 OR pt.tag_id IN ( \
                     SELECT tag_id FROM product_tags WHERE product_id = ANY($1) \
                 ) \
             ) \
             GROUP BY p.id, c.name, c.slug \
             ORDER BY tag_similarity DESC, p.rating_avg DESC \
             LIMIT $2"
        ))
        .bind(product_ids)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Global popularity ordering: sales, then views, then rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn trending(&self, limit: i64) -> Result<Vec<ProductSummary>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS} \
             FROM products p \
             LEFT JOIN categories c ON p.category_id = c.id \
             WHERE p.is_active = TRUE \
             ORDER BY p.sales_count DESC, p.views DESC, p.rating_avg DESC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Products co-occurring with the given product in historical orders,
    /// ranked by co-occurrence frequency then rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn frequently_bought_together(
        &self,
        product_id: ProductId,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS}, COUNT(*) AS frequency \
             FROM products p \
             LEFT JOIN categories c ON p.category_id = c.id \
             JOIN order_items oi2 ON oi2.product_id = p.id \
             JOIN order_items oi1 ON oi1.order_id = oi2.order_id \
             WHERE oi1.product_id = $1 \
             AND oi2.product_id <> $1 \
             AND p.is_active = TRUE \
             GROUP BY p.id, c.name, c.slug \
             ORDER BY frequency DESC, p.rating_avg DESC \
             LIMIT $2"
        ))
        .bind(product_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Best products of one category: rating, then sales.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_category(
        &self,
        category_id: CategoryId,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS} \
             FROM products p \
             LEFT JOIN categories c ON p.category_id = c.id \
             WHERE p.is_active = TRUE AND p.category_id = $1 \
             ORDER BY p.rating_avg DESC, p.sales_count DESC \
             LIMIT $2"
        ))
        .bind(category_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}
