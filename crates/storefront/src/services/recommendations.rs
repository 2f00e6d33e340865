//! The recommendation scorer.
//!
//! Blends two per-user heuristics (collaborative co-occurrence and
//! content tag/category similarity) and backfills with global trending.
//! Every heuristic degrades to an empty list on failure - recommendations
//! are decoration, never a reason to fail a page.

use sqlx::PgPool;

use electro_core::{CategoryId, ProductId, UserId};

use crate::db::{
    BehaviorRepository, ProductRepository, RecommendationRepository, RepositoryError,
};
use crate::models::{BehaviorStats, NewBehaviorEvent, ProductSummary};

/// How many similar users feed the collaborative heuristic.
const SIMILAR_USERS_LIMIT: i64 = 5;

/// How many recent interactions seed the content heuristic.
const RECENT_INTERACTIONS_LIMIT: i64 = 10;

/// The recommendation scorer.
pub struct RecommendationService<'a> {
    pool: &'a PgPool,
}

impl<'a> RecommendationService<'a> {
    /// Create a new recommendation service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Personalized recommendations.
    ///
    /// Anonymous callers get trending only. Known users get half the limit
    /// (rounded up) from each personal heuristic, a trending backfill for
    /// any shortfall, de-duplication by product id preserving first-seen
    /// order, and a final truncation to `limit`.
    pub async fn personalized(
        &self,
        user_id: Option<UserId>,
        limit: i64,
    ) -> Vec<ProductSummary> {
        let mut recommendations = Vec::new();

        if let Some(user_id) = user_id {
            let half = limit.div_ceil(2);
            recommendations.extend(self.collaborative(user_id, half).await);
            recommendations.extend(self.content_based(user_id, half).await);
        }

        let found = i64::try_from(recommendations.len()).unwrap_or(i64::MAX);
        if found < limit {
            recommendations.extend(self.trending_unattached(limit - found).await);
        }

        let mut recommendations = dedup_by_id(recommendations);
        recommendations.truncate(usize::try_from(limit).unwrap_or(0));

        ProductRepository::new(self.pool)
            .attach_images(&mut recommendations)
            .await;

        recommendations
    }

    /// Collaborative heuristic: products that behaviorally similar users
    /// purchased or wishlisted and this user has never touched.
    async fn collaborative(&self, user_id: UserId, limit: i64) -> Vec<ProductSummary> {
        let repo = RecommendationRepository::new(self.pool);
        let result = async {
            let similar = repo.similar_users(user_id, SIMILAR_USERS_LIMIT).await?;
            if similar.is_empty() {
                return Ok(Vec::new());
            }
            repo.products_liked_by(&similar, user_id, limit).await
        }
        .await;

        unwrap_or_empty(result, "collaborative recommendations failed")
    }

    /// Content heuristic: products sharing a category or tag with the
    /// user's recent interactions.
    async fn content_based(&self, user_id: UserId, limit: i64) -> Vec<ProductSummary> {
        let repo = RecommendationRepository::new(self.pool);
        let result = async {
            let seeds = repo
                .recent_interactions(user_id, RECENT_INTERACTIONS_LIMIT)
                .await?;
            if seeds.is_empty() {
                return Ok(Vec::new());
            }
            repo.content_matches(&seeds, limit).await
        }
        .await;

        unwrap_or_empty(result, "content-based recommendations failed")
    }

    /// Trending products with their images attached.
    pub async fn trending(&self, limit: i64) -> Vec<ProductSummary> {
        let mut products = self.trending_unattached(limit).await;
        ProductRepository::new(self.pool)
            .attach_images(&mut products)
            .await;
        products
    }

    async fn trending_unattached(&self, limit: i64) -> Vec<ProductSummary> {
        let result = RecommendationRepository::new(self.pool).trending(limit).await;
        unwrap_or_empty(result, "trending products failed")
    }

    /// Products frequently bought together with the given product.
    pub async fn frequently_bought_together(
        &self,
        product_id: ProductId,
        limit: i64,
    ) -> Vec<ProductSummary> {
        let result = RecommendationRepository::new(self.pool)
            .frequently_bought_together(product_id, limit)
            .await;
        let mut products = unwrap_or_empty(result, "frequently-bought-together failed");
        ProductRepository::new(self.pool)
            .attach_images(&mut products)
            .await;
        products
    }

    /// Best products of one category.
    pub async fn by_category(&self, category_id: CategoryId, limit: i64) -> Vec<ProductSummary> {
        let result = RecommendationRepository::new(self.pool)
            .by_category(category_id, limit)
            .await;
        let mut products = unwrap_or_empty(result, "category recommendations failed");
        ProductRepository::new(self.pool)
            .attach_images(&mut products)
            .await;
        products
    }

    /// Aggregate behavior-log counts for observability.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<BehaviorStats, RepositoryError> {
        BehaviorRepository::new(self.pool).stats().await
    }

    /// Append one behavior event.
    ///
    /// Insert failures are logged and swallowed; tracking must never fail
    /// the caller.
    pub async fn track(&self, event: &NewBehaviorEvent) {
        if let Err(e) = BehaviorRepository::new(self.pool).insert(event).await {
            tracing::warn!(error = %e, "failed to record behavior event");
        }
    }
}

/// Unwrap a heuristic result, degrading to empty with a warning.
fn unwrap_or_empty(
    result: Result<Vec<ProductSummary>, RepositoryError>,
    context: &'static str,
) -> Vec<ProductSummary> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, context, "recommendation heuristic degraded to empty");
        Vec::new()
    })
}

/// De-duplicate by product id, preserving first-seen order.
fn dedup_by_id(products: Vec<ProductSummary>) -> Vec<ProductSummary> {
    let mut seen = std::collections::HashSet::new();
    products
        .into_iter()
        .filter(|p| seen.insert(p.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            slug: format!("product-{id}"),
            sku: None,
            name: format!("Product {id}"),
            description: None,
            short_description: None,
            brand: None,
            price: Decimal::from(10),
            stock_quantity: 5,
            sales_count: 0,
            views: 0,
            rating_avg: Decimal::ZERO,
            is_featured: false,
            category_id: None,
            category_name: None,
            category_slug: None,
            created_at: Utc::now(),
            tags: Vec::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let deduped = dedup_by_id(vec![
            product(3),
            product(1),
            product(3),
            product(2),
            product(1),
        ]);
        let ids: Vec<i32> = deduped.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_by_id(Vec::new()).is_empty());
    }

    #[test]
    fn test_half_limit_rounds_up() {
        assert_eq!(8_i64.div_ceil(2), 4);
        assert_eq!(5_i64.div_ceil(2), 3);
        assert_eq!(1_i64.div_ceil(2), 1);
    }
}
