//! Behavior log repository.
//!
//! The log is append-only: rows are inserted and aggregated, never updated
//! or deleted. There is no pruning; growth is unbounded by design.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{BehaviorStats, NewBehaviorEvent, PopularProduct};

/// Repository for the user behavior log.
pub struct BehaviorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BehaviorRepository<'a> {
    /// Create a new behavior repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append one behavior event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails. Callers on
    /// hot paths swallow this - a lost event must never fail the request
    /// that produced it.
    pub async fn insert(&self, event: &NewBehaviorEvent) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_behavior \
             (user_id, session_id, product_id, action_type, action_data, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(event.user_id)
        .bind(&event.session_id)
        .bind(event.product_id)
        .bind(event.action_type)
        .bind(&event.action_data)
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Aggregate counts over the log for the stats endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<BehaviorStats, RepositoryError> {
        let total_interactions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_behavior")
            .fetch_one(self.pool)
            .await?;

        let unique_users: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT user_id) FROM user_behavior WHERE user_id IS NOT NULL",
        )
        .fetch_one(self.pool)
        .await?;

        let popular_products = sqlx::query_as::<_, PopularProduct>(
            "SELECT p.name, COUNT(ub.id) AS interaction_count \
             FROM products p \
             LEFT JOIN user_behavior ub ON p.id = ub.product_id \
             WHERE p.is_active = TRUE \
             GROUP BY p.id \
             ORDER BY interaction_count DESC \
             LIMIT 5",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(BehaviorStats {
            total_interactions,
            unique_users,
            popular_products,
        })
    }
}
