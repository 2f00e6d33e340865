//! Behavior log domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use electro_core::{BehaviorAction, BehaviorEventId, ProductId, UserId};

/// One recorded user action.
///
/// Rows are append-only: never updated, never deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BehaviorEvent {
    pub id: BehaviorEventId,
    pub user_id: Option<UserId>,
    pub session_id: Option<String>,
    pub product_id: Option<ProductId>,
    pub action_type: BehaviorAction,
    pub action_data: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A behavior event to append.
#[derive(Debug, Clone)]
pub struct NewBehaviorEvent {
    pub user_id: Option<UserId>,
    pub session_id: Option<String>,
    pub product_id: Option<ProductId>,
    pub action_type: BehaviorAction,
    pub action_data: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewBehaviorEvent {
    /// Event with just the identity triple; payload and client info empty.
    #[must_use]
    pub fn bare(
        user_id: Option<UserId>,
        product_id: Option<ProductId>,
        action_type: BehaviorAction,
    ) -> Self {
        Self {
            user_id,
            session_id: None,
            product_id,
            action_type,
            action_data: serde_json::Value::Object(serde_json::Map::new()),
            ip_address: None,
            user_agent: None,
        }
    }
}

/// Aggregate counts over the behavior log, for observability.
#[derive(Debug, Clone, Serialize)]
pub struct BehaviorStats {
    pub total_interactions: i64,
    pub unique_users: i64,
    pub popular_products: Vec<PopularProduct>,
}

/// A product ranked by interaction count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PopularProduct {
    pub name: String,
    pub interaction_count: i64,
}
