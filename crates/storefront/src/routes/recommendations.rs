//! Recommendation route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use tower_sessions::Session;

use electro_core::{BehaviorAction, CategoryId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{BehaviorStats, NewBehaviorEvent, ProductSummary};
use crate::response::{ApiResponse, RecommendationResponse};
use crate::services::RecommendationService;
use crate::state::AppState;

/// Default list size for personalized, trending and category widgets.
const DEFAULT_LIMIT: i64 = 8;

/// Default list size for the frequently-bought-together widget.
const FREQUENTLY_BOUGHT_LIMIT: i64 = 4;

/// A plain limit parameter.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    fn limit_or(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).max(1)
    }
}

/// A behavior tracking request body.
#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub action_type: Option<String>,
    #[serde(default)]
    pub action_data: Option<serde_json::Value>,
}

/// `GET /api/recommendations`
pub async fn personalized(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LimitQuery>,
) -> Json<RecommendationResponse<ProductSummary>> {
    let products = RecommendationService::new(state.pool())
        .personalized(user.map(|u| u.id), query.limit_or(DEFAULT_LIMIT))
        .await;
    RecommendationResponse::ok(products, "personalized")
}

/// `GET /api/recommendations/trending`
pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<RecommendationResponse<ProductSummary>> {
    let products = RecommendationService::new(state.pool())
        .trending(query.limit_or(DEFAULT_LIMIT))
        .await;
    RecommendationResponse::ok(products, "trending")
}

/// `GET /api/recommendations/frequently-bought/{product_id}`
pub async fn frequently_bought(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Query(query): Query<LimitQuery>,
) -> Json<RecommendationResponse<ProductSummary>> {
    let products = RecommendationService::new(state.pool())
        .frequently_bought_together(product_id, query.limit_or(FREQUENTLY_BOUGHT_LIMIT))
        .await;
    RecommendationResponse::ok(products, "frequently_bought")
}

/// `GET /api/recommendations/category/{category_id}`
pub async fn category(
    State(state): State<AppState>,
    Path(category_id): Path<CategoryId>,
    Query(query): Query<LimitQuery>,
) -> Json<RecommendationResponse<ProductSummary>> {
    let products = RecommendationService::new(state.pool())
        .by_category(category_id, query.limit_or(DEFAULT_LIMIT))
        .await;
    RecommendationResponse::ok(products, "category")
}

/// `GET /api/recommendations/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<ApiResponse<BehaviorStats>>> {
    let stats = RecommendationService::new(state.pool()).stats().await?;
    Ok(ApiResponse::ok(stats))
}

/// `POST /api/recommendations/track`
///
/// Appends one behavior event. The insert is best-effort: a storage
/// failure is logged and the caller still gets a success response.
pub async fn track(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    headers: HeaderMap,
    Json(req): Json<TrackRequest>,
) -> Result<Json<ApiResponse<()>>> {
    let Some(action_raw) = req.action_type.as_deref().filter(|a| !a.is_empty()) else {
        return Err(AppError::Validation(
            "Field 'action_type' is required".to_string(),
        ));
    };
    let action_type: BehaviorAction = action_raw
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid action type: {action_raw}")))?;

    let event = NewBehaviorEvent {
        user_id: user.map(|u| u.id),
        session_id: session.id().map(|id| id.to_string()),
        product_id: req.product_id,
        action_type,
        action_data: req
            .action_data
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())),
        ip_address: header_value(&headers, "x-forwarded-for"),
        user_agent: header_value(&headers, "user-agent"),
    };

    RecommendationService::new(state.pool()).track(&event).await;

    Ok(ApiResponse::message("Behavior tracked successfully"))
}

/// First value of a header, when present and valid UTF-8.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}
