//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use electro_core::{OrderId, OrderStatus, PaymentMethod};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::response::ApiResponse;
use crate::services::OrderService;
use crate::services::orders::CreateOrderRequest;
use crate::state::AppState;

/// Response body for a created order.
///
/// Carries the soft coupon notice when a submitted coupon could not be
/// applied; the order itself still succeeded.
#[derive(Debug, Serialize)]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_notice: Option<String>,
}

/// `POST /api/orders`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<OrderCreatedResponse>> {
    let created = OrderService::new(state.pool(), &state.config().store)
        .create_order(user.id, &req)
        .await?;

    Ok(Json(OrderCreatedResponse {
        success: true,
        message: "Order created successfully",
        data: created.order,
        coupon_notice: created.coupon_notice,
    }))
}

/// `GET /api/orders`
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let orders = OrderService::new(state.pool(), &state.config().store)
        .list_for_user(user.id)
        .await?;
    Ok(ApiResponse::ok(orders))
}

/// `GET /api/orders/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<Order>>> {
    let order = OrderService::new(state.pool(), &state.config().store)
        .get_for_user(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    Ok(ApiResponse::ok(order))
}

/// `GET /api/orders/statuses`
pub async fn statuses() -> Json<ApiResponse<serde_json::Value>> {
    let mut map = serde_json::Map::new();
    for status in OrderStatus::ALL {
        map.insert(
            status.to_string(),
            serde_json::Value::String(status.label().to_string()),
        );
    }
    ApiResponse::ok(serde_json::Value::Object(map))
}

/// `GET /api/orders/payment-methods`
pub async fn payment_methods() -> Json<ApiResponse<serde_json::Value>> {
    let mut map = serde_json::Map::new();
    for method in PaymentMethod::ALL {
        map.insert(
            method.to_string(),
            serde_json::Value::String(method.label().to_string()),
        );
    }
    ApiResponse::ok(serde_json::Value::Object(map))
}
