//! The order engine: cart validation, pricing, atomic persistence.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use electro_core::{BehaviorAction, OrderId, PaymentMethod, ProductId, UserId};

use super::pricing;
use crate::config::StoreConfig;
use crate::db::orders::OrderCreateError;
use crate::db::{
    BehaviorRepository, CouponRepository, OrderRepository, ProductRepository, RepositoryError,
};
use crate::models::{NewBehaviorEvent, NewOrderLine, Order, OrderDraft};

/// Errors from order operations.
///
/// Display strings are the user-facing error messages of the envelope.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A required field is missing or empty.
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    /// Every submitted line was dropped during validation.
    #[error("No valid items in order")]
    NoValidItems,

    /// A line asked for more units than are in stock. Aborts the whole
    /// order; partially fulfilled orders are never created.
    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),

    /// Database failure.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// One cart line as submitted by the client.
///
/// Lines with a missing product id or a missing/non-positive quantity are
/// silently dropped, not rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineRequest {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub quantity: Option<i32>,
}

/// An order creation request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default)]
    pub shipping_city: Option<String>,
    #[serde(default)]
    pub shipping_state: Option<String>,
    #[serde(default)]
    pub shipping_country: Option<String>,
    #[serde(default)]
    pub shipping_postal_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A successfully created order, with an optional coupon notice when the
/// submitted coupon could not be applied.
#[derive(Debug)]
pub struct CreatedOrder {
    pub order: Order,
    pub coupon_notice: Option<String>,
}

/// Default shipping country when the client omits one.
const DEFAULT_SHIPPING_COUNTRY: &str = "Ghana";

/// The order engine.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    store: &'a StoreConfig,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, store: &'a StoreConfig) -> Self {
        Self { pool, store }
    }

    /// Create an order from a cart.
    ///
    /// Validation: required fields first, then per-line checks. Lines
    /// referencing missing or inactive products are dropped; a line whose
    /// quantity exceeds current stock aborts the whole order. Pricing uses
    /// the store constants; an invalid or inapplicable coupon degrades to a
    /// zero discount with a notice instead of failing.
    ///
    /// Persistence is one transaction: order row, line items, conditional
    /// stock decrements, coupon usage. After commit, one purchase event per
    /// line is appended to the behavior log; logging failures never fail
    /// the order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] for validation failures, stock shortages and
    /// database faults.
    pub async fn create_order(
        &self,
        user_id: UserId,
        req: &CreateOrderRequest,
    ) -> Result<CreatedOrder, OrderError> {
        if let Some(field) = missing_required_field(req) {
            return Err(OrderError::MissingField(field));
        }

        let products = ProductRepository::new(self.pool);
        let mut subtotal = Decimal::ZERO;
        let mut lines: Vec<NewOrderLine> = Vec::new();

        for (product_id, quantity) in normalized_lines(&req.items) {
            let Some(product) = products.get_active(product_id).await? else {
                continue;
            };

            if product.stock_quantity < quantity {
                return Err(OrderError::InsufficientStock(product.name));
            }

            let total_price = product.price * Decimal::from(quantity);
            subtotal += total_price;
            lines.push(NewOrderLine {
                product_id: product.id,
                product_name: product.name,
                product_sku: product.sku,
                quantity,
                unit_price: product.price,
                total_price,
            });
        }

        if lines.is_empty() {
            return Err(OrderError::NoValidItems);
        }

        let mut discount = Decimal::ZERO;
        let mut coupon_id = None;
        let mut coupon_notice = None;

        if let Some(code) = req.coupon_code.as_deref().filter(|c| !c.is_empty()) {
            let coupons = CouponRepository::new(self.pool);
            match coupons.find_valid(code).await? {
                Some(coupon) => match pricing::coupon_discount(&coupon, subtotal) {
                    Some(amount) => {
                        discount = amount;
                        coupon_id = Some(coupon.id);
                    }
                    None => coupon_notice = Some("Minimum order amount not met".to_string()),
                },
                None => coupon_notice = Some("Invalid or expired coupon".to_string()),
            }
        }

        let breakdown = pricing::compute(subtotal, discount, self.store);

        let orders = OrderRepository::new(self.pool);
        let order_number = orders.next_order_number(Utc::now().year()).await?;

        let shipping_address = req.shipping_address.clone().unwrap_or_default();
        let draft = OrderDraft {
            order_number,
            user_id,
            subtotal: breakdown.subtotal,
            tax_amount: breakdown.tax,
            shipping_amount: breakdown.shipping,
            discount_amount: breakdown.discount,
            total_amount: breakdown.total,
            payment_method: req.payment_method.unwrap_or_default(),
            billing_address: req
                .billing_address
                .clone()
                .unwrap_or_else(|| shipping_address.clone()),
            shipping_address,
            shipping_city: req.shipping_city.clone(),
            shipping_state: req.shipping_state.clone(),
            shipping_country: Some(
                req.shipping_country
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SHIPPING_COUNTRY.to_string()),
            ),
            shipping_postal_code: req.shipping_postal_code.clone(),
            phone: req.phone.clone().unwrap_or_default(),
            email: req.email.clone().unwrap_or_default(),
            notes: req.notes.clone(),
            coupon_id,
            lines,
        };

        let order = orders.create(&draft).await.map_err(|e| match e {
            OrderCreateError::OutOfStock(name) => OrderError::InsufficientStock(name),
            OrderCreateError::Repository(err) => OrderError::Repository(err),
        })?;

        self.log_purchases(&order).await;

        Ok(CreatedOrder {
            order,
            coupon_notice,
        })
    }

    /// Append one purchase event per line item, swallowing failures.
    async fn log_purchases(&self, order: &Order) {
        let behavior = BehaviorRepository::new(self.pool);
        for item in &order.items {
            let event = NewBehaviorEvent {
                user_id: Some(order.user_id),
                session_id: None,
                product_id: item.product_id,
                action_type: BehaviorAction::Purchase,
                action_data: serde_json::json!({
                    "order_id": order.id,
                    "quantity": item.quantity,
                }),
                ip_address: None,
                user_agent: None,
            };
            if let Err(e) = behavior.insert(&event).await {
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "failed to log purchase behavior event"
                );
            }
        }
    }

    /// All orders for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        let orders = OrderRepository::new(self.pool).list_for_user(user_id).await?;
        Ok(orders)
    }

    /// One order, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, OrderError> {
        let order = OrderRepository::new(self.pool)
            .get_for_user(order_id, user_id)
            .await?;
        Ok(order)
    }
}

/// Which required field, if any, is missing from the request.
fn missing_required_field(req: &CreateOrderRequest) -> Option<&'static str> {
    if req.items.is_empty() {
        return Some("items");
    }
    if req.shipping_address.as_deref().is_none_or(str::is_empty) {
        return Some("shipping_address");
    }
    if req.phone.as_deref().is_none_or(str::is_empty) {
        return Some("phone");
    }
    if req.email.as_deref().is_none_or(str::is_empty) {
        return Some("email");
    }
    None
}

/// Drop lines with a missing product id or non-positive quantity.
fn normalized_lines(items: &[OrderLineRequest]) -> Vec<(ProductId, i32)> {
    items
        .iter()
        .filter_map(|line| {
            let product_id = line.product_id?;
            let quantity = line.quantity?;
            (quantity > 0).then_some((product_id, quantity))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: Option<i32>, quantity: Option<i32>) -> OrderLineRequest {
        OrderLineRequest {
            product_id: product_id.map(ProductId::new),
            quantity,
        }
    }

    fn valid_request() -> CreateOrderRequest {
        CreateOrderRequest {
            items: vec![line(Some(1), Some(2))],
            shipping_address: Some("12 Ring Road".to_string()),
            phone: Some("+233201234567".to_string()),
            email: Some("buyer@example.com".to_string()),
            ..CreateOrderRequest::default()
        }
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let empty = CreateOrderRequest::default();
        assert_eq!(missing_required_field(&empty), Some("items"));

        let mut req = valid_request();
        req.shipping_address = None;
        assert_eq!(missing_required_field(&req), Some("shipping_address"));

        let mut req = valid_request();
        req.phone = Some(String::new());
        assert_eq!(missing_required_field(&req), Some("phone"));

        let mut req = valid_request();
        req.email = None;
        assert_eq!(missing_required_field(&req), Some("email"));

        assert_eq!(missing_required_field(&valid_request()), None);
    }

    #[test]
    fn test_invalid_lines_silently_dropped() {
        let lines = normalized_lines(&[
            line(Some(1), Some(2)),
            line(None, Some(3)),
            line(Some(4), None),
            line(Some(5), Some(0)),
            line(Some(6), Some(-1)),
            line(Some(7), Some(1)),
        ]);
        assert_eq!(
            lines,
            vec![(ProductId::new(1), 2), (ProductId::new(7), 1)]
        );
    }

    #[test]
    fn test_error_messages_match_contract() {
        assert_eq!(
            OrderError::MissingField("phone").to_string(),
            "Field 'phone' is required"
        );
        assert_eq!(
            OrderError::InsufficientStock("Gaming Mouse".to_string()).to_string(),
            "Insufficient stock for Gaming Mouse"
        );
        assert_eq!(OrderError::NoValidItems.to_string(), "No valid items in order");
    }
}
