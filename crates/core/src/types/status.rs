//! Status enums for storefront entities.
//!
//! Every enum here is stored as `snake_case` text in `PostgreSQL` and
//! serialized the same way over JSON, so the wire format, the database
//! format, and `FromStr`/`Display` all agree.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created as `Pending`; later transitions are driven by
/// fulfillment, which is outside the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Human-readable label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    MobileMoney,
    CreditCard,
    BankTransfer,
    CashOnDelivery,
}

impl PaymentMethod {
    /// All accepted methods.
    pub const ALL: [Self; 4] = [
        Self::MobileMoney,
        Self::CreditCard,
        Self::BankTransfer,
        Self::CashOnDelivery,
    ];

    /// Human-readable label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::MobileMoney => "Mobile Money",
            Self::CreditCard => "Credit Card",
            Self::BankTransfer => "Bank Transfer",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MobileMoney => write!(f, "mobile_money"),
            Self::CreditCard => write!(f, "credit_card"),
            Self::BankTransfer => write!(f, "bank_transfer"),
            Self::CashOnDelivery => write!(f, "cash_on_delivery"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile_money" => Ok(Self::MobileMoney),
            "credit_card" => Ok(Self::CreditCard),
            "bank_transfer" => Ok(Self::BankTransfer),
            "cash_on_delivery" => Ok(Self::CashOnDelivery),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Coupon discount type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "discount_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage of the order subtotal, optionally capped.
    Percentage,
    /// Fixed amount off the order total.
    Fixed,
}

/// Tracked user behavior actions.
///
/// These feed the recommendation scorer; the set is closed on purpose so
/// the scoring queries can rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "behavior_action", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorAction {
    View,
    Purchase,
    WishlistAdd,
    CartAdd,
}

impl std::fmt::Display for BehaviorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Purchase => write!(f, "purchase"),
            Self::WishlistAdd => write!(f, "wishlist_add"),
            Self::CartAdd => write!(f, "cart_add"),
        }
    }
}

impl std::str::FromStr for BehaviorAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "purchase" => Ok(Self::Purchase),
            "wishlist_add" => Ok(Self::WishlistAdd),
            "cart_add" => Ok(Self::CartAdd),
            _ => Err(format!("invalid behavior action: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_order_status_json() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap();
        assert_eq!(json, "\"shipped\"");
    }

    #[test]
    fn test_payment_method_roundtrip() {
        for method in PaymentMethod::ALL {
            let parsed: PaymentMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn test_payment_method_label() {
        assert_eq!(PaymentMethod::MobileMoney.label(), "Mobile Money");
        assert_eq!(PaymentMethod::CashOnDelivery.label(), "Cash on Delivery");
    }

    #[test]
    fn test_behavior_action_serde() {
        let json = serde_json::to_string(&BehaviorAction::WishlistAdd).unwrap();
        assert_eq!(json, "\"wishlist_add\"");

        let parsed: BehaviorAction = serde_json::from_str("\"cart_add\"").unwrap();
        assert_eq!(parsed, BehaviorAction::CartAdd);
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!("refunded".parse::<OrderStatus>().is_err());
        assert!("paypal".parse::<PaymentMethod>().is_err());
        assert!("hover".parse::<BehaviorAction>().is_err());
    }
}
