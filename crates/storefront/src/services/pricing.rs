//! Order pricing arithmetic.
//!
//! Pure functions over `Decimal`, kept separate from the order engine so
//! the money math is testable without a database. All derived amounts are
//! rounded to 2 decimal places.

use rust_decimal::Decimal;

use electro_core::DiscountType;

use crate::config::StoreConfig;
use crate::models::Coupon;

/// The monetary breakdown of an order.
///
/// `total` always equals `subtotal + tax + shipping - discount`; it is
/// computed here once and persisted, never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingBreakdown {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Price an order from its subtotal and an already-computed discount.
#[must_use]
pub fn compute(subtotal: Decimal, discount: Decimal, store: &StoreConfig) -> PricingBreakdown {
    let tax = tax_for(subtotal, store.tax_rate);
    let shipping = shipping_for(subtotal, store);
    let total = subtotal + tax + shipping - discount;

    PricingBreakdown {
        subtotal,
        tax,
        shipping,
        discount,
        total,
    }
}

/// Tax on a subtotal, given a percentage rate.
#[must_use]
pub fn tax_for(subtotal: Decimal, rate_percent: Decimal) -> Decimal {
    (subtotal * rate_percent / Decimal::from(100)).round_dp(2)
}

/// Shipping fee: zero at or above the free-shipping threshold, the flat
/// fee below it.
#[must_use]
pub fn shipping_for(subtotal: Decimal, store: &StoreConfig) -> Decimal {
    if subtotal >= store.free_shipping_threshold {
        Decimal::ZERO
    } else {
        store.shipping_fee
    }
}

/// Discount a valid coupon grants on a subtotal.
///
/// Returns `None` when the subtotal is below the coupon's minimum order
/// amount. Percentage discounts are capped at `maximum_discount` when one
/// is set; fixed discounts are taken as-is.
#[must_use]
pub fn coupon_discount(coupon: &Coupon, subtotal: Decimal) -> Option<Decimal> {
    if subtotal < coupon.minimum_order_amount {
        return None;
    }

    let discount = match coupon.discount_type {
        DiscountType::Percentage => {
            let raw = (subtotal * coupon.discount_value / Decimal::from(100)).round_dp(2);
            match coupon.maximum_discount {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        }
        DiscountType::Fixed => coupon.discount_value,
    };

    Some(discount)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use electro_core::CouponId;

    use super::*;

    fn store() -> StoreConfig {
        StoreConfig::default()
    }

    fn coupon(discount_type: DiscountType, value: i64) -> Coupon {
        Coupon {
            id: CouponId::new(1),
            code: "SAVE".to_string(),
            discount_type,
            discount_value: Decimal::from(value),
            minimum_order_amount: Decimal::ZERO,
            maximum_discount: None,
            starts_at: None,
            expires_at: None,
            usage_limit: None,
            used_count: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_worked_example() {
        // cart = [{qty 2, price 100}], tax 12.5%, threshold 1000, fee 50
        let breakdown = compute(Decimal::from(200), Decimal::ZERO, &store());
        assert_eq!(breakdown.subtotal, Decimal::from(200));
        assert_eq!(breakdown.tax, Decimal::from(25));
        assert_eq!(breakdown.shipping, Decimal::from(50));
        assert_eq!(breakdown.total, Decimal::from(275));
    }

    #[test]
    fn test_total_identity_holds() {
        let breakdown = compute(Decimal::from(1234), Decimal::from(34), &store());
        assert_eq!(
            breakdown.total,
            breakdown.subtotal + breakdown.tax + breakdown.shipping - breakdown.discount
        );
    }

    #[test]
    fn test_shipping_below_threshold() {
        assert_eq!(shipping_for(Decimal::from(999), &store()), Decimal::from(50));
    }

    #[test]
    fn test_shipping_free_at_threshold() {
        assert_eq!(shipping_for(Decimal::from(1000), &store()), Decimal::ZERO);
        assert_eq!(shipping_for(Decimal::from(5000), &store()), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_discount() {
        let c = coupon(DiscountType::Percentage, 10);
        assert_eq!(
            coupon_discount(&c, Decimal::from(200)),
            Some(Decimal::from(20))
        );
    }

    #[test]
    fn test_percentage_discount_capped() {
        let mut c = coupon(DiscountType::Percentage, 50);
        c.maximum_discount = Some(Decimal::from(30));
        // 50% of 200 = 100, capped at 30.
        assert_eq!(
            coupon_discount(&c, Decimal::from(200)),
            Some(Decimal::from(30))
        );
    }

    #[test]
    fn test_percentage_discount_under_cap_unchanged() {
        let mut c = coupon(DiscountType::Percentage, 5);
        c.maximum_discount = Some(Decimal::from(30));
        assert_eq!(
            coupon_discount(&c, Decimal::from(200)),
            Some(Decimal::from(10))
        );
    }

    #[test]
    fn test_fixed_discount() {
        let c = coupon(DiscountType::Fixed, 25);
        assert_eq!(
            coupon_discount(&c, Decimal::from(200)),
            Some(Decimal::from(25))
        );
    }

    #[test]
    fn test_below_minimum_never_discounts() {
        let mut c = coupon(DiscountType::Fixed, 25);
        c.minimum_order_amount = Decimal::from(500);
        assert_eq!(coupon_discount(&c, Decimal::from(499)), None);
        // At the minimum it applies.
        assert_eq!(
            coupon_discount(&c, Decimal::from(500)),
            Some(Decimal::from(25))
        );
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        // 12.5% of 0.10 = 0.0125 -> 0.01
        assert_eq!(
            tax_for(Decimal::new(10, 2), Decimal::new(125, 1)),
            Decimal::new(1, 2)
        );
    }
}
