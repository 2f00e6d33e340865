//! Catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use electro_core::{CategoryId, ImageId, ProductId};

/// A catalog product as returned by listing and recommendation queries.
///
/// Carries the joined category columns; `tags` and `images` are filled only
/// by queries that fetch them and default to empty elsewhere.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductSummary {
    pub id: ProductId,
    pub slug: String,
    pub sku: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub brand: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub sales_count: i32,
    pub views: i32,
    pub rating_avg: Decimal,
    pub is_featured: bool,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Tag names, present on listing/detail queries only.
    #[sqlx(default)]
    pub tags: Vec<String>,
    /// Ordered image list (primary first), attached after the row fetch.
    #[sqlx(skip)]
    pub images: Vec<ProductImage>,
}

/// A product detail response: the product plus its related products.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductSummary,
    pub related_products: Vec<ProductSummary>,
}

/// One product image.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
}

/// A category with its active product count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub product_count: i64,
}

/// A brand facet with its active product count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Brand {
    pub brand: String,
    pub product_count: i64,
}

/// Pagination metadata for listing responses.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    /// 1-indexed page number.
    pub current_page: i64,
    /// Page size.
    pub per_page: i64,
    /// Total rows matching the filter.
    pub total: i64,
    /// Total pages (ceiling of total / `per_page`).
    pub total_pages: i64,
}

impl Pagination {
    /// Build pagination metadata from a total row count.
    #[must_use]
    pub const fn new(current_page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };
        Self {
            current_page,
            per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_up() {
        let p = Pagination::new(1, 12, 25);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_pagination_exact_fit() {
        let p = Pagination::new(2, 12, 24);
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::new(1, 12, 0);
        assert_eq!(p.total_pages, 0);
    }
}
