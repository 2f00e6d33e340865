//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::db::{ProductFilter, ProductRepository, SortOrder};
use crate::error::{AppError, Result};
use crate::models::{Brand, Category, ProductDetail, ProductSummary};
use crate::response::{ApiResponse, ListResponse};
use crate::state::AppState;

/// How many related products a detail fetch returns.
const RELATED_PRODUCTS_LIMIT: i64 = 4;

/// Catalog listing query parameters.
///
/// `q` is the search alias used by the dedicated search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub brand: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ProductListQuery {
    fn into_filter(self, default_per_page: i64) -> ProductFilter {
        ProductFilter {
            category: self.category,
            search: self.search,
            min_price: self.min_price,
            max_price: self.max_price,
            brand: self.brand,
            featured: self.featured.unwrap_or(false),
            sort: self.sort,
            order: self.order.unwrap_or_default(),
            page: self.page.unwrap_or(1),
            per_page: self.limit.unwrap_or(default_per_page),
        }
    }
}

/// A plain limit parameter.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// `GET /api/products`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ListResponse<ProductSummary>>> {
    let filter = query.into_filter(state.config().store.items_per_page);
    let (products, pagination) = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(ListResponse::ok(products, pagination))
}

/// `GET /api/search`
pub async fn search(
    State(state): State<AppState>,
    Query(mut query): Query<ProductListQuery>,
) -> Result<Json<ListResponse<ProductSummary>>> {
    query.search = query.q.take().or(query.search);

    let filter = query.into_filter(state.config().store.items_per_page);
    let (products, pagination) = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(ListResponse::ok(products, pagination))
}

/// `GET /api/products/{identifier}`
///
/// Fetch by numeric id or slug. Reading a product bumps its view counter
/// as an un-gated side effect; counter failures never fail the read.
pub async fn show(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<ApiResponse<ProductDetail>>> {
    let repo = ProductRepository::new(state.pool());

    let Some(product) = repo.get_by_id_or_slug(&identifier).await? else {
        return Err(AppError::NotFound("Product not found".to_string()));
    };

    let related_products = repo
        .related(product.id, product.category_id, RELATED_PRODUCTS_LIMIT)
        .await?;

    if let Err(e) = repo.increment_views(product.id).await {
        tracing::debug!(product_id = %product.id, error = %e, "view counter bump failed");
    }

    Ok(ApiResponse::ok(ProductDetail {
        product,
        related_products,
    }))
}

/// `GET /api/products/featured`
pub async fn featured(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<ProductSummary>>>> {
    let limit = query.limit.unwrap_or(state.config().store.featured_limit);
    let products = ProductRepository::new(state.pool()).featured(limit).await?;
    Ok(ApiResponse::ok(products))
}

/// `GET /api/categories`
pub async fn categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>> {
    let categories = ProductRepository::new(state.pool()).categories().await?;
    Ok(ApiResponse::ok(categories))
}

/// `GET /api/brands`
pub async fn brands(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Brand>>>> {
    let brands = ProductRepository::new(state.pool()).brands().await?;
    Ok(ApiResponse::ok(brands))
}
