//! Catalog repository: filtered listings, detail fetches, reference data.
//!
//! The listing and its total-count query share one predicate builder
//! ([`push_filters`]) so the two can never drift apart.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use electro_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::{Brand, Category, Pagination, ProductImage, ProductSummary};

/// Columns selected for every product row, with the category join.
const PRODUCT_COLUMNS: &str = "p.id, p.slug, p.sku, p.name, p.description, p.short_description, \
     p.brand, p.price, p.stock_quantity, p.sales_count, p.views, p.rating_avg, p.is_featured, \
     p.category_id, c.name AS category_name, c.slug AS category_slug, p.created_at";

/// Aggregated tag names for grouped listing queries.
const TAGS_COLUMN: &str =
    "COALESCE(array_agg(DISTINCT t.name) FILTER (WHERE t.name IS NOT NULL), ARRAY[]::text[]) AS tags";

/// Joins shared by the listing and its count query.
const LIST_JOINS: &str = " FROM products p \
     LEFT JOIN categories c ON p.category_id = c.id \
     LEFT JOIN product_tags pt ON p.id = pt.product_id \
     LEFT JOIN tags t ON pt.tag_id = t.id";

/// Sort direction for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "ASC")]
    Asc,
    #[default]
    #[serde(alias = "DESC")]
    Desc,
}

impl SortOrder {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Catalog listing filters.
///
/// `sort` is checked against an allow-list; anything else falls back to
/// newest-first.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    /// Category slug, exact match.
    pub category: Option<String>,
    /// Substring match across name, description and short description.
    pub search: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Brand, exact match.
    pub brand: Option<String>,
    /// Only featured products.
    pub featured: bool,
    /// Requested sort key.
    pub sort: Option<String>,
    /// Sort direction.
    pub order: SortOrder,
    /// 1-indexed page number.
    pub page: i64,
    /// Page size.
    pub per_page: i64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            min_price: None,
            max_price: None,
            brand: None,
            featured: false,
            sort: None,
            order: SortOrder::Desc,
            page: 1,
            per_page: 12,
        }
    }
}

/// Sort keys a caller may request; anything else silently falls back.
const ALLOWED_SORT_KEYS: [&str; 5] = ["name", "price", "rating_avg", "created_at", "sales_count"];

/// Build the ORDER BY expression from an allow-listed sort key.
fn order_clause(sort: Option<&str>, order: SortOrder) -> String {
    match sort {
        Some(key) if ALLOWED_SORT_KEYS.contains(&key) => format!("p.{key} {}", order.as_sql()),
        _ => "p.created_at DESC".to_string(),
    }
}

/// Append the filter predicate to a query.
///
/// Used by both the listing query and its count query; keeping a single
/// builder guarantees the two stay in sync.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    qb.push(" WHERE p.is_active = TRUE");

    if let Some(category) = &filter.category {
        qb.push(" AND c.slug = ").push_bind(category.clone());
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.short_description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(min_price) = filter.min_price {
        qb.push(" AND p.price >= ").push_bind(min_price);
    }

    if let Some(max_price) = filter.max_price {
        qb.push(" AND p.price <= ").push_bind(max_price);
    }

    if let Some(brand) = &filter.brand {
        qb.push(" AND p.brand = ").push_bind(brand.clone());
    }

    if filter.featured {
        qb.push(" AND p.is_featured = TRUE");
    }
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products matching the filter, with pagination metadata.
    ///
    /// Products come back with their image lists attached (primary image
    /// first). The total count runs as a second query over the identical
    /// predicate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails. Image
    /// lookups degrade to empty lists instead of failing the listing.
    pub async fn list(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<ProductSummary>, Pagination), RepositoryError> {
        let page = filter.page.max(1);
        let per_page = filter.per_page.max(1);
        let offset = (page - 1) * per_page;

        let mut qb = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS}, {TAGS_COLUMN}{LIST_JOINS}"));
        push_filters(&mut qb, filter);
        qb.push(" GROUP BY p.id, c.name, c.slug");
        qb.push(" ORDER BY ")
            .push(order_clause(filter.sort.as_deref(), filter.order));
        qb.push(" LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind(offset);

        let mut products: Vec<ProductSummary> =
            qb.build_query_as().fetch_all(self.pool).await?;

        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(DISTINCT p.id){LIST_JOINS}"));
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(self.pool).await?;

        self.attach_images(&mut products).await;

        Ok((products, Pagination::new(page, per_page, total)))
    }

    /// Fetch an active product by numeric id or slug, with tags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id_or_slug(
        &self,
        identifier: &str,
    ) -> Result<Option<ProductSummary>, RepositoryError> {
        let numeric_id: Option<i32> = identifier.parse().ok();

        let mut product = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS}, {TAGS_COLUMN}{LIST_JOINS} \
             WHERE p.is_active = TRUE AND (p.slug = $1 OR p.id = $2) \
             GROUP BY p.id, c.name, c.slug"
        ))
        .bind(identifier)
        .bind(numeric_id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(product) = product.as_mut() {
            product.images = self.images_or_empty(product.id).await;
        }

        Ok(product)
    }

    /// Fetch an active product by id, without tags or images.
    ///
    /// Used by order validation, which only needs price, stock and the
    /// snapshot columns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductSummary>, RepositoryError> {
        let product = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             LEFT JOIN categories c ON p.category_id = c.id \
             WHERE p.is_active = TRUE AND p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Related products: same category, excluding the product itself,
    /// best-rated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn related(
        &self,
        id: ProductId,
        category_id: Option<CategoryId>,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let Some(category_id) = category_id else {
            return Ok(Vec::new());
        };

        let mut products = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             LEFT JOIN categories c ON p.category_id = c.id \
             WHERE p.is_active = TRUE AND p.id <> $1 AND p.category_id = $2 \
             ORDER BY p.rating_avg DESC, p.sales_count DESC \
             LIMIT $3"
        ))
        .bind(id)
        .bind(category_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.attach_images(&mut products).await;
        Ok(products)
    }

    /// Featured products, best-rated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<ProductSummary>, RepositoryError> {
        let mut products = sqlx::query_as::<_, ProductSummary>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             LEFT JOIN categories c ON p.category_id = c.id \
             WHERE p.is_active = TRUE AND p.is_featured = TRUE \
             ORDER BY p.rating_avg DESC, p.sales_count DESC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        self.attach_images(&mut products).await;
        Ok(products)
    }

    /// Active categories with their active product counts, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name, c.slug, COUNT(p.id) AS product_count \
             FROM categories c \
             LEFT JOIN products p ON c.id = p.category_id AND p.is_active = TRUE \
             WHERE c.is_active = TRUE \
             GROUP BY c.id \
             ORDER BY c.name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Distinct brands with their active product counts, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn brands(&self) -> Result<Vec<Brand>, RepositoryError> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT brand, COUNT(*) AS product_count \
             FROM products \
             WHERE is_active = TRUE AND brand IS NOT NULL \
             GROUP BY brand \
             ORDER BY brand ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(brands)
    }

    /// Ordered image list for a product, primary image first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images(&self, id: ProductId) -> Result<Vec<ProductImage>, RepositoryError> {
        let images = sqlx::query_as::<_, ProductImage>(
            "SELECT id, product_id, image_url, alt_text, is_primary, sort_order \
             FROM product_images \
             WHERE product_id = $1 \
             ORDER BY is_primary DESC, sort_order ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }

    /// Image list, degrading to empty on failure.
    pub async fn images_or_empty(&self, id: ProductId) -> Vec<ProductImage> {
        match self.images(id).await {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "failed to load product images");
                Vec::new()
            }
        }
    }

    /// Attach image lists to a batch of products, one query per product.
    pub async fn attach_images(&self, products: &mut [ProductSummary]) {
        for product in products.iter_mut() {
            product.images = self.images_or_empty(product.id).await;
        }
    }

    /// Bump the view counter. An un-gated side effect of the detail fetch;
    /// repeated reads inflate the counter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn increment_views(&self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE products SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_allow_list() {
        assert_eq!(
            order_clause(Some("price"), SortOrder::Asc),
            "p.price ASC"
        );
        assert_eq!(
            order_clause(Some("sales_count"), SortOrder::Desc),
            "p.sales_count DESC"
        );
    }

    #[test]
    fn test_order_clause_falls_back_on_unknown_key() {
        // Unknown keys silently fall back to newest-first.
        assert_eq!(
            order_clause(Some("stock_quantity"), SortOrder::Asc),
            "p.created_at DESC"
        );
        assert_eq!(
            order_clause(Some("1; DROP TABLE products"), SortOrder::Desc),
            "p.created_at DESC"
        );
        assert_eq!(order_clause(None, SortOrder::Asc), "p.created_at DESC");
    }

    #[test]
    fn test_list_and_count_share_predicate() {
        let filter = ProductFilter {
            category: Some("laptops".to_string()),
            search: Some("gaming".to_string()),
            min_price: Some(Decimal::from(100)),
            max_price: Some(Decimal::from(2000)),
            brand: Some("Acme".to_string()),
            featured: true,
            ..ProductFilter::default()
        };

        let mut list_qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
        let mut count_qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
        push_filters(&mut list_qb, &filter);
        push_filters(&mut count_qb, &filter);

        assert_eq!(list_qb.sql(), count_qb.sql());
    }

    #[test]
    fn test_no_filters_predicate_is_active_only() {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
        push_filters(&mut qb, &ProductFilter::default());
        assert_eq!(qb.sql(), " WHERE p.is_active = TRUE");
    }

    #[test]
    fn test_search_binds_three_patterns() {
        let filter = ProductFilter {
            search: Some("mouse".to_string()),
            ..ProductFilter::default()
        };
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
        push_filters(&mut qb, &filter);
        let sql = qb.sql();
        assert!(sql.contains("p.name ILIKE $1"));
        assert!(sql.contains("p.description ILIKE $2"));
        assert!(sql.contains("p.short_description ILIKE $3"));
    }
}
