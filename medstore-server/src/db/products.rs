use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub short_desc: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub currency: String,
    pub stock: i32,
    pub image_urls: serde_json::Value,
    pub specifications: Option<serde_json::Value>,
    pub documents: Option<serde_json::Value>,
    pub is_active: bool,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin listing: all products, optional text search and category filter.
pub async fn list(
    pool: &PgPool,
    search: Option<&str>,
    category_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    let pattern = search.map(like_pattern);
    sqlx::query_as(
        "SELECT * FROM products
         WHERE ($1::text IS NULL OR name ILIKE $1 OR sku ILIKE $1 OR description ILIKE $1)
           AND ($2::bigint IS NULL OR category_id = $2)
         ORDER BY created_at DESC, id DESC
         LIMIT $3 OFFSET $4",
    )
    .bind(pattern)
    .bind(category_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count(
    pool: &PgPool,
    search: Option<&str>,
    category_id: Option<i64>,
) -> Result<i64, sqlx::Error> {
    let pattern = search.map(like_pattern);
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM products
         WHERE ($1::text IS NULL OR name ILIKE $1 OR sku ILIKE $1 OR description ILIKE $1)
           AND ($2::bigint IS NULL OR category_id = $2)",
    )
    .bind(pattern)
    .bind(category_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Storefront listing: active products only.
pub async fn list_active(
    pool: &PgPool,
    category_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM products
         WHERE is_active AND ($1::bigint IS NULL OR category_id = $1)
         ORDER BY created_at DESC, id DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(category_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_active(pool: &PgPool, category_id: Option<i64>) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM products WHERE is_active AND ($1::bigint IS NULL OR category_id = $1)",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_active_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE slug = $1 AND is_active")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_sku(pool: &PgPool, sku: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE sku = $1")
        .bind(sku)
        .fetch_optional(pool)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    name: &str,
    slug: &str,
    description: Option<&str>,
    short_desc: Option<&str>,
    sku: &str,
    price: Decimal,
    currency: &str,
    stock: i32,
    image_urls: &serde_json::Value,
    specifications: Option<&serde_json::Value>,
    documents: Option<&serde_json::Value>,
    is_active: bool,
    category_id: i64,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO products
             (name, slug, description, short_desc, sku, price, currency, stock,
              image_urls, specifications, documents, is_active, category_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
         RETURNING *",
    )
    .bind(name)
    .bind(slug)
    .bind(description)
    .bind(short_desc)
    .bind(sku)
    .bind(price)
    .bind(currency)
    .bind(stock)
    .bind(image_urls)
    .bind(specifications)
    .bind(documents)
    .bind(is_active)
    .bind(category_id)
    .fetch_one(pool)
    .await
}

/// Whether any order line item references this product. Line items carry no
/// foreign key, so deletion is guarded here instead of by the schema.
pub async fn has_order_items(pool: &PgPool, product_id: i64) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM order_items WHERE product_id = $1)")
            .bind(product_id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Keyword search over active products for the chat assistant. Patterns are
/// `%kw%` fragments; a product matches when any keyword hits name,
/// description, or short description.
pub async fn search_active(
    pool: &PgPool,
    patterns: &[String],
    limit: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    if patterns.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as(
        "SELECT * FROM products
         WHERE is_active
           AND (name ILIKE ANY($1) OR description ILIKE ANY($1) OR short_desc ILIKE ANY($1))
         ORDER BY name
         LIMIT $2",
    )
    .bind(patterns)
    .bind(limit)
    .fetch_all(pool)
    .await
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("endoscope"), "%endoscope%");
        assert_eq!(like_pattern("  x-ray "), "%x-ray%");
    }
}
