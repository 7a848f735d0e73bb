use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub notes: Option<String>,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line item joined with the current catalog row for display. The product
/// columns are NULL when the product was deleted after purchase.
#[derive(sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub product_name: Option<String>,
    pub product_sku: Option<String>,
}

#[derive(sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub amount: Decimal,
    pub status: String,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Admin listing: optional status filter and text search over the order
/// number and customer contact fields.
pub async fn list(
    pool: &PgPool,
    status: Option<&str>,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>, sqlx::Error> {
    let pattern = search.map(|s| format!("%{}%", s.trim()));
    sqlx::query_as(
        "SELECT o.* FROM orders o
         JOIN customers c ON c.id = o.customer_id
         WHERE ($1::text IS NULL OR o.status = $1)
           AND ($2::text IS NULL
                OR o.order_number ILIKE $2 OR c.email ILIKE $2
                OR c.first_name ILIKE $2 OR c.last_name ILIKE $2)
         ORDER BY o.created_at DESC, o.id DESC
         LIMIT $3 OFFSET $4",
    )
    .bind(status)
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count(
    pool: &PgPool,
    status: Option<&str>,
    search: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let pattern = search.map(|s| format!("%{}%", s.trim()));
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders o
         JOIN customers c ON c.id = o.customer_id
         WHERE ($1::text IS NULL OR o.status = $1)
           AND ($2::text IS NULL
                OR o.order_number ILIKE $2 OR c.email ILIKE $2
                OR c.first_name ILIKE $2 OR c.last_name ILIKE $2)",
    )
    .bind(status)
    .bind(pattern)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn update_status(
    pool: &PgPool,
    id: i64,
    status: &str,
    notes: Option<&str>,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE orders
         SET status = $1, notes = COALESCE($2::text, notes), updated_at = now()
         WHERE id = $3
         RETURNING *",
    )
    .bind(status)
    .bind(notes)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn items_for_orders(pool: &PgPool, order_ids: &[i64]) -> Result<Vec<OrderItem>, sqlx::Error> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as(
        "SELECT i.id, i.order_id, i.product_id, i.quantity, i.unit_price, i.total_price,
                p.name AS product_name, p.sku AS product_sku
         FROM order_items i
         LEFT JOIN products p ON p.id = i.product_id
         WHERE i.order_id = ANY($1)
         ORDER BY i.order_id, i.id",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await
}

pub async fn payments_for_orders(
    pool: &PgPool,
    order_ids: &[i64],
) -> Result<Vec<Payment>, sqlx::Error> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as(
        "SELECT * FROM payments WHERE order_id = ANY($1) ORDER BY order_id, created_at",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await
}
