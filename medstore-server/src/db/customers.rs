use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Customer row with lifetime purchase stats derived from non-cancelled
/// orders. Stats are computed on read, never stored.
#[derive(sqlx::FromRow)]
pub struct CustomerWithStats {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub total_spent: Decimal,
    pub order_count: i64,
    pub last_order_at: Option<DateTime<Utc>>,
}

pub async fn list_with_stats(
    pool: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<CustomerWithStats>, sqlx::Error> {
    let pattern = search.map(|s| format!("%{}%", s.trim()));
    sqlx::query_as(
        "SELECT c.id, c.email, c.first_name, c.last_name, c.phone, c.company, c.created_at,
                COALESCE(o.total_spent, 0) AS total_spent,
                COALESCE(o.order_count, 0) AS order_count,
                o.last_order_at
         FROM customers c
         LEFT JOIN (
             SELECT customer_id,
                    SUM(total_amount) AS total_spent,
                    COUNT(*) AS order_count,
                    MAX(created_at) AS last_order_at
             FROM orders
             WHERE status <> 'cancelled'
             GROUP BY customer_id
         ) o ON o.customer_id = c.id
         WHERE ($1::text IS NULL
                OR c.email ILIKE $1 OR c.first_name ILIKE $1
                OR c.last_name ILIKE $1 OR c.company ILIKE $1)
         ORDER BY c.created_at DESC, c.id DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
    let pattern = search.map(|s| format!("%{}%", s.trim()));
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM customers c
         WHERE ($1::text IS NULL
                OR c.email ILIKE $1 OR c.first_name ILIKE $1
                OR c.last_name ILIKE $1 OR c.company ILIKE $1)",
    )
    .bind(pattern)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Customer>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as("SELECT * FROM customers WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}
