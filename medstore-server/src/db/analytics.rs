//! Aggregate queries behind the sales analytics report.
//!
//! All aggregation happens in the database: the engine ships `GROUP BY`
//! queries and reads back finished rows. Revenue sums come back as
//! `NUMERIC`, never floats, so totals are exact.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct SummaryRow {
    pub total_revenue: Decimal,
    pub total_orders: i64,
}

#[derive(sqlx::FromRow)]
pub struct StatusBreakdownRow {
    pub status: String,
    pub count: i64,
    pub revenue: Decimal,
}

#[derive(sqlx::FromRow)]
pub struct DailySalesRow {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub orders: i64,
}

#[derive(sqlx::FromRow)]
pub struct TopProductRow {
    pub product_id: i64,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

/// Current catalog attributes for products appearing in the ranking.
#[derive(sqlx::FromRow)]
pub struct ProductDetailRow {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
}

#[derive(sqlx::FromRow)]
pub struct RecentOrderRow {
    pub id: i64,
    pub order_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub customer_email: String,
    pub customer_first_name: String,
    pub customer_last_name: String,
}

/// Revenue and order count over non-cancelled orders in the window.
pub async fn summary(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<SummaryRow, sqlx::Error> {
    sqlx::query_as(
        "SELECT COALESCE(SUM(total_amount), 0) AS total_revenue,
                COUNT(*) AS total_orders
         FROM orders
         WHERE status <> 'cancelled' AND created_at >= $1",
    )
    .bind(cutoff)
    .fetch_one(pool)
    .await
}

/// All windowed orders grouped by status, cancelled included.
pub async fn orders_by_status(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<Vec<StatusBreakdownRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT status, COUNT(*) AS count, COALESCE(SUM(total_amount), 0) AS revenue
         FROM orders
         WHERE created_at >= $1
         GROUP BY status
         ORDER BY status",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await
}

/// Non-cancelled windowed orders bucketed by UTC calendar date. Days with
/// no orders produce no row; ordering is newest first.
pub async fn daily_sales(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<Vec<DailySalesRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT (created_at AT TIME ZONE 'UTC')::date AS date,
                COALESCE(SUM(total_amount), 0) AS revenue,
                COUNT(*) AS orders
         FROM orders
         WHERE status <> 'cancelled' AND created_at >= $1
         GROUP BY (created_at AT TIME ZONE 'UTC')::date
         ORDER BY date DESC",
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await
}

/// Line items of non-cancelled windowed orders grouped by product, ranked by
/// revenue with a deterministic id tie-break, top `limit`.
pub async fn top_products(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<TopProductRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT i.product_id,
                SUM(i.quantity) AS total_quantity,
                COALESCE(SUM(i.total_price), 0) AS total_revenue
         FROM order_items i
         JOIN orders o ON o.id = i.order_id
         WHERE o.status <> 'cancelled' AND o.created_at >= $1
         GROUP BY i.product_id
         ORDER BY total_revenue DESC, i.product_id ASC
         LIMIT $2",
    )
    .bind(cutoff)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Point lookup over the ranked product ids. Deleted products simply do not
/// come back; the caller attaches `None` for them.
pub async fn products_by_ids(
    pool: &PgPool,
    ids: &[i64],
) -> Result<Vec<ProductDetailRow>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as("SELECT id, name, sku, price FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Most recent orders regardless of status or window, newest first with an
/// id tie-break.
pub async fn recent_orders(pool: &PgPool, limit: i64) -> Result<Vec<RecentOrderRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT o.id, o.order_number, o.status, o.total_amount, o.created_at,
                c.email AS customer_email,
                c.first_name AS customer_first_name,
                c.last_name AS customer_last_name
         FROM orders o
         JOIN customers c ON c.id = o.customer_id
         ORDER BY o.created_at DESC, o.id DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
