//! Sales analytics report
//!
//! GET /api/admin/analytics?period=<days>
//!
//! One handler, five read-only views over the order history: summary,
//! status breakdown, daily sales, product ranking, recent orders. The
//! heavy lifting happens in SQL (`db::analytics`); this module normalizes
//! the window parameter, attaches catalog details to the ranking, and
//! shapes the response. Any failed query fails the whole report.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use std::collections::HashMap;

use super::ApiResult;
use crate::db;
use crate::db::analytics::{
    DailySalesRow, ProductDetailRow, RecentOrderRow, StatusBreakdownRow, SummaryRow, TopProductRow,
};
use crate::db::orders::OrderItem;
use crate::state::AppState;

const DEFAULT_WINDOW_DAYS: i64 = 30;
const TOP_PRODUCTS_LIMIT: i64 = 10;
const RECENT_ORDERS_LIMIT: i64 = 10;

#[derive(Deserialize)]
pub struct AnalyticsQuery {
    /// Window size in days. Absent, non-numeric, zero, or negative values
    /// fall back to the default rather than rejecting the request.
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub period_days: i64,
    pub summary: Summary,
    pub orders_by_status: Vec<StatusBreakdown>,
    pub daily_sales: Vec<DailySales>,
    pub top_products: Vec<TopProduct>,
    pub recent_orders: Vec<RecentOrder>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub average_order_value: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub status: String,
    pub count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub orders: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: i64,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
    /// Current catalog attributes; `None` when the product was deleted
    /// after the orders were placed.
    pub product: Option<ProductInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: i64,
    pub order_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub customer: RecentCustomer,
    pub items: Vec<RecentItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCustomer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub product_name: Option<String>,
    pub product_sku: Option<String>,
}

pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<AnalyticsReport> {
    let period_days = normalize_window_days(query.period.as_deref());
    let cutoff = window_cutoff(Utc::now(), period_days);

    let summary_row = db::analytics::summary(&state.pool, cutoff)
        .await
        .map_err(query_failed)?;
    let status_rows = db::analytics::orders_by_status(&state.pool, cutoff)
        .await
        .map_err(query_failed)?;
    let daily_rows = db::analytics::daily_sales(&state.pool, cutoff)
        .await
        .map_err(query_failed)?;

    let top_rows = rank_products(
        db::analytics::top_products(&state.pool, cutoff, TOP_PRODUCTS_LIMIT)
            .await
            .map_err(query_failed)?,
    );
    let ranked_ids: Vec<i64> = top_rows.iter().map(|r| r.product_id).collect();
    let details = db::analytics::products_by_ids(&state.pool, &ranked_ids)
        .await
        .map_err(query_failed)?;

    // Recent orders deliberately ignore the window: the view answers
    // "what happened last", not "what happened last N days".
    let recent_rows = db::analytics::recent_orders(&state.pool, RECENT_ORDERS_LIMIT)
        .await
        .map_err(query_failed)?;
    let recent_ids: Vec<i64> = recent_rows.iter().map(|r| r.id).collect();
    let recent_items = db::orders::items_for_orders(&state.pool, &recent_ids)
        .await
        .map_err(query_failed)?;

    Ok(Json(AnalyticsReport {
        period_days,
        summary: build_summary(&summary_row),
        orders_by_status: status_rows.into_iter().map(status_breakdown).collect(),
        daily_sales: daily_rows.into_iter().map(daily_sales).collect(),
        top_products: attach_product_details(top_rows, details),
        recent_orders: assemble_recent_orders(recent_rows, recent_items),
    }))
}

fn query_failed(e: sqlx::Error) -> AppError {
    tracing::error!("Analytics query failed: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// Parse the window parameter; anything unusable falls back to the default.
fn normalize_window_days(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_WINDOW_DAYS)
}

/// Subtract the window from `now`. There is no upper bound on the window:
/// one that reaches past the calendar saturates to the earliest
/// representable instant, which covers every order there is.
fn window_cutoff(now: DateTime<Utc>, period_days: i64) -> DateTime<Utc> {
    chrono::Duration::try_days(period_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Ranking rule: revenue descending, equal revenue broken by product id
/// ascending. The query already orders this way; the rule lives here so it
/// is stated and testable in one place.
fn rank_products(mut rows: Vec<TopProductRow>) -> Vec<TopProductRow> {
    rows.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then(a.product_id.cmp(&b.product_id))
    });
    rows
}

/// Average order value is 0 for an empty window, never NaN or an error.
fn build_summary(row: &SummaryRow) -> Summary {
    let average_order_value = if row.total_orders > 0 {
        (row.total_revenue / Decimal::from(row.total_orders)).round_dp(2)
    } else {
        Decimal::ZERO
    };
    Summary {
        total_revenue: row.total_revenue,
        total_orders: row.total_orders,
        average_order_value,
    }
}

fn status_breakdown(row: StatusBreakdownRow) -> StatusBreakdown {
    StatusBreakdown {
        status: row.status,
        count: row.count,
        revenue: row.revenue,
    }
}

fn daily_sales(row: DailySalesRow) -> DailySales {
    DailySales {
        date: row.date,
        revenue: row.revenue,
        orders: row.orders,
    }
}

/// Attach catalog details to the ranked rows, preserving SQL ordering.
/// Products deleted since the orders were placed stay in the ranking with
/// `product: None`.
fn attach_product_details(
    rows: Vec<TopProductRow>,
    details: Vec<ProductDetailRow>,
) -> Vec<TopProduct> {
    let mut by_id: HashMap<i64, ProductDetailRow> =
        details.into_iter().map(|d| (d.id, d)).collect();
    rows.into_iter()
        .map(|row| TopProduct {
            product_id: row.product_id,
            total_quantity: row.total_quantity,
            total_revenue: row.total_revenue,
            product: by_id.remove(&row.product_id).map(|d| ProductInfo {
                id: d.id,
                name: d.name,
                sku: d.sku,
                price: d.price,
            }),
        })
        .collect()
}

/// Zip the recent order rows with their line items, preserving order.
fn assemble_recent_orders(rows: Vec<RecentOrderRow>, items: Vec<OrderItem>) -> Vec<RecentOrder> {
    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    rows.into_iter()
        .map(|row| RecentOrder {
            customer: RecentCustomer {
                email: row.customer_email,
                first_name: row.customer_first_name,
                last_name: row.customer_last_name,
            },
            items: items_by_order
                .remove(&row.id)
                .unwrap_or_default()
                .into_iter()
                .map(|item| RecentItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total_price: item.total_price,
                    product_name: item.product_name,
                    product_sku: item.product_sku,
                })
                .collect(),
            id: row.id,
            order_number: row.order_number,
            status: row.status,
            total_amount: row.total_amount,
            created_at: row.created_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_normalize_window_days() {
        assert_eq!(normalize_window_days(None), 30);
        assert_eq!(normalize_window_days(Some("")), 30);
        assert_eq!(normalize_window_days(Some("abc")), 30);
        assert_eq!(normalize_window_days(Some("0")), 30);
        assert_eq!(normalize_window_days(Some("-5")), 30);
        assert_eq!(normalize_window_days(Some("7")), 7);
        assert_eq!(normalize_window_days(Some(" 365 ")), 365);
        // No upper bound: a huge window is just a wide report
        assert_eq!(normalize_window_days(Some("100000")), 100000);
    }

    #[test]
    fn test_window_cutoff_saturates_on_huge_window() {
        let now = Utc::now();
        assert_eq!(window_cutoff(now, 30), now - chrono::Duration::days(30));
        // Windows wider than the calendar must not panic: they clamp to the
        // earliest instant and the report simply covers everything
        assert_eq!(window_cutoff(now, 10_000_000_000), DateTime::<Utc>::MIN_UTC);
        // Large enough that the duration itself is not representable
        assert_eq!(window_cutoff(now, i64::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_rank_products_tie_breaks_by_id_ascending() {
        let rows = vec![
            TopProductRow {
                product_id: 9,
                total_quantity: 1,
                total_revenue: dec("500.00"),
            },
            TopProductRow {
                product_id: 3,
                total_quantity: 4,
                total_revenue: dec("500.00"),
            },
            TopProductRow {
                product_id: 7,
                total_quantity: 2,
                total_revenue: dec("900.00"),
            },
            TopProductRow {
                product_id: 1,
                total_quantity: 8,
                total_revenue: dec("500.00"),
            },
        ];

        let ids: Vec<i64> = rank_products(rows).iter().map(|r| r.product_id).collect();
        // Highest revenue first; the three equal-revenue rows come back in
        // id order regardless of input order
        assert_eq!(ids, vec![7, 1, 3, 9]);
    }

    #[test]
    fn test_build_summary_empty_window() {
        let summary = build_summary(&SummaryRow {
            total_revenue: Decimal::ZERO,
            total_orders: 0,
        });
        assert_eq!(summary.total_revenue, Decimal::ZERO);
        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.average_order_value, Decimal::ZERO);
    }

    #[test]
    fn test_build_summary_average_rounding() {
        let summary = build_summary(&SummaryRow {
            total_revenue: dec("100.00"),
            total_orders: 3,
        });
        assert_eq!(summary.average_order_value, dec("33.33"));
    }

    #[test]
    fn test_attach_product_details_preserves_order_and_handles_deleted() {
        let rows = vec![
            TopProductRow {
                product_id: 7,
                total_quantity: 5,
                total_revenue: dec("500.00"),
            },
            TopProductRow {
                product_id: 3,
                total_quantity: 2,
                total_revenue: dec("500.00"),
            },
            TopProductRow {
                product_id: 9,
                total_quantity: 1,
                total_revenue: dec("10.00"),
            },
        ];
        // Product 3 was deleted from the catalog; only 7 and 9 resolve
        let details = vec![
            ProductDetailRow {
                id: 9,
                name: "Forceps".into(),
                sku: "FRC-01".into(),
                price: dec("10.00"),
            },
            ProductDetailRow {
                id: 7,
                name: "Endoscope".into(),
                sku: "END-01".into(),
                price: dec("100.00"),
            },
        ];

        let ranked = attach_product_details(rows, details);
        let ids: Vec<i64> = ranked.iter().map(|r| r.product_id).collect();
        assert_eq!(ids, vec![7, 3, 9]);
        assert_eq!(ranked[0].product.as_ref().unwrap().name, "Endoscope");
        assert!(ranked[1].product.is_none());
        assert_eq!(ranked[2].product.as_ref().unwrap().sku, "FRC-01");
    }

    #[test]
    fn test_assemble_recent_orders() {
        let rows = vec![
            RecentOrderRow {
                id: 2,
                order_number: "ORD-0002".into(),
                status: "cancelled".into(),
                total_amount: dec("250.00"),
                created_at: Utc::now(),
                customer_email: "a@clinic.example".into(),
                customer_first_name: "Asha".into(),
                customer_last_name: "Rao".into(),
            },
            RecentOrderRow {
                id: 1,
                order_number: "ORD-0001".into(),
                status: "delivered".into(),
                total_amount: dec("90.00"),
                created_at: Utc::now(),
                customer_email: "b@clinic.example".into(),
                customer_first_name: "Ben".into(),
                customer_last_name: "Singh".into(),
            },
        ];
        let items = vec![
            OrderItem {
                id: 10,
                order_id: 2,
                product_id: 7,
                quantity: 1,
                unit_price: dec("250.00"),
                total_price: dec("250.00"),
                product_name: Some("Endoscope".into()),
                product_sku: Some("END-01".into()),
            },
            OrderItem {
                id: 11,
                order_id: 2,
                product_id: 3,
                quantity: 2,
                unit_price: dec("0.00"),
                total_price: dec("0.00"),
                product_name: None,
                product_sku: None,
            },
        ];

        let recent = assemble_recent_orders(rows, items);
        assert_eq!(recent.len(), 2);
        // Cancelled orders stay in the recent view
        assert_eq!(recent[0].status, "cancelled");
        assert_eq!(recent[0].items.len(), 2);
        assert_eq!(recent[0].customer.first_name, "Asha");
        // An order whose items are gone still appears, with no items
        assert!(recent[1].items.is_empty());
        // Deleted product on a line item shows as None, not an error
        assert!(recent[0].items[1].product_name.is_none());
    }
}
