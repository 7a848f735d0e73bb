//! Customer administration
//!
//! GET /api/admin/customers — paginated listing with search; each customer
//! carries lifetime purchase stats derived from non-cancelled orders.

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::{ApiResult, PageParams, Pagination, filter_value};
use crate::db;
use crate::db::customers::CustomerWithStats;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub total_spent: Decimal,
    pub order_count: i64,
    pub last_order_date: Option<DateTime<Utc>>,
}

impl From<CustomerWithStats> for CustomerView {
    fn from(c: CustomerWithStats) -> Self {
        Self {
            id: c.id,
            email: c.email,
            first_name: c.first_name,
            last_name: c.last_name,
            phone: c.phone,
            company: c.company,
            created_at: c.created_at,
            total_spent: c.total_spent,
            order_count: c.order_count,
            last_order_date: c.last_order_at,
        }
    }
}

#[derive(Serialize)]
pub struct CustomerListResponse {
    pub customers: Vec<CustomerView>,
    pub pagination: Pagination,
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<CustomerListResponse> {
    let (page, limit, offset) = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    let search = filter_value(query.search.as_deref());

    let customers = db::customers::list_with_stats(&state.pool, search, limit, offset)
        .await
        .map_err(store_failed)?;
    let total = db::customers::count(&state.pool, search)
        .await
        .map_err(store_failed)?;

    Ok(Json(CustomerListResponse {
        customers: customers.into_iter().map(CustomerView::from).collect(),
        pagination: Pagination::new(page, limit, total),
    }))
}

fn store_failed(e: sqlx::Error) -> AppError {
    tracing::error!("Customer admin query failed: {e}");
    AppError::new(ErrorCode::InternalError)
}
