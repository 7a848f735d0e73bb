//! Order administration
//!
//! GET   /api/admin/orders      — paginated listing with status filter and search
//! PATCH /api/admin/orders/{id} — status transition with whitelist validation

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::types::OrderStatus;
use std::collections::HashMap;

use super::{ApiResult, PageParams, Pagination, filter_value};
use crate::db;
use crate::db::customers::Customer;
use crate::db::orders::{Order, OrderItem, Payment};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Status filter, or `all` for no filter
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub order_number: String,
    pub status: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer: Option<CustomerContact>,
    pub items: Vec<ItemView>,
    pub payments: Vec<PaymentView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub product_name: Option<String>,
    pub product_sku: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub amount: Decimal,
    pub status: String,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderView>,
    pub pagination: Pagination,
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<OrderListResponse> {
    let (page, limit, offset) = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    let status = filter_value(query.status.as_deref());
    let search = filter_value(query.search.as_deref());

    let orders = db::orders::list(&state.pool, status, search, limit, offset)
        .await
        .map_err(store_failed)?;
    let total = db::orders::count(&state.pool, status, search)
        .await
        .map_err(store_failed)?;

    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let customer_ids: Vec<i64> = orders.iter().map(|o| o.customer_id).collect();

    let items = db::orders::items_for_orders(&state.pool, &order_ids)
        .await
        .map_err(store_failed)?;
    let payments = db::orders::payments_for_orders(&state.pool, &order_ids)
        .await
        .map_err(store_failed)?;
    let customers = db::customers::find_by_ids(&state.pool, &customer_ids)
        .await
        .map_err(store_failed)?;

    Ok(Json(OrderListResponse {
        orders: assemble_orders(orders, customers, items, payments),
        pagination: Pagination::new(page, limit, total),
    }))
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
    pub notes: Option<String>,
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOrderRequest>,
) -> ApiResult<OrderView> {
    let status: OrderStatus = req
        .status
        .parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidOrderStatus))?;

    let order = db::orders::update_status(&state.pool, id, status.as_str(), req.notes.as_deref())
        .await
        .map_err(store_failed)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let items = db::orders::items_for_orders(&state.pool, &[order.id])
        .await
        .map_err(store_failed)?;
    let payments = db::orders::payments_for_orders(&state.pool, &[order.id])
        .await
        .map_err(store_failed)?;
    let customers = db::customers::find_by_ids(&state.pool, &[order.customer_id])
        .await
        .map_err(store_failed)?;

    let mut views = assemble_orders(vec![order], customers, items, payments);
    // assemble_orders returns exactly one view per input order
    views
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::InternalError))
}

/// Join the flat query results into nested order views, preserving the
/// listing order.
fn assemble_orders(
    orders: Vec<Order>,
    customers: Vec<Customer>,
    items: Vec<OrderItem>,
    payments: Vec<Payment>,
) -> Vec<OrderView> {
    let customers_by_id: HashMap<i64, Customer> =
        customers.into_iter().map(|c| (c.id, c)).collect();

    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        items_by_order.entry(item.order_id).or_default().push(item);
    }
    let mut payments_by_order: HashMap<i64, Vec<Payment>> = HashMap::new();
    for payment in payments {
        payments_by_order
            .entry(payment.order_id)
            .or_default()
            .push(payment);
    }

    orders
        .into_iter()
        .map(|order| OrderView {
            customer: customers_by_id.get(&order.customer_id).map(|c| {
                CustomerContact {
                    email: c.email.clone(),
                    first_name: c.first_name.clone(),
                    last_name: c.last_name.clone(),
                    phone: c.phone.clone(),
                    company: c.company.clone(),
                }
            }),
            items: items_by_order
                .remove(&order.id)
                .unwrap_or_default()
                .into_iter()
                .map(|item| ItemView {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total_price: item.total_price,
                    product_name: item.product_name,
                    product_sku: item.product_sku,
                })
                .collect(),
            payments: payments_by_order
                .remove(&order.id)
                .unwrap_or_default()
                .into_iter()
                .map(|payment| PaymentView {
                    amount: payment.amount,
                    status: payment.status,
                    payment_method: payment.payment_method,
                    created_at: payment.created_at,
                })
                .collect(),
            id: order.id,
            order_number: order.order_number,
            status: order.status,
            total_amount: order.total_amount,
            currency: order.currency,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
        .collect()
}

fn store_failed(e: sqlx::Error) -> AppError {
    tracing::error!("Order admin query failed: {e}");
    AppError::new(ErrorCode::InternalError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn order(id: i64, customer_id: i64) -> Order {
        Order {
            id,
            order_number: format!("ORD-{id:04}"),
            status: "pending".into(),
            total_amount: dec("100.00"),
            currency: "INR".into(),
            notes: None,
            customer_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_orders_joins_nested_records() {
        let customers = vec![Customer {
            id: 5,
            email: "a@clinic.example".into(),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            phone: None,
            company: Some("City Clinic".into()),
            created_at: Utc::now(),
        }];
        let items = vec![OrderItem {
            id: 1,
            order_id: 1,
            product_id: 7,
            quantity: 2,
            unit_price: dec("50.00"),
            total_price: dec("100.00"),
            product_name: Some("Forceps".into()),
            product_sku: Some("FRC-01".into()),
        }];
        let payments = vec![Payment {
            id: 1,
            order_id: 1,
            amount: dec("100.00"),
            status: "succeeded".into(),
            payment_method: Some("card".into()),
            created_at: Utc::now(),
        }];

        let views = assemble_orders(vec![order(1, 5), order(2, 99)], customers, items, payments);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].items.len(), 1);
        assert_eq!(views[0].payments.len(), 1);
        assert_eq!(views[0].customer.as_ref().unwrap().first_name, "Asha");
        // Unknown customer id: order still listed, contact block absent
        assert!(views[1].customer.is_none());
        assert!(views[1].items.is_empty());
    }
}
