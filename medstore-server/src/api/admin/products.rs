//! Product administration
//!
//! GET    /api/admin/products — paginated listing with search and category filter
//! POST   /api/admin/products — create product (slug generated from the name)
//! DELETE /api/admin/products?id= — delete, refused while order items reference it

use axum::Json;
use axum::extract::{Query, State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::{ApiResult, PageParams, Pagination, filter_value};
use crate::api::catalog::{CategoryView, ProductView};
use crate::db;
use crate::state::AppState;
use crate::util::unique_slug;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    /// Category id, or `all` for no filter
    pub category_id: Option<String>,
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryView>,
    pub pagination: Pagination,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<ProductListResponse> {
    let (page, limit, offset) = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    let search = filter_value(query.search.as_deref());
    let category_id =
        filter_value(query.category_id.as_deref()).and_then(|v| v.parse::<i64>().ok());

    let products = db::products::list(&state.pool, search, category_id, limit, offset)
        .await
        .map_err(store_failed)?;
    let total = db::products::count(&state.pool, search, category_id)
        .await
        .map_err(store_failed)?;
    let categories = db::categories::list(&state.pool)
        .await
        .map_err(store_failed)?;

    Ok(Json(ProductListResponse {
        products: products.into_iter().map(ProductView::from).collect(),
        categories: categories.into_iter().map(CategoryView::from).collect(),
        pagination: Pagination::new(page, limit, total),
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub short_desc: Option<String>,
    pub sku: String,
    pub price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub stock: i32,
    pub image_urls: Option<serde_json::Value>,
    pub specifications: Option<serde_json::Value>,
    pub documents: Option<serde_json::Value>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub category_id: i64,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
pub struct CreateProductResponse {
    pub success: bool,
    pub product: ProductView,
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<CreateProductResponse> {
    let name = req.name.trim();
    let sku = req.sku.trim();
    if name.is_empty() || sku.is_empty() {
        return Err(AppError::validation("Name and SKU are required"));
    }
    if req.price <= Decimal::ZERO {
        return Err(AppError::validation("Price must be positive"));
    }
    if req.stock < 0 {
        return Err(AppError::validation("Stock cannot be negative"));
    }

    db::categories::find_by_id(&state.pool, req.category_id)
        .await
        .map_err(store_failed)?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;

    if db::products::find_by_sku(&state.pool, sku)
        .await
        .map_err(store_failed)?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::DuplicateSku));
    }

    let slug = unique_slug(name);
    let image_urls = req.image_urls.unwrap_or_else(|| serde_json::json!([]));

    let product = db::products::create(
        &state.pool,
        name,
        &slug,
        req.description.as_deref(),
        req.short_desc.as_deref(),
        sku,
        req.price,
        &req.currency,
        req.stock,
        &image_urls,
        req.specifications.as_ref(),
        req.documents.as_ref(),
        req.is_active,
        req.category_id,
    )
    .await
    .map_err(|e| match &e {
        // Lost the race against a concurrent create with the same SKU
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::new(ErrorCode::DuplicateSku)
        }
        _ => store_failed(e),
    })?;

    Ok(Json(CreateProductResponse {
        success: true,
        product: product.into(),
    }))
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    pub id: Option<i64>,
}

pub async fn delete_product(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<serde_json::Value> {
    let id = query
        .id
        .ok_or_else(|| AppError::validation("Product ID is required"))?;

    db::products::find_by_id(&state.pool, id)
        .await
        .map_err(store_failed)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    // Line items carry no FK, so the referential guard lives here
    if db::products::has_order_items(&state.pool, id)
        .await
        .map_err(store_failed)?
    {
        return Err(AppError::new(ErrorCode::ProductInUse));
    }

    db::products::delete(&state.pool, id)
        .await
        .map_err(store_failed)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Product deleted successfully",
    })))
}

fn store_failed(e: sqlx::Error) -> AppError {
    tracing::error!("Product admin query failed: {e}");
    AppError::new(ErrorCode::InternalError)
}
