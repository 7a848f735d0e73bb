//! Public storefront catalog endpoints
//!
//! GET /api/catalog/categories      — category list
//! GET /api/catalog/products        — active products, paginated
//! GET /api/catalog/products/{slug} — single active product

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::admin::{PageParams, Pagination};
use crate::db;
use crate::db::products::Product;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
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

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            slug: p.slug,
            description: p.description,
            short_desc: p.short_desc,
            sku: p.sku,
            price: p.price,
            currency: p.currency,
            stock: p.stock,
            image_urls: p.image_urls,
            specifications: p.specifications,
            documents: p.documents,
            is_active: p.is_active,
            category_id: p.category_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<db::categories::Category> for CategoryView {
    fn from(c: db::categories::Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            image_url: c.image_url,
        }
    }
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryView>> {
    let categories = db::categories::list(&state.pool).await.map_err(|e| {
        tracing::error!("Category listing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    Ok(Json(categories.into_iter().map(CategoryView::from).collect()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProductsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category_id: Option<i64>,
}

#[derive(Serialize)]
pub struct CatalogProductsResponse {
    pub products: Vec<ProductView>,
    pub pagination: Pagination,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogProductsQuery>,
) -> ApiResult<CatalogProductsResponse> {
    let (page, limit, offset) = PageParams {
        page: query.page,
        limit: query.limit,
    }
    .resolve();

    let products = db::products::list_active(&state.pool, query.category_id, limit, offset)
        .await
        .map_err(store_failed)?;
    let total = db::products::count_active(&state.pool, query.category_id)
        .await
        .map_err(store_failed)?;

    Ok(Json(CatalogProductsResponse {
        products: products.into_iter().map(ProductView::from).collect(),
        pagination: Pagination::new(page, limit, total),
    }))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ProductView> {
    let product = db::products::find_active_by_slug(&state.pool, &slug)
        .await
        .map_err(store_failed)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product.into()))
}

fn store_failed(e: sqlx::Error) -> AppError {
    tracing::error!("Catalog query failed: {e}");
    AppError::new(ErrorCode::InternalError)
}
