//! API routes for medstore-server

pub mod admin;
pub mod catalog;
pub mod chat;
pub mod health;

use axum::routing::{get, patch, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth::admin_auth_middleware;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Back-office endpoints (JWT authenticated)
    let admin_protected = Router::new()
        .route("/api/admin/analytics", get(admin::analytics::get_analytics))
        .route(
            "/api/admin/products",
            get(admin::products::list_products)
                .post(admin::products::create_product)
                .delete(admin::products::delete_product),
        )
        .route(
            "/api/admin/orders",
            get(admin::orders::list_orders),
        )
        .route(
            "/api/admin/orders/{id}",
            patch(admin::orders::update_order),
        )
        .route("/api/admin/customers", get(admin::customers::list_customers))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    // Admin session endpoints (no auth gate: login issues the cookie)
    let admin_session = Router::new()
        .route("/api/admin/auth/login", post(admin::auth::login))
        .route("/api/admin/auth/logout", post(admin::auth::logout));

    // Public storefront endpoints
    let storefront = Router::new()
        .route("/api/catalog/categories", get(catalog::list_categories))
        .route("/api/catalog/products", get(catalog::list_products))
        .route("/api/catalog/products/{slug}", get(catalog::get_product))
        .route("/api/chat", post(chat::chat));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(admin_session)
        .merge(admin_protected)
        .merge(storefront)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
