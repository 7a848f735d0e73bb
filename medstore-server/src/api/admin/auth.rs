//! Admin session endpoints
//!
//! POST /api/admin/auth/login  — verify credentials, set the admin cookie
//! POST /api/admin/auth/logout — clear the admin cookie

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::auth::admin_auth;
use crate::db;
use crate::state::AppState;
use crate::util::verify_password;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub admin: AdminProfile,
}

#[derive(Serialize)]
pub struct AdminProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let admin = db::admin_users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error during admin login: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &admin.hashed_password) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let token = admin_auth::create_token(admin.id, &admin.email, &admin.role, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let cookie = admin_auth::login_cookie(&token, state.secure_cookies());

    Ok((
        [(http::header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            admin: AdminProfile {
                id: admin.id,
                email: admin.email,
                name: admin.name,
                role: admin.role,
            },
        }),
    ))
}

pub async fn logout() -> impl IntoResponse {
    (
        [(http::header::SET_COOKIE, admin_auth::logout_cookie())],
        Json(serde_json::json!({ "success": true })),
    )
}
