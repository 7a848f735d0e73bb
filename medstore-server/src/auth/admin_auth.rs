//! Admin JWT authentication for the back-office API
//!
//! The credential travels in an HttpOnly `admin_token` cookie set at login;
//! an `Authorization: Bearer` header is accepted as a fallback for
//! non-browser clients. Verification runs before any handler work: requests
//! without a valid token never touch the database.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

use crate::state::AppState;

/// JWT claims for admin authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin user ID
    pub sub: i64,
    /// Admin email
    pub email: String,
    /// Admin role
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin identity extracted from the JWT
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: i64,
    pub email: String,
    pub role: String,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Cookie carrying the admin token
pub const ADMIN_COOKIE: &str = "admin_token";

/// Create a JWT token for an admin user
pub fn create_token(
    admin_id: i64,
    email: &str,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = AdminClaims {
        sub: admin_id,
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Build the Set-Cookie value for a fresh login
pub fn login_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{ADMIN_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        JWT_EXPIRY_HOURS * 3600
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the admin cookie
pub fn logout_cookie() -> String {
    format!("{ADMIN_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Extract the token from a Cookie header value
fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == ADMIN_COOKIE && !value.is_empty()).then_some(value)
    })
}

/// Extract the admin token from a request: cookie first, then bearer header
fn extract_token(request: &Request) -> Option<&str> {
    let from_cookie = request
        .headers()
        .get(http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header);
    if from_cookie.is_some() {
        return from_cookie;
    }

    request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Middleware that extracts and verifies the admin JWT
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(&request)
        .ok_or_else(|| AppError::not_authenticated().into_response())?
        .to_string();

    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<AdminClaims>(
        &token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::invalid_token("Invalid or expired token").into_response()
    })?;

    let identity = AdminIdentity {
        admin_id: token_data.claims.sub,
        email: token_data.claims.email,
        role: token_data.claims.role,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
