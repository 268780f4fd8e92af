use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::ApiError;

pub const ADMIN_COOKIE: &str = "admin_token";

const COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
}

/// Value of the named cookie, if the request carries it.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Compare a presented secret with the configured one without an early exit
/// on the first differing byte.
fn secret_matches(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    presented.len() == expected.len()
        && presented
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let admin = &state.config.admin;
    let (Some(password), Some(token)) = (admin.password.as_deref(), admin.token.as_deref()) else {
        return Err(ApiError::Internal("admin login is not configured".to_string()));
    };

    if !secret_matches(&body.password, password) {
        warn!("Rejected admin login");
        return Err(ApiError::Unauthorized);
    }

    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        ADMIN_COOKIE, token, COOKIE_MAX_AGE_SECS
    );
    if admin.secure_cookie {
        cookie.push_str("; Secure");
    }
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(format!("invalid admin token: {}", e)))?;

    info!("Admin logged in");
    let mut response = Json(LoginResponse { success: true }).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    Ok(response)
}

/// Reject writes unless the admin cookie matches the configured token.
///
/// Reads always pass. Without a configured token every request passes.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let read_only = matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    );

    if !read_only && state.config.admin.gate_enabled() {
        let expected = state.config.admin.token.as_deref().unwrap_or_default();
        let presented = cookie_value(request.headers(), ADMIN_COOKIE).unwrap_or_default();
        if !secret_matches(presented, expected) {
            warn!("Rejected unauthenticated {} {}", request.method(), request.uri());
            return Err(ApiError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}
