//! REST API endpoints.
//!
//! Axum router exposing the match store under `/api`, plus admin login and
//! the Twitch proxy used by the streams page.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::config::ServerConfig;
use crate::storage::StoreError;
use crate::streams::StreamError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(format!("match {}", id)),
            StoreError::Validation(v) => {
                warn!("Rejected match: {}", v);
                ApiError::Validation(v.to_string())
            }
            StoreError::Storage(e) => {
                error!("Match store failure: {}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<StreamError> for ApiError {
    fn from(err: StreamError) -> Self {
        error!("Twitch proxy failure: {}", err);
        ApiError::Internal(err.to_string())
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origin = server.cors_origin.trim();
    if origin == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([axum::http::header::CONTENT_TYPE])
            .allow_credentials(true),
        Err(_) => {
            warn!("Ignoring invalid CORS origin {:?}", origin);
            CorsLayer::new()
        }
    }
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let matches = Router::new()
        .route(
            "/matches",
            get(routes::matches::list_matches)
                .post(routes::matches::create_match)
                .put(routes::matches::update_match)
                .delete(routes::matches::delete_match),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::admin::require_admin,
        ));

    let api = Router::new()
        .merge(matches)
        .route("/admin/login", post(routes::admin::login))
        .route("/twitch/users", get(routes::streams::twitch_users))
        .route("/twitch/videos", get(routes::streams::twitch_videos))
        .route("/twitch/streamers", get(routes::streams::streamers));

    let cors = cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
