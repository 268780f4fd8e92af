pub mod admin;
pub mod matches;
pub mod streams;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use crate::storage::MemoryMatchStore;

    pub fn test_app(config: AppConfig) -> axum::Router {
        let store = Arc::new(MemoryMatchStore::new());
        build_router(AppState::new(store, config).unwrap())
    }

    pub fn gated_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.admin.password = Some("hunter2".to_string());
        config.admin.token = Some("secret-token".to_string());
        config
    }

    pub async fn send(
        app: &axum::Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> (StatusCode, axum::http::HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, headers, json)
    }

    pub async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
        let (status, _, json) = send(app, Method::GET, uri, None, None).await;
        (status, json)
    }
}
