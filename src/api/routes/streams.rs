use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Deserialize)]
pub struct UsersParams {
    pub user_logins: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideosParams {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamersResponse {
    pub streamers: Vec<String>,
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} parameter is required", name)))
}

pub async fn twitch_users(
    State(state): State<AppState>,
    Query(params): Query<UsersParams>,
) -> Result<Json<Value>, ApiError> {
    let logins = required(params.user_logins, "user_logins")?;
    Ok(Json(state.twitch.users(&logins).await?))
}

pub async fn twitch_videos(
    State(state): State<AppState>,
    Query(params): Query<VideosParams>,
) -> Result<Json<Value>, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    Ok(Json(state.twitch.latest_video(&user_id).await?))
}

pub async fn streamers(State(state): State<AppState>) -> Json<StreamersResponse> {
    Json(StreamersResponse {
        streamers: state.config.guild.streamers.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, test_app};
    use crate::config::AppConfig;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_parameters() {
        let app = test_app(AppConfig::default());

        let (status, json) = get_json(&app, "/api/twitch/users").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"]["message"],
            "Bad request: user_logins parameter is required"
        );

        let (status, _) = get_json(&app, "/api/twitch/videos?user_id=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unconfigured_credentials() {
        let app = test_app(AppConfig::default());
        let (status, json) = get_json(&app, "/api/twitch/users?user_logins=alpha").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_streamers_list() {
        let mut config = AppConfig::default();
        config.guild.streamers = vec!["alpha".to_string(), "beta".to_string()];
        let app = test_app(config);

        let (status, json) = get_json(&app, "/api/twitch/streamers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "streamers": ["alpha", "beta"] }));
    }
}
