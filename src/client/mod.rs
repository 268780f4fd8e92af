//! HTTP client for the match API and the session snapshot built on it.

mod board;

pub use board::{refresh, MatchBoard, RefreshTicket};

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::api::routes::admin::ADMIN_COOKIE;
use crate::config::ClientConfig;
use crate::models::{Match, MatchId, MatchInput, MatchUpdate};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected by server: {0}")]
    Validation(String),

    #[error("match not found: {0}")]
    NotFound(MatchId),

    #[error("admin login required: {0}")]
    Unauthorized(String),

    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Thin client over `/api/matches`. Every call makes exactly one request.
///
/// Writes carry the admin cookie when a token is configured.
#[derive(Debug, Clone)]
pub struct MatchClient {
    client: Client,
    matches_url: Url,
    admin_cookie: Option<String>,
}

impl MatchClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let admin_cookie = config
            .admin_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("{}={}", ADMIN_COOKIE, t));

        Ok(Self {
            client,
            matches_url: base.join("matches")?,
            admin_cookie,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.admin_cookie {
            Some(cookie) => request.header(header::COOKIE, cookie.as_str()),
            None => request,
        }
    }

    pub fn matches_url(&self) -> &Url {
        &self.matches_url
    }

    pub async fn list_matches(&self) -> Result<Vec<Match>, ClientError> {
        let response = self.client.get(self.matches_url.clone()).send().await?;
        let response = check(response, None).await?;
        let matches: Vec<Match> = response.json().await?;
        debug!("Fetched {} matches", matches.len());
        Ok(matches)
    }

    pub async fn create_match(&self, input: &MatchInput) -> Result<Match, ClientError> {
        let response = self
            .authorized(self.client.post(self.matches_url.clone()))
            .json(input)
            .send()
            .await?;
        Ok(check(response, None).await?.json().await?)
    }

    pub async fn update_match(&self, id: &MatchId, input: MatchInput) -> Result<Match, ClientError> {
        let body = MatchUpdate::new(id.clone(), input);
        let response = self
            .authorized(self.client.put(self.matches_url.clone()))
            .json(&body)
            .send()
            .await?;
        Ok(check(response, Some(id)).await?.json().await?)
    }

    pub async fn delete_match(&self, id: &MatchId) -> Result<(), ClientError> {
        let response = self
            .authorized(self.client.delete(self.matches_url.clone()))
            .query(&[("id", id.as_str())])
            .send()
            .await?;
        check(response, Some(id)).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into the matching error.
async fn check(response: Response, id: Option<&MatchId>) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error.message)
        .unwrap_or(text);

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => Err(ClientError::NotFound(id.clone())),
        (StatusCode::UNAUTHORIZED, _) => Err(ClientError::Unauthorized(message)),
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            Err(ClientError::Validation(message))
        }
        _ => Err(ClientError::Transport(format!("HTTP {}: {}", status, message))),
    }
}
