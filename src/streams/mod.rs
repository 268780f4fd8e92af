//! Twitch Helix proxy.
//!
//! Every call obtains a fresh app access token with the client-credentials
//! grant, then forwards one Helix request. Responses are passed through as
//! raw JSON.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TwitchConfig;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Twitch credentials not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Twitch token request failed with HTTP {0}")]
    Token(u16),

    #[error("Twitch API error: HTTP {0}")]
    Upstream(u16),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

struct Credentials {
    client_id: String,
    client_secret: String,
}

/// Client for the two Helix endpoints the streams page needs.
pub struct TwitchClient {
    client: Client,
    credentials: Option<Credentials>,
    auth_url: String,
    api_url: String,
}

impl TwitchClient {
    pub fn new(config: &TwitchConfig) -> Result<Self, StreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let credentials = config.credentials().map(|(id, secret)| Credentials {
            client_id: id.to_string(),
            client_secret: secret.to_string(),
        });

        Ok(Self {
            client,
            credentials,
            auth_url: config.auth_url.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> Result<&Credentials, StreamError> {
        self.credentials.as_ref().ok_or(StreamError::NotConfigured)
    }

    async fn access_token(&self, creds: &Credentials) -> Result<String, StreamError> {
        let response = self
            .client
            .post(&self.auth_url)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Twitch token request returned {}", response.status());
            return Err(StreamError::Token(response.status().as_u16()));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn helix(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, StreamError> {
        let creds = self.credentials()?;
        let token = self.access_token(creds).await?;

        let url = format!("{}/{}", self.api_url, path);
        debug!("Helix GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Client-ID", &creds.client_id)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Helix {} returned {}", path, response.status());
            return Err(StreamError::Upstream(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Look up users by login. `logins` may hold several comma-separated names.
    pub async fn users(&self, logins: &str) -> Result<Value, StreamError> {
        let query: Vec<(&str, &str)> = logins
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| ("login", l))
            .collect();
        self.helix("users", &query).await
    }

    /// The most recent archived broadcast of a user.
    pub async fn latest_video(&self, user_id: &str) -> Result<Value, StreamError> {
        self.helix(
            "videos",
            &[("user_id", user_id), ("type", "archive"), ("first", "1")],
        )
        .await
    }
}
