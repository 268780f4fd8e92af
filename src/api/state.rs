use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::MatchStore;
use crate::streams::{StreamError, TwitchClient};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchStore>,
    pub config: Arc<AppConfig>,
    pub twitch: Arc<TwitchClient>,
}

impl AppState {
    pub fn new(store: Arc<dyn MatchStore>, config: AppConfig) -> Result<Self, StreamError> {
        let twitch = TwitchClient::new(&config.twitch)?;
        Ok(Self {
            store,
            config: Arc::new(config),
            twitch: Arc::new(twitch),
        })
    }
}
