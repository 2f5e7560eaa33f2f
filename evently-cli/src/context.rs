//! Shared state for every command: config, HTTP client and token store.

use anyhow::{Context, Result};
use chrono::Utc;
use evently_core::api::{ApiClient, Backend};
use evently_core::config::EventlyConfig;
use evently_core::profile::UserProfile;
use evently_core::session::{Session, TokenStore, bootstrap};

pub struct App {
    pub config: EventlyConfig,
    pub api: ApiClient,
    pub store: TokenStore,
}

impl App {
    pub fn load() -> Result<Self> {
        let config = EventlyConfig::load().context("Failed to load configuration")?;
        let api = ApiClient::new(&config.api_url)?;
        let store = TokenStore::new(config.token_path()?);

        Ok(App { config, api, store })
    }

    /// Restore the stored session, or tell the user to sign in.
    pub async fn require_session(&self) -> Result<(Session, UserProfile)> {
        let outcome = bootstrap(&self.store, &self.api, Utc::now()).await?;
        outcome.into_session().map_err(|e| {
            anyhow::anyhow!(
                "{e}.\n\n\
                Sign in with:\n  \
                evently login\n\n\
                No account yet? Create one with:\n  \
                evently signup"
            )
        })
    }

    pub async fn categories(&self) -> Result<Vec<String>> {
        self.api.categories().await.context("Failed to fetch categories")
    }
}
