//! # Application State
//!
//! What a single run of the admin tool works with: the loaded
//! configuration and the API client carrying the session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState                                                               │
//! │  ├── config: AdminConfig  ◄── read-only after startup                   │
//! │  └── client: OpticaClient ◄── Session (RwLock) + TokenStore (file)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use optica_api::{AdminConfig, Claims, OpticaClient, TokenStore};
use optica_core::Money;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};

pub struct AppState {
    pub config: AdminConfig,
    pub client: OpticaClient,
}

impl AppState {
    /// Builds the client and resumes a stored session, if any.
    ///
    /// A stored token that expired, or whose idle window passed since the
    /// last run, is discarded here.
    pub async fn open(config: AdminConfig) -> AppResult<Self> {
        let client = OpticaClient::from_config(&config)?;
        Self::resume(config, client).await
    }

    /// Same as [`AppState::open`] with an explicit token store.
    pub async fn with_store(config: AdminConfig, store: Arc<dyn TokenStore>) -> AppResult<Self> {
        let client = OpticaClient::new(&config, store)?;
        Self::resume(config, client).await
    }

    async fn resume(config: AdminConfig, client: OpticaClient) -> AppResult<Self> {
        match client.auth().restore().await? {
            Some(claims) => info!(sub = %claims.sub, "Session resumed"),
            None => debug!("No stored session"),
        }
        Ok(AppState { config, client })
    }

    /// Claims of the active session, or `Unauthorized`.
    pub async fn require_login(&self) -> AppResult<Claims> {
        self.client.auth().whoami().await.ok_or_else(AppError::not_logged_in)
    }

    pub fn money(&self, amount: Money) -> String {
        self.config.format_currency(amount)
    }

    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
