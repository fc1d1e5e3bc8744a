//! # Store API Client
//!
//! Entry point of the crate. One `OpticaClient` per operator; every
//! resource accessor borrows its transport and session.
//!
//! ## Usage
//! ```rust,no_run
//! use optica_api::{AdminConfig, OpticaClient, PageRequest};
//!
//! # async fn run() -> optica_api::ApiResult<()> {
//! let config = AdminConfig::load(None)?;
//! let client = OpticaClient::from_config(&config)?;
//! client.auth().login("ana@otica.com", "secret").await?;
//!
//! let sales = client.sales().list(&PageRequest::default()).await?;
//! println!("{} sales", sales.total_elements);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::AdminConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::HttpClient;
use crate::resources::{
    AuthApi, ClientsApi, PaymentsApi, PrescriptionsApi, ProductsApi, SalesApi, ServicesApi,
};
use crate::session::{spawn_idle_logout, Session};
use crate::token_store::{FileTokenStore, TokenStore};

/// Client for the store REST API.
#[derive(Debug, Clone)]
pub struct OpticaClient {
    http: HttpClient,
}

impl OpticaClient {
    /// Builds a client with the given token store.
    pub fn new(config: &AdminConfig, store: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let session = Session::new(store, config.idle_timeout());
        Ok(OpticaClient {
            http: HttpClient::new(config, session)?,
        })
    }

    /// Builds a client that keeps its token in the configured file.
    pub fn from_config(config: &AdminConfig) -> ApiResult<Self> {
        let path = config
            .token_path()
            .ok_or_else(|| ApiError::Config("no directory available for the session file".into()))?;
        Self::new(config, Arc::new(FileTokenStore::new(path)))
    }

    pub fn session(&self) -> &Session {
        self.http.session()
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Starts the background task that logs out after inactivity.
    pub fn spawn_idle_logout(&self) -> JoinHandle<()> {
        spawn_idle_logout(self.session().clone())
    }

    // =========================================================================
    // Resources
    // =========================================================================

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.http)
    }

    pub fn clients(&self) -> ClientsApi<'_> {
        ClientsApi::new(&self.http)
    }

    pub fn prescriptions(&self) -> PrescriptionsApi<'_> {
        PrescriptionsApi::new(&self.http)
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(&self.http)
    }

    pub fn services(&self) -> ServicesApi<'_> {
        ServicesApi::new(&self.http)
    }

    pub fn sales(&self) -> SalesApi<'_> {
        SalesApi::new(&self.http)
    }

    pub fn payments(&self) -> PaymentsApi<'_> {
        PaymentsApi::new(&self.http)
    }
}
