//! # HTTP Transport
//!
//! Thin wrapper over `reqwest` that knows the store API's conventions.
//!
//! ```text
//! ┌──────────────┐  bearer()   ┌─────────┐
//! │  HttpClient  │────────────►│ Session │  NotLoggedIn / SessionExpired
//! └──────┬───────┘             └─────────┘
//!        │ GET/POST/PUT/PATCH/DELETE  {base_url}{path}
//!        ▼
//! ┌──────────────┐  2xx ──► Envelope { data } ──► T
//! │   reqwest    │  4xx/5xx ──► { message } ──► ApiError::from_status
//! └──────────────┘  401 ──► session ended
//! ```

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AdminConfig;
use crate::envelope::{error_message, Envelope, Page, PageRequest};
use crate::error::{ApiError, ApiResult};
use crate::session::Session;

/// Whether a request carries the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

/// HTTP client for the store API. Clones share the connection pool and
/// the session.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpClient {
    pub fn new(config: &AdminConfig, session: Session) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(HttpClient {
            client,
            base_url: config.base_url().to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    // =========================================================================
    // Public Verbs
    // =========================================================================

    /// `GET {path}` and unwrap `data`.
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.send(self.request(Method::GET, path), Auth::Bearer).await?;
        decode_data(&body)
    }

    /// `GET {path}?page=..&size=..` and unwrap the page.
    pub async fn get_page<T: DeserializeOwned>(&self, path: &str, page: &PageRequest) -> ApiResult<Page<T>> {
        let request = self.request(Method::GET, path).query(page);
        let body = self.send(request, Auth::Bearer).await?;
        decode_data(&body)
    }

    pub async fn post_data<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = self.send(self.request(Method::POST, path).json(body), Auth::Bearer).await?;
        decode_data(&body)
    }

    /// POST without the session token. Used by login.
    pub async fn post_anonymous<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = self.send(self.request(Method::POST, path).json(body), Auth::Anonymous).await?;
        decode_data(&body)
    }

    pub async fn put_data<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = self.send(self.request(Method::PUT, path).json(body), Auth::Bearer).await?;
        decode_data(&body)
    }

    pub async fn patch_data<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = self.send(self.request(Method::PATCH, path).json(body), Auth::Bearer).await?;
        decode_data(&body)
    }

    /// PATCH with no request body (state transitions such as cancel).
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.send(self.request(Method::PATCH, path), Auth::Bearer).await?;
        decode_data(&body)
    }

    /// `DELETE {path}`. The response body is ignored.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, path), Auth::Bearer).await?;
        Ok(())
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, request: RequestBuilder, auth: Auth) -> ApiResult<String> {
        let request = match auth {
            Auth::Bearer => request.bearer_auth(self.session.bearer().await?),
            Auth::Anonymous => request,
        };
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.client.execute(request).await.map_err(|e| {
            warn!(%method, %path, error = %e, "API request failed to send");
            ApiError::Http(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            debug!(%method, %path, status = status.as_u16(), "API request");
            return Ok(body);
        }

        let message = error_message(&body);
        warn!(
            %method,
            %path,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "API request rejected"
        );

        let err = ApiError::from_status(status.as_u16(), message);
        if auth == Auth::Bearer && matches!(err, ApiError::Unauthorized { .. }) {
            if let Err(e) = self.session.end().await {
                warn!(error = %e, "Could not end rejected session");
            }
        }
        Err(err)
    }
}

fn decode_data<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    envelope.into_data()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::MemoryTokenStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn client(base_url: &str) -> HttpClient {
        let mut config = AdminConfig::default();
        config.api.base_url = base_url.to_string();
        let session = Session::new(Arc::new(MemoryTokenStore::new()), Duration::from_secs(60));
        HttpClient::new(&config, session).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let http = client("http://localhost:8080/api/");
        assert_eq!(http.url("/sales/3"), "http://localhost:8080/api/sales/3");
        assert_eq!(http.url("clients"), "http://localhost:8080/api/clients");
    }

    #[test]
    fn test_decode_data() {
        let value: Vec<u32> = decode_data(r#"{"data": [1, 2]}"#).unwrap();
        assert_eq!(value, vec![1, 2]);
        assert!(matches!(decode_data::<u32>(r#"{"data": null}"#), Err(ApiError::MissingData)));
        assert!(matches!(decode_data::<u32>("oops"), Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_authenticated_call_needs_session() {
        // Never reaches the network.
        let http = client("http://127.0.0.1:9");
        let err = http.get_data::<u32>("/clients/1").await.unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
    }
}
