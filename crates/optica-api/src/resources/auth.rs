//! Login, logout and the current operator.

use optica_core::{CoreError, FieldErrors, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::session::Claims;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// `data` of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

pub struct AuthApi<'a> {
    http: &'a HttpClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        AuthApi { http }
    }

    /// Exchanges credentials for a token and starts the session.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Claims> {
        let email = email.trim();
        let mut errors = FieldErrors::new();
        if email.is_empty() {
            errors.insert("email", ValidationError::Required { field: "E-mail".into() });
        }
        if password.is_empty() {
            errors.insert("password", ValidationError::Required { field: "Password".into() });
        }
        errors.into_result().map_err(CoreError::from)?;

        let response: LoginResponse = self
            .http
            .post_anonymous("/auth/login", &LoginRequest { email, password })
            .await?;
        let claims = self.http.session().begin(response.token).await?;
        info!(sub = %claims.sub, "Logged in");
        Ok(claims)
    }

    /// Ends the session locally. The API keeps no server-side session.
    pub async fn logout(&self) -> ApiResult<()> {
        self.http.session().end().await
    }

    /// Resumes a stored session, if one is still valid.
    pub async fn restore(&self) -> ApiResult<Option<Claims>> {
        self.http.session().restore().await
    }

    /// Claims of the active session.
    pub async fn whoami(&self) -> Option<Claims> {
        if self.http.session().is_active().await {
            self.http.session().claims().await
        } else {
            None
        }
    }
}
