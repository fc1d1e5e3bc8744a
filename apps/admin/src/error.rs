//! # App Error Type
//!
//! Unified error type for admin commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Optica Admin                           │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  AppResult<()>                                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Field errors? ─── CoreError::Fields ────────┐                         │
//! │         │                                    │                          │
//! │         ▼                                    ▼                          │
//! │  API failure? ─── ApiError::NotFound ──── AppError { code, message,    │
//! │         │                                          fields }             │
//! │         ▼                                    │                          │
//! │  Success                                     ▼                          │
//! │                                   stderr: "error: Sale not found"       │
//! │                                           "warning: clientId: ..."      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `message` is always fit for the operator: the API's own message when
//! it sent one, otherwise a fixed sentence.

use optica_api::ApiError;
use optica_core::{CoreError, FieldErrors};
use serde::Serialize;
use thiserror::Error;

use crate::notify::Notice;

/// Result type alias for admin commands.
pub type AppResult<T> = Result<T, AppError>;

/// Error returned from admin commands.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Sale not found",
///   "fields": []
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Failing form fields as `(path, helper text)`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(String, String)>,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed, locally or by the API (400/422)
    ValidationError,

    /// Not logged in, or the session ended (401)
    Unauthorized,

    /// Logged in without permission (403)
    Forbidden,

    /// Business rule violation (canceled sale, duplicate service)
    BusinessLogic,

    /// Payment or installment rule violation
    PaymentError,

    /// Could not reach the API
    Network,

    /// Bad configuration file or environment
    Config,

    /// Reading or writing a local file failed
    Io,

    /// Anything else
    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_logged_in() -> Self {
        AppError::new(
            ErrorCode::Unauthorized,
            "You are not logged in. Run `optica-admin login` first.",
        )
    }

    /// A validation error listing every failing field.
    pub fn from_fields(errors: &FieldErrors) -> Self {
        let count = errors.len();
        AppError {
            code: ErrorCode::ValidationError,
            message: format!(
                "{count} field{} need{} attention",
                if count == 1 { "" } else { "s" },
                if count == 1 { "s" } else { "" }
            ),
            fields: errors
                .iter()
                .map(|(path, err)| (path.to_string(), err.to_string()))
                .collect(),
        }
    }

    /// One error notice followed by one warning per failing field.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = vec![Notice::error(self.message.clone())];
        notices.extend(
            self.fields
                .iter()
                .map(|(path, text)| Notice::warning(format!("{path}: {text}"))),
        );
        notices
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Fields(errors) => AppError::from_fields(&errors),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
            CoreError::InvalidPaymentAmount { .. } | CoreError::InvalidInstallmentCount { .. } => {
                AppError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::QuantityTooLarge { .. } => AppError::validation(err.to_string()),
            CoreError::LineNotFound { .. } => AppError::new(ErrorCode::NotFound, err.to_string()),
            _ => AppError::new(ErrorCode::BusinessLogic, err.to_string()),
        }
    }
}

/// Converts API errors to app errors.
impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let message = err.user_message();
        match err {
            ApiError::Core(core) => core.into(),
            ApiError::NotFound { .. } => AppError::new(ErrorCode::NotFound, message),
            ApiError::Rejected { .. } => AppError::validation(message),
            ApiError::Forbidden { .. } => AppError::new(ErrorCode::Forbidden, message),
            ApiError::NotLoggedIn => AppError::not_logged_in(),
            ApiError::Unauthorized { .. } | ApiError::SessionExpired => {
                AppError::new(ErrorCode::Unauthorized, message)
            }
            ApiError::Http(ref e) => {
                tracing::error!(error = %e, "Request failed");
                AppError::new(ErrorCode::Network, message)
            }
            ApiError::Config(_) => AppError::new(ErrorCode::Config, message),
            ApiError::TokenStore(ref e) => {
                tracing::error!(error = %e, "Token store failed");
                AppError::new(ErrorCode::Io, message)
            }
            other => {
                tracing::error!(error = %other, "Unexpected API failure");
                AppError::new(ErrorCode::Internal, message)
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::Io, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::validation(format!("Could not read the file: {err}"))
    }
}
