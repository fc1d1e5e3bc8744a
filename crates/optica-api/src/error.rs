//! # API Error Types
//!
//! Error types for calls to the store API.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │  API Status     │  │     Session             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Http           │  │  Unauthorized   │  │  NotLoggedIn            │ │
//! │  │  Decode         │  │  Forbidden      │  │  SessionExpired         │ │
//! │  │  MissingData    │  │  NotFound       │  │  InvalidToken           │ │
//! │  │                 │  │  Rejected       │  │  TokenStore             │ │
//! │  │                 │  │  Server         │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │ Configuration   │  │  Local rules    │                              │
//! │  │  Config         │  │  Core           │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried. Each failure is reported once and the operator
//! decides what to do; [`ApiError::user_message`] is the text shown.

use optica_core::CoreError;
use thiserror::Error;

/// Shown when the API gave no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Every way a call to the store API can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection failure, timeout, or a body that could not be read.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response was not the JSON we expected.
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope came back without `data`.
    #[error("Response envelope has no data")]
    MissingData,

    // =========================================================================
    // API Status Errors
    // =========================================================================
    /// 401. The session is no longer accepted.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session rejected"))]
    Unauthorized { message: Option<String> },

    /// 403.
    #[error("Forbidden: {}", .message.as_deref().unwrap_or("not allowed"))]
    Forbidden { message: Option<String> },

    /// 404.
    #[error("Not found: {}", .message.as_deref().unwrap_or("resource does not exist"))]
    NotFound { message: Option<String> },

    /// 400 or 422. The API refused the request body.
    #[error("Rejected ({status}): {}", .message.as_deref().unwrap_or("invalid request"))]
    Rejected { status: u16, message: Option<String> },

    /// Any other non-2xx status.
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// An authenticated call was made without logging in.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The token expired or the operator was idle for too long.
    #[error("Session expired")]
    SessionExpired,

    /// The token could not be decoded.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Reading or writing the persisted token failed.
    #[error("Token store error: {0}")]
    TokenStore(String),

    // =========================================================================
    // Configuration
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    Config(String),

    // =========================================================================
    // Local Rules
    // =========================================================================
    /// The request was rejected locally before it was sent.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Maps a non-2xx status and the envelope's `message` to an error.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            400 | 422 => ApiError::Rejected { status, message },
            _ => ApiError::Server { status, message },
        }
    }

    /// HTTP status when the error came from the API.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Rejected { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the operator has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::NotLoggedIn | ApiError::SessionExpired
        )
    }

    /// Text for the operator: the API's own message when it sent one,
    /// otherwise a fixed sentence.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { message: Some(m) }
            | ApiError::Forbidden { message: Some(m) }
            | ApiError::NotFound { message: Some(m) }
            | ApiError::Rejected { message: Some(m), .. }
            | ApiError::Server { message: Some(m), .. }
                if !m.trim().is_empty() =>
            {
                m.clone()
            }
            ApiError::NotLoggedIn => "You are not logged in.".to_string(),
            ApiError::SessionExpired | ApiError::Unauthorized { .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            ApiError::Core(e) => e.to_string(),
            ApiError::Config(e) => format!("Invalid configuration: {e}"),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
