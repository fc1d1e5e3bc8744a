//! # Response Envelopes
//!
//! The store API wraps every payload:
//!
//! ```text
//! single:     { "data": { ... },                          "message": "ok" }
//! paginated:  { "data": { "content": [...], "totalElements": 42 } }
//! failure:    { "message": "CPF already registered" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// `{ data, message }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> ApiResult<T> {
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Body of a failed response. Only `message` is used.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extracts the operator-facing message from an error body, if any.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Number of pages of `size` items needed for every element.
    pub fn total_pages(&self, size: u32) -> u64 {
        if size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(size as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Query parameters of list endpoints (`?page=0&size=20&search=ana`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// `field,asc` or `field,desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            size: 20,
            search: None,
            sort: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        PageRequest {
            page,
            size,
            ..Default::default()
        }
    }

    /// Blank searches are dropped.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then(|| search.trim().to_string());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}
