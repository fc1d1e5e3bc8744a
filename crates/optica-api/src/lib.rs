//! # optica-api: Store API Client for Optica Admin
//!
//! This crate talks to the optical store's REST API on behalf of the admin
//! tools: authentication, the bearer-token session with its idle logout,
//! and typed accessors for every resource.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         optica-api                                      │
//! │                                                                         │
//! │  OpticaClient ──► auth() clients() prescriptions() products()          │
//! │       │           services() sales() payments()                         │
//! │       ▼                                                                 │
//! │  HttpClient (reqwest) ──► { data, message } envelopes ──► ApiError     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Session ──► Claims (jsonwebtoken) ──► idle deadline ──► TokenStore    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`client`] - `OpticaClient`, the entry point
//! - [`config`] - TOML configuration with `OPTICA_*` overrides
//! - [`envelope`] - Response envelopes and pagination
//! - [`error`] - API error types
//! - [`http`] - reqwest transport
//! - [`resources`] - One accessor per REST resource
//! - [`session`] - Token claims, activity tracking, idle logout
//! - [`token_store`] - Where the token lives between runs

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod resources;
pub mod session;
pub mod token_store;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::OpticaClient;
pub use config::AdminConfig;
pub use envelope::{Page, PageRequest};
pub use error::{ApiError, ApiResult, GENERIC_ERROR_MESSAGE};
pub use session::{decode_claims, spawn_idle_logout, Claims, Session};
pub use token_store::{FileTokenStore, MemoryTokenStore, StoredToken, TokenStore};
