//! # Optica Admin Library
//!
//! Command-line front end for the optical store's back office.
//! `main.rs` only parses arguments and reports failures; everything else
//! lives here so it can be driven from tests.
//!
//! ## Module Organization
//! ```text
//! optica_admin_lib/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state.rs        ◄─── Config + API client for one run
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch and Outcome
//! │   ├── auth.rs     ◄─── login, logout, whoami
//! │   ├── clients.rs  ◄─── Client listing and registration
//! │   ├── catalog.rs  ◄─── Products and services
//! │   ├── prescriptions.rs
//! │   ├── sales.rs    ◄─── Totals, drafts, submit, cancel
//! │   └── payments.rs ◄─── Balances, installment plans, paying
//! ├── notify.rs       ◄─── Success / warning / error notices
//! └── error.rs        ◄─── AppError for commands
//! ```
//!
//! ## Output Channels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdout  ◄── command output (tables, totals, JSON drafts)               │
//! │  stderr  ◄── notices ("ok: ...", "warning: ...", "error: ...")          │
//! │          ◄── tracing logs (RUST_LOG, default warn)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod notify;
pub mod state;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::AppError;
use optica_api::AdminConfig;
use state::AppState;

/// Runs one command.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load configuration ── file (if any) → OPTICA_* overrides → validate │
/// │  2. Build the API client ── token kept in the session file             │
/// │  3. Resume the stored session, start the idle-logout timer              │
/// │  4. Dispatch the command, print its output and notices                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AdminConfig::load(cli.config.clone()).map_err(AppError::from)?;
    debug!(base_url = %config.base_url(), "Configuration loaded");

    let state = AppState::open(config).await?;
    let idle_logout = state.client.spawn_idle_logout();

    let outcome = commands::dispatch(&state, cli.command).await;
    idle_logout.abort();

    let outcome = outcome?;
    outcome.print();
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=optica=debug` - Requests, notices and session events
/// - `RUST_LOG=info` - Logins, submitted sales, registered payments
/// - Default: warnings only
///
/// Logs go to stderr so stdout stays clean for command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
