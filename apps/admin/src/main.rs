//! # Optica Admin Entry Point
//!
//! ```text
//! $ optica-admin login --email ana@otica.com
//! ok: Logged in as ana@otica.com (session ends 2026-10-19 18:00 UTC)
//!
//! $ optica-admin sales totals draft.json
//! Subtotal   R$ 1,250.00
//! Discount   R$ 50.00
//! Total      R$ 1,200.00
//! ```
//!
//! The actual work is in `lib.rs`; failures are reported here as notices
//! and turned into a non-zero exit code.

use std::process::ExitCode;

use clap::Parser;

use optica_admin_lib::cli::Cli;
use optica_admin_lib::error::AppError;
use optica_admin_lib::notify::Notice;
use optica_api::GENERIC_ERROR_MESSAGE;

#[tokio::main]
async fn main() -> ExitCode {
    optica_admin_lib::init_tracing();
    let cli = Cli::parse();

    match optica_admin_lib::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(app) => app.notices().iter().for_each(Notice::emit),
                None => {
                    tracing::error!(error = ?err, "Unexpected failure");
                    Notice::error(GENERIC_ERROR_MESSAGE).emit();
                }
            }
            ExitCode::FAILURE
        }
    }
}
