//! # Commands Module
//!
//! One function per subcommand. Each returns an [`Outcome`]: the text for
//! stdout and the notices for stderr, so tests can inspect both without
//! capturing the terminal.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (dispatch)
//! ├── auth.rs           ◄─── login, logout, whoami
//! ├── clients.rs        ◄─── clients list/show/create
//! ├── catalog.rs        ◄─── products list, services list
//! ├── prescriptions.rs  ◄─── list, check (offline), create
//! ├── sales.rs          ◄─── list, show, totals (offline), edit, submit, cancel
//! └── payments.rs       ◄─── list, plan, pay
//! ```
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command ──► dispatch(state, command)                                   │
//! │                 │                                                       │
//! │                 ├── offline? ── optica-core only ──┐                    │
//! │                 │                                  │                    │
//! │                 └── online ── require_login ──► OpticaClient            │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                                 AppResult<Outcome { output, notices }>  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod catalog;
pub mod clients;
pub mod payments;
pub mod prescriptions;
pub mod sales;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::cli::{
    CatalogCommand, ClientsCommand, Command, PaymentsCommand, PrescriptionsCommand, SalesCommand,
};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::notify::Notice;
use crate::state::AppState;

/// What a command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Text for stdout. May be empty.
    pub output: String,
    pub notices: Vec<Notice>,
}

impl Outcome {
    pub fn output(output: impl Into<String>) -> Self {
        Outcome {
            output: output.into(),
            notices: Vec::new(),
        }
    }

    pub fn notice(notice: Notice) -> Self {
        Outcome {
            output: String::new(),
            notices: vec![notice],
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    pub fn with_notices(mut self, notices: impl IntoIterator<Item = Notice>) -> Self {
        self.notices.extend(notices);
        self
    }

    /// Output first, then notices.
    pub fn print(&self) {
        if !self.output.is_empty() {
            print!("{}", self.output);
            if !self.output.ends_with('\n') {
                println!();
            }
        }
        self.notices.iter().for_each(Notice::emit);
    }
}

/// Routes a parsed command to its handler.
pub async fn dispatch(state: &AppState, command: Command) -> AppResult<Outcome> {
    match command {
        Command::Login { email, password } => auth::login(state, &email, &password).await,
        Command::Logout => auth::logout(state).await,
        Command::Whoami => auth::whoami(state).await,

        Command::Clients(ClientsCommand::List(page)) => clients::list(state, &page.to_request()).await,
        Command::Clients(ClientsCommand::Show { id }) => clients::show(state, id).await,
        Command::Clients(ClientsCommand::Create {
            name,
            cpf,
            email,
            phone,
            birth_date,
            address,
        }) => {
            let request = optica_core::ClientRequest {
                name,
                cpf,
                birth_date,
                phone,
                email,
                address,
            };
            clients::create(state, request).await
        }

        Command::Products(CatalogCommand::List(page)) => catalog::products(state, &page.to_request()).await,
        Command::Services(CatalogCommand::List(page)) => catalog::services(state, &page.to_request()).await,

        Command::Prescriptions(PrescriptionsCommand::List { client, page }) => {
            prescriptions::list(state, client, &page.to_request()).await
        }
        Command::Prescriptions(PrescriptionsCommand::Check { file }) => {
            prescriptions::check(read_json(&file)?, state.today())
        }
        Command::Prescriptions(PrescriptionsCommand::Create { file }) => {
            prescriptions::create(state, read_json(&file)?).await
        }

        Command::Sales(SalesCommand::List(page)) => sales::list(state, &page.to_request()).await,
        Command::Sales(SalesCommand::Show { id }) => sales::show(state, id).await,
        Command::Sales(SalesCommand::Totals { file }) => Ok(sales::totals(state, &read_json(&file)?)),
        Command::Sales(SalesCommand::Edit { id, out }) => sales::edit(state, id, &out).await,
        Command::Sales(SalesCommand::Submit { file, id }) => sales::submit(state, read_json(&file)?, id).await,
        Command::Sales(SalesCommand::Cancel { id }) => sales::cancel(state, id).await,

        Command::Payments(PaymentsCommand::List { sale_id }) => payments::list(state, sale_id).await,
        Command::Payments(PaymentsCommand::Plan {
            sale_id,
            count,
            first_due,
            method,
            amount,
            submit,
        }) => {
            let options = payments::PlanOptions {
                count,
                first_due,
                method,
                amount,
                submit,
            };
            payments::plan(state, sale_id, options).await
        }
        Command::Payments(PaymentsCommand::Pay {
            payment_id,
            installment_id,
        }) => payments::pay(state, payment_id, installment_id).await,
    }
}

/// Reads a JSON document (draft or form) from disk.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::new(ErrorCode::Io, format!("Could not read {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Pads `cells` into aligned columns, one row per line.
pub fn table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(c, cell)| format!("{cell:<width$}", width = widths[c]))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// `"-"` for missing values in tables.
pub(crate) fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
