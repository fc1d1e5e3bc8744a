//! # Command Line
//!
//! ```text
//! optica-admin [--config admin.toml] <command>
//!
//!   login | logout | whoami
//!   clients        list | show | create
//!   products       list
//!   services       list
//!   prescriptions  list | check | create
//!   sales          list | show | totals | edit | submit | cancel
//!   payments       list | plan | pay
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use optica_api::PageRequest;
use optica_core::{EntityId, Money, PaymentMethod};

#[derive(Debug, Parser)]
#[command(name = "optica-admin", version, about = "Back-office tools for the optical store")]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "OPTICA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and keep the session for later commands
    Login {
        #[arg(long, env = "OPTICA_EMAIL")]
        email: String,
        #[arg(long, env = "OPTICA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session
    Logout,
    /// Show who is logged in and when the session ends
    Whoami,
    #[command(subcommand)]
    Clients(ClientsCommand),
    #[command(subcommand)]
    Products(CatalogCommand),
    #[command(subcommand)]
    Services(CatalogCommand),
    #[command(subcommand)]
    Prescriptions(PrescriptionsCommand),
    #[command(subcommand)]
    Sales(SalesCommand),
    #[command(subcommand)]
    Payments(PaymentsCommand),
}

/// Paging flags shared by list commands.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Zero-based page
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    #[arg(long, default_value_t = 20)]
    pub size: u32,
    #[arg(long)]
    pub search: Option<String>,
    /// `field,asc` or `field,desc`
    #[arg(long)]
    pub sort: Option<String>,
}

impl PageArgs {
    pub fn to_request(&self) -> PageRequest {
        let mut request = PageRequest::new(self.page, self.size);
        if let Some(search) = &self.search {
            request = request.with_search(search.as_str());
        }
        if let Some(sort) = &self.sort {
            request = request.with_sort(sort.as_str());
        }
        request
    }
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    List(PageArgs),
    Show {
        id: EntityId,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        cpf: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    List(PageArgs),
}

#[derive(Debug, Subcommand)]
pub enum PrescriptionsCommand {
    /// All prescriptions, or those of one client
    List {
        #[arg(long)]
        client: Option<EntityId>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Validate a prescription form (JSON) without sending it
    Check { file: PathBuf },
    /// Validate and register a prescription form (JSON)
    Create { file: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    List(PageArgs),
    /// Show a sale with its payment balance
    Show { id: EntityId },
    /// Print the totals of a draft file, offline
    Totals { file: PathBuf },
    /// Write a stored sale to a draft file for editing
    Edit {
        id: EntityId,
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Validate a draft file and create the sale, or update it with --id
    Submit {
        file: PathBuf,
        #[arg(long)]
        id: Option<EntityId>,
    },
    Cancel { id: EntityId },
}

#[derive(Debug, Subcommand)]
pub enum PaymentsCommand {
    /// Payments and installments of a sale
    List { sale_id: EntityId },
    /// Compute an installment plan for a sale's remaining balance
    Plan {
        sale_id: EntityId,
        /// Number of monthly installments
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// Due date of the first installment (YYYY-MM-DD)
        #[arg(long)]
        first_due: NaiveDate,
        /// cash, credit-card, debit-card, pix, bank-slip, store-credit
        #[arg(long, default_value = "credit-card")]
        method: PaymentMethod,
        /// Amount to finance; defaults to the remaining balance
        #[arg(long, value_parser = parse_money)]
        amount: Option<Money>,
        /// Register the plan as a payment
        #[arg(long)]
        submit: bool,
    },
    /// Mark one installment as paid today
    Pay {
        payment_id: EntityId,
        installment_id: EntityId,
    },
}

fn parse_money(raw: &str) -> Result<Money, String> {
    Money::parse(raw).ok_or_else(|| format!("'{raw}' is not an amount like 150.00"))
}
