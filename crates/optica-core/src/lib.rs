//! # optica-core: Pure Business Logic for Optica Admin
//!
//! This crate holds every rule of the optical shop's back office that can
//! be decided without talking to the store API: sale totals, the sale
//! wizard, prescription validation, payload sanitizing and installment
//! plans.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Optica Admin Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/admin (CLI)                             │   │
//! │  │    login ──► clients ──► prescriptions ──► sales ──► payments   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ optica-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  money   │ │  wizard  │ │   validation     │  │   │
//! │  │   │  Sale    │ │  Money   │ │  steps   │ │   prescription   │  │   │
//! │  │   │  Product │ │  measure │ │  sale    │ │   payment        │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                optica-api (REST client + session)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types returned by the API (Client, Product, Sale, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`measure`] - Diopters and millimeters in fixed-point hundredths
//! - [`error`] - Domain error types
//! - [`forms`] - Client, product and service request bodies
//! - [`validation`] - One validator per form field
//! - [`prescription`] - Prescription form and request
//! - [`sale`] - Sale draft, totals and payload mapping
//! - [`wizard`] - The multi-step sale flow
//! - [`payment`] - Installment plans and balances
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: functions that need "today" take it as an argument
//! 2. **No I/O**: network and file system access live in optica-api
//! 3. **Integer Money**: amounts are cents (i64), lens powers are hundredths
//! 4. **Explicit Errors**: every failure is a typed error, never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use optica_core::sale::calculate_totals;
//! use optica_core::Money;
//!
//! // Discount larger than the subtotal never yields a negative total.
//! let totals = calculate_totals(&[], Money::from_cents(1000));
//! assert_eq!(totals.total, Money::zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod forms;
pub mod measure;
pub mod money;
pub mod payment;
pub mod prescription;
pub mod sale;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, FieldErrors, ValidationError};
pub use forms::{ClientRequest, ProductRequest, ServiceRequest};
pub use measure::{Diopters, Millimeters};
pub use money::Money;
pub use sale::{SaleDraft, SalePayload, SaleTotals};
pub use types::*;
pub use wizard::{SaleWizard, WizardMode, WizardStep};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single product line.
///
/// ## Business Reason
/// Catches typos like 100 instead of 1 before they reach the API.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum number of product lines in one sale.
pub const MAX_SALE_LINES: usize = 100;

/// Longest installment plan the shop offers.
pub const MAX_INSTALLMENTS: u32 = 24;
