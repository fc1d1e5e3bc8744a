//! # Domain Types
//!
//! Core domain types used throughout Optica Admin. These are the shapes the
//! store API returns; request shapes live next to the logic that builds
//! them (`sale`, `prescription`, `payment`).
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Client       │   │    Product      │   │ OpticalService  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name, cpf      │   │  category       │   │  name           │       │
//! │  │  birth_date     │   │  sale_price     │   │  price (fixed)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    Protocol     │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  items          │   │  record_number  │   │  method         │       │
//! │  │  services       │   │  book, page     │   │  amount         │       │
//! │  │  subtotal/total │   │  service order  │   │  installments   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Conventions
//! - Field names are `camelCase`
//! - Enum values are `SCREAMING_SNAKE_CASE` (`FRAME`, `CREDIT_CARD`)
//! - Ids are the API's numeric primary keys

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

/// Primary key type used by the store API.
pub type EntityId = i64;

fn default_true() -> bool {
    true
}

// =============================================================================
// Client
// =============================================================================

/// A customer of the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: EntityId,
    pub name: String,
    /// Brazilian taxpayer id, digits only or formatted.
    pub cpf: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// The id/name pair embedded in sale records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRef {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
}

impl From<&Client> for ClientRef {
    fn from(client: &Client) -> Self {
        ClientRef {
            id: client.id,
            name: client.name.clone(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Product families sold by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    /// Eyeglass frame. The only category that carries frame details.
    Frame,
    /// Ophthalmic or contact lens.
    Lens,
    /// Cases, cleaning kits, cords.
    Accessory,
}

impl ProductCategory {
    #[inline]
    pub fn is_frame(&self) -> bool {
        matches!(self, ProductCategory::Frame)
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductCategory::Frame => write!(f, "frame"),
            ProductCategory::Lens => write!(f, "lens"),
            ProductCategory::Accessory => write!(f, "accessory"),
        }
    }
}

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub category: ProductCategory,
    pub brand: Option<String>,
    /// Shop-internal product code.
    pub code: Option<String>,
    /// Missing on products that were registered without a price.
    pub sale_price: Option<Money>,
    pub cost_price: Option<Money>,
    pub stock: Option<i64>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Product {
    /// Unit price used for totals. A missing price counts as zero.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.sale_price.unwrap_or_default()
    }
}

/// Frame-specific attributes of a sold frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDetails {
    pub material: Option<String>,
    pub color: Option<String>,
    pub reference: Option<String>,
}

impl FrameDetails {
    pub fn is_empty(&self) -> bool {
        self.material.is_none() && self.color.is_none() && self.reference.is_none()
    }
}

// =============================================================================
// Optical Service
// =============================================================================

/// A service with a fixed price (lens fitting, frame adjustment, eye exam).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpticalService {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    #[serde(default = "default_true")]
    pub active: bool,
}

// =============================================================================
// Lens Type
// =============================================================================

/// Lens design on a prescription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LensType {
    /// Single vision.
    #[default]
    Monofocal,
    Bifocal,
    /// Progressive lenses.
    Multifocal,
}

impl LensType {
    /// Bifocal and multifocal lenses need a near addition.
    #[inline]
    pub fn requires_addition(&self) -> bool {
        matches!(self, LensType::Bifocal | LensType::Multifocal)
    }
}

impl fmt::Display for LensType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LensType::Monofocal => write!(f, "monofocal"),
            LensType::Bifocal => write!(f, "bifocal"),
            LensType::Multifocal => write!(f, "multifocal"),
        }
    }
}

impl FromStr for LensType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monofocal" | "single" | "single_vision" => Ok(LensType::Monofocal),
            "bifocal" => Ok(LensType::Bifocal),
            "multifocal" | "progressive" => Ok(LensType::Multifocal),
            "" => Err(ValidationError::Required {
                field: "Lens type".to_string(),
            }),
            other => Err(ValidationError::InvalidFormat {
                field: "Lens type".to_string(),
                reason: format!("'{other}' is not monofocal, bifocal or multifocal"),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// The status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    /// Registered, not fully paid.
    #[default]
    Pending,
    /// Fully paid and delivered.
    Completed,
    Canceled,
}

impl SaleStatus {
    /// Canceled sales are read-only.
    #[inline]
    pub fn is_editable(&self) -> bool {
        !matches!(self, SaleStatus::Canceled)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Pending => write!(f, "pending"),
            SaleStatus::Completed => write!(f, "completed"),
            SaleStatus::Canceled => write!(f, "canceled"),
        }
    }
}

/// Internal record-keeping block attached to a sale (ledger book, page,
/// service order). Separate from the medical prescription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub record_number: Option<String>,
    pub book: Option<String>,
    pub page: Option<i32>,
    pub service_order_id: Option<EntityId>,
    pub prescription_id: Option<EntityId>,
}

impl Protocol {
    /// True when no sub-field carries a value.
    pub fn is_empty(&self) -> bool {
        self.record_number.is_none()
            && self.book.is_none()
            && self.page.is_none()
            && self.service_order_id.is_none()
            && self.prescription_id.is_none()
    }
}

/// A product line of a stored sale, with the full product embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Option<EntityId>,
    pub product: Product,
    pub quantity: u32,
    /// Price charged at the time of sale, when the API records it.
    pub unit_price: Option<Money>,
    pub frame_details: Option<FrameDetails>,
}

/// A stored sale as returned by `GET /sales/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: EntityId,
    pub client: ClientRef,
    pub prescription_id: Option<EntityId>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(default)]
    pub services: Vec<OpticalService>,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(default)]
    pub discount: Money,
    #[serde(default)]
    pub total: Money,
    pub notes: Option<String>,
    pub protocol: Option<Protocol>,
    #[serde(default)]
    pub status: SaleStatus,
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Payment
// =============================================================================

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    /// Brazilian instant transfer.
    Pix,
    /// Boleto, usually financed in installments.
    BankSlip,
    StoreCredit,
}

impl PaymentMethod {
    /// Methods that can be financed over several installments.
    #[inline]
    pub fn allows_installments(&self) -> bool {
        matches!(
            self,
            PaymentMethod::CreditCard | PaymentMethod::BankSlip | PaymentMethod::StoreCredit
        )
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::CreditCard => write!(f, "credit card"),
            PaymentMethod::DebitCard => write!(f, "debit card"),
            PaymentMethod::Pix => write!(f, "pix"),
            PaymentMethod::BankSlip => write!(f, "bank slip"),
            PaymentMethod::StoreCredit => write!(f, "store credit"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "credit_card" | "credit" => Ok(PaymentMethod::CreditCard),
            "debit_card" | "debit" => Ok(PaymentMethod::DebitCard),
            "pix" => Ok(PaymentMethod::Pix),
            "bank_slip" | "boleto" => Ok(PaymentMethod::BankSlip),
            "store_credit" => Ok(PaymentMethod::StoreCredit),
            other => Err(ValidationError::InvalidFormat {
                field: "Payment method".to_string(),
                reason: format!("unknown method '{other}'"),
            }),
        }
    }
}

/// Installment lifecycle as stored by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallmentStatus::Pending => write!(f, "pending"),
            InstallmentStatus::Paid => write!(f, "paid"),
            InstallmentStatus::Overdue => write!(f, "overdue"),
        }
    }
}

/// One scheduled partial payment within a financed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: Option<EntityId>,
    /// 1-based position in the plan.
    pub number: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
    pub paid_at: Option<NaiveDate>,
    #[serde(default)]
    pub status: InstallmentStatus,
}

/// A payment registered against a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: EntityId,
    pub sale_id: EntityId,
    pub method: PaymentMethod,
    pub amount: Money,
    #[serde(default)]
    pub installments: Vec<Installment>,
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================
