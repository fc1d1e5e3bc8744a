//! # Sale Module
//!
//! The in-progress sale ("draft"), its totals, and the mapping from the
//! draft to the request body the API accepts.
//!
//! ## Draft vs Payload
//! ```text
//! ┌──────────────────────────────────┐        ┌──────────────────────────────┐
//! │ SaleDraft (form shape)           │        │ SalePayload (request shape)  │
//! │                                  │        │                              │
//! │ client: ClientRef { id, name }   │ ─────► │ clientId: 3                  │
//! │ products: [ProductLine {         │        │ items: [{                    │
//! │   product: Product { .. },       │ ─────► │   productId: 10,             │
//! │   quantity: 2,                   │        │   quantity: 2,               │
//! │   frame: { color: "" , .. } }]   │ ─────► │   frameDetails: null }]      │
//! │ services: [OpticalService]       │ ─────► │ serviceIds: [5]              │
//! │ notes: "  "                      │ ─────► │ notes: null                  │
//! │ protocol: { page: "5", .. }      │ ─────► │ protocol: { page: 5, .. }    │
//! └──────────────────────────────────┘        └──────────────────────────────┘
//! ```
//!
//! The mapper never fails. Blank strings become `None`, numeric strings are
//! coerced (unreadable ones become `None`), and the protocol block is
//! dropped when none of its fields carries a value. Rejecting bad input is
//! the wizard's job, see [`crate::wizard`].
//!
//! ## Totals
//! ```text
//! subtotal = Σ unit_price × quantity      (product lines only)
//! total    = max(0, subtotal − discount)
//! ```
//! Service prices are fixed and reported separately by
//! [`SaleDraft::services_total`].

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{ClientRef, EntityId, FrameDetails, OpticalService, Product, Protocol, Sale};

// =============================================================================
// Draft
// =============================================================================

/// Frame attributes as typed into the product line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameDetailsForm {
    pub material: String,
    pub color: String,
    pub reference: String,
}

impl FrameDetailsForm {
    pub fn is_blank(&self) -> bool {
        self.material.trim().is_empty() && self.color.trim().is_empty() && self.reference.trim().is_empty()
    }

    fn to_details(&self) -> Option<FrameDetails> {
        FrameDetails {
            material: Some(self.material.clone()),
            color: Some(self.color.clone()),
            reference: Some(self.reference.clone()),
        }
        .sanitized()
    }
}

impl From<&FrameDetails> for FrameDetailsForm {
    fn from(details: &FrameDetails) -> Self {
        FrameDetailsForm {
            material: details.material.clone().unwrap_or_default(),
            color: details.color.clone().unwrap_or_default(),
            reference: details.reference.clone().unwrap_or_default(),
        }
    }
}

/// A product in the draft, carrying the whole product for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub frame: FrameDetailsForm,
}

impl ProductLine {
    pub fn new(product: Product, quantity: u32) -> Self {
        ProductLine {
            product,
            quantity,
            frame: FrameDetailsForm::default(),
        }
    }

    /// unit price × quantity. A product without a price contributes zero.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.unit_price() * self.quantity
    }
}

/// Protocol fields as typed. `page` and `service_order_id` are text until
/// the payload is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolForm {
    pub record_number: String,
    pub book: String,
    pub page: String,
    pub service_order_id: String,
    pub prescription_id: Option<EntityId>,
}

impl ProtocolForm {
    /// Coerces the form into the wire block; `None` when nothing is filled.
    pub fn to_protocol(&self) -> Option<Protocol> {
        Protocol {
            record_number: Some(self.record_number.clone()),
            book: Some(self.book.clone()),
            page: self.page.trim().parse().ok(),
            service_order_id: self.service_order_id.trim().parse().ok(),
            prescription_id: self.prescription_id,
        }
        .sanitized()
    }
}

impl From<&Protocol> for ProtocolForm {
    fn from(protocol: &Protocol) -> Self {
        ProtocolForm {
            record_number: protocol.record_number.clone().unwrap_or_default(),
            book: protocol.book.clone().unwrap_or_default(),
            page: protocol.page.map(|p| p.to_string()).unwrap_or_default(),
            service_order_id: protocol
                .service_order_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            prescription_id: protocol.prescription_id,
        }
    }
}

/// The sale being built or edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleDraft {
    pub client: Option<ClientRef>,
    pub prescription_id: Option<EntityId>,
    pub products: Vec<ProductLine>,
    pub services: Vec<OpticalService>,
    pub discount: Money,
    pub notes: String,
    pub protocol: ProtocolForm,
}

impl SaleDraft {
    /// Hydrates a draft from a stored sale.
    ///
    /// Lines keep the price that was charged when the API recorded one, so
    /// re-opening an old sale does not silently reprice it.
    pub fn from_sale(sale: &Sale) -> Self {
        let products = sale
            .items
            .iter()
            .map(|item| {
                let mut product = item.product.clone();
                if item.unit_price.is_some() {
                    product.sale_price = item.unit_price;
                }
                ProductLine {
                    product,
                    quantity: item.quantity,
                    frame: item
                        .frame_details
                        .as_ref()
                        .map(FrameDetailsForm::from)
                        .unwrap_or_default(),
                }
            })
            .collect();

        SaleDraft {
            client: Some(sale.client.clone()),
            prescription_id: sale.prescription_id,
            products,
            services: sale.services.clone(),
            discount: sale.discount,
            notes: sale.notes.clone().unwrap_or_default(),
            protocol: sale.protocol.as_ref().map(ProtocolForm::from).unwrap_or_default(),
        }
    }

    pub fn totals(&self) -> SaleTotals {
        calculate_totals(&self.products, self.discount)
    }

    /// Sum of the fixed service prices.
    pub fn services_total(&self) -> Money {
        self.services.iter().map(|s| s.price).sum()
    }

    pub fn line(&self, product_id: EntityId) -> Option<&ProductLine> {
        self.products.iter().find(|l| l.product.id == product_id)
    }

    /// Maps the draft to the request body. Never fails.
    pub fn to_payload(&self) -> SalePayload {
        let items = self
            .products
            .iter()
            .map(|line| SaleItemPayload {
                product_id: line.product.id,
                quantity: line.quantity,
                frame_details: if line.product.category.is_frame() {
                    line.frame.to_details()
                } else {
                    None
                },
            })
            .collect();

        SalePayload {
            client_id: self.client.as_ref().map(|c| c.id),
            prescription_id: self.prescription_id,
            items,
            service_ids: self.services.iter().map(|s| s.id).collect(),
            discount: self.discount,
            notes: Some(self.notes.clone()),
            protocol: self.protocol.to_protocol(),
        }
        .sanitized()
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived amounts of a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

/// Computes subtotal and total for a set of product lines.
///
/// ## Rules
/// - `subtotal` = Σ unit price × quantity; a missing price counts as zero
/// - `total` = `max(0, subtotal − discount)`
///
/// ## Example
/// ```rust
/// use optica_core::sale::calculate_totals;
/// use optica_core::Money;
///
/// let totals = calculate_totals(&[], Money::from_cents(500));
/// assert_eq!(totals.subtotal, Money::zero());
/// assert_eq!(totals.total, Money::zero());
/// ```
pub fn calculate_totals(lines: &[ProductLine], discount: Money) -> SaleTotals {
    let subtotal: Money = lines.iter().map(ProductLine::line_total).sum();
    SaleTotals {
        subtotal,
        discount,
        total: (subtotal - discount).non_negative(),
    }
}

// =============================================================================
// Payload
// =============================================================================

/// One product line in the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemPayload {
    pub product_id: EntityId,
    pub quantity: u32,
    pub frame_details: Option<FrameDetails>,
}

/// Body of `POST /sales` and `PUT /sales/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    pub client_id: Option<EntityId>,
    pub prescription_id: Option<EntityId>,
    pub items: Vec<SaleItemPayload>,
    pub service_ids: Vec<EntityId>,
    pub discount: Money,
    pub notes: Option<String>,
    pub protocol: Option<Protocol>,
}

impl SalePayload {
    /// Normalizes optional fields: trims text, turns blanks into `None`,
    /// drops empty frame-detail and protocol blocks.
    ///
    /// Idempotent: `p.sanitized().sanitized() == p.sanitized()`.
    pub fn sanitized(self) -> Self {
        SalePayload {
            items: self
                .items
                .into_iter()
                .map(|item| SaleItemPayload {
                    frame_details: item.frame_details.and_then(FrameDetails::sanitized),
                    ..item
                })
                .collect(),
            notes: blank_to_none(self.notes),
            protocol: self.protocol.and_then(Protocol::sanitized),
            ..self
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl FrameDetails {
    /// Blank fields become `None`; `None` when nothing is left.
    pub fn sanitized(self) -> Option<FrameDetails> {
        let details = FrameDetails {
            material: blank_to_none(self.material),
            color: blank_to_none(self.color),
            reference: blank_to_none(self.reference),
        };
        (!details.is_empty()).then_some(details)
    }
}

impl Protocol {
    /// Blank text becomes `None`; `None` when no sub-field is populated.
    pub fn sanitized(self) -> Option<Protocol> {
        let protocol = Protocol {
            record_number: blank_to_none(self.record_number),
            book: blank_to_none(self.book),
            ..self
        };
        (!protocol.is_empty()).then_some(protocol)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductCategory, SaleItem, SaleStatus};

    fn product(id: EntityId, category: ProductCategory, cents: Option<i64>) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            category,
            brand: None,
            code: None,
            sale_price: cents.map(Money::from_cents),
            cost_price: None,
            stock: None,
            active: true,
        }
    }

    fn service(id: EntityId, cents: i64) -> OpticalService {
        OpticalService {
            id,
            name: format!("Service {id}"),
            description: None,
            price: Money::from_cents(cents),
            active: true,
        }
    }

    #[test]
    fn test_totals() {
        let lines = vec![
            ProductLine::new(product(1, ProductCategory::Frame, Some(34990)), 1),
            ProductLine::new(product(2, ProductCategory::Lens, Some(12000)), 2),
            ProductLine::new(product(3, ProductCategory::Accessory, None), 4),
        ];
        let totals = calculate_totals(&lines, Money::from_cents(4990));
        assert_eq!(totals.subtotal.cents(), 58990);
        assert_eq!(totals.total.cents(), 54000);

        let totals = calculate_totals(&lines, Money::from_cents(100_000));
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_oversized_line_from_a_file_does_not_panic() {
        let draft: SaleDraft = serde_json::from_str(
            r#"{
                "products": [
                    { "product": { "id": 1, "name": "Frame", "category": "FRAME", "salePrice": 100000000000 },
                      "quantity": 4000000000 },
                    { "product": { "id": 2, "name": "Lens", "category": "LENS", "salePrice": 100000000000 },
                      "quantity": 4000000000 }
                ],
                "discount": 10
            }"#,
        )
        .unwrap();

        let totals = draft.totals();
        assert_eq!(totals.subtotal, Money::from_cents(i64::MAX));
        assert_eq!(totals.total.cents(), i64::MAX - 1000);

        let wizard = crate::SaleWizard::from_draft(draft, crate::WizardMode::Create);
        let Err(crate::CoreError::Fields(errors)) = wizard.submit() else {
            panic!("expected field errors");
        };
        assert!(errors.get("items[0].quantity").is_some());
        assert!(errors.get("items[1].quantity").is_some());
    }

        #[test]
    fn test_services_do_not_enter_subtotal() {
        let draft = SaleDraft {
            services: vec![service(5, 8000), service(6, 2000)],
            ..Default::default()
        };
        assert_eq!(draft.totals().subtotal, Money::zero());
        assert_eq!(draft.services_total().cents(), 10000);
    }

    #[test]
    fn test_payload_uses_ids_only() {
        let mut frame = ProductLine::new(product(10, ProductCategory::Frame, Some(34990)), 1);
        frame.frame.material = " Acetate ".into();
        let mut lens = ProductLine::new(product(11, ProductCategory::Lens, Some(20000)), 2);
        lens.frame.color = "Blue".into();

        let draft = SaleDraft {
            client: Some(ClientRef { id: 3, name: "Ana".into() }),
            products: vec![frame, lens],
            services: vec![service(5, 8000)],
            notes: "   ".into(),
            ..Default::default()
        };
        let payload = draft.to_payload();

        assert_eq!(payload.client_id, Some(3));
        assert_eq!(payload.items[0].product_id, 10);
        assert_eq!(
            payload.items[0].frame_details,
            Some(FrameDetails {
                material: Some("Acetate".into()),
                color: None,
                reference: None,
            })
        );
        // Frame details never travel on non-frame lines.
        assert_eq!(payload.items[1].frame_details, None);
        assert_eq!(payload.service_ids, vec![5]);
        assert_eq!(payload.notes, None);
        assert_eq!(payload.protocol, None);
    }

    #[test]
    fn test_protocol_page_only() {
        let mut draft = SaleDraft::default();
        draft.protocol.page = "5".into();
        let protocol = draft.to_payload().protocol.unwrap();
        assert_eq!(protocol.page, Some(5));
        assert_eq!(protocol.book, None);
    }

    #[test]
    fn test_unreadable_numbers_coerce_to_none() {
        let mut draft = SaleDraft::default();
        draft.protocol.page = "five".into();
        draft.protocol.service_order_id = "OS-1".into();
        assert_eq!(draft.to_payload().protocol, None);
    }

    #[test]
    fn test_payload_json_shape() {
        let mut draft = SaleDraft::default();
        draft.protocol.book = "B2".into();
        draft.discount = Money::from_cents(1050);
        let json = serde_json::to_value(draft.to_payload()).unwrap();
        assert_eq!(json["clientId"], serde_json::Value::Null);
        assert_eq!(json["discount"], serde_json::json!(10.5));
        assert_eq!(json["protocol"]["book"], "B2");
        assert_eq!(json["protocol"]["page"], serde_json::Value::Null);
    }

    #[test]
    fn test_sanitize_twice_is_same() {
        let payload = SalePayload {
            client_id: Some(1),
            prescription_id: None,
            items: vec![SaleItemPayload {
                product_id: 2,
                quantity: 1,
                frame_details: Some(FrameDetails {
                    material: Some("  ".into()),
                    color: Some(" Black".into()),
                    reference: None,
                }),
            }],
            service_ids: vec![],
            discount: Money::zero(),
            notes: Some(" thanks ".into()),
            protocol: Some(Protocol {
                record_number: Some("".into()),
                ..Default::default()
            }),
        };
        let once = payload.sanitized();
        assert_eq!(once.clone().sanitized(), once);
        assert_eq!(once.notes.as_deref(), Some("thanks"));
        assert_eq!(once.protocol, None);
    }

    #[test]
    fn test_from_sale_keeps_charged_price() {
        let sale = Sale {
            id: 9,
            client: ClientRef { id: 3, name: "Ana".into() },
            prescription_id: Some(4),
            items: vec![SaleItem {
                id: Some(1),
                product: product(10, ProductCategory::Frame, Some(40000)),
                quantity: 1,
                unit_price: Some(Money::from_cents(35000)),
                frame_details: Some(FrameDetails {
                    material: Some("Metal".into()),
                    color: None,
                    reference: None,
                }),
            }],
            services: vec![service(5, 8000)],
            subtotal: Money::from_cents(35000),
            discount: Money::from_cents(1000),
            total: Money::from_cents(34000),
            notes: None,
            protocol: Some(Protocol {
                page: Some(7),
                ..Default::default()
            }),
            status: SaleStatus::Pending,
            created_at: None,
        };

        let draft = SaleDraft::from_sale(&sale);
        assert_eq!(draft.totals().total, sale.total);
        assert_eq!(draft.products[0].frame.material, "Metal");
        assert_eq!(draft.protocol.page, "7");

        let payload = draft.to_payload();
        assert_eq!(payload.prescription_id, Some(4));
        assert_eq!(payload.protocol.unwrap().page, Some(7));
    }
}
