//! # Sale Wizard
//!
//! The one sale-creation flow. Holds a [`SaleDraft`] and walks the operator
//! through it step by step, validating each step before moving on.
//!
//! ## Steps
//! ```text
//! ┌────────┐   ┌──────────────┐   ┌──────────┐   ┌──────────┐   ┌────────┐
//! │ Client │──►│ Prescription │──►│ Products │──►│ Services │──►│ Review │
//! └────────┘   └──────────────┘   └──────────┘   └──────────┘   └────────┘
//!   client       optional link      quantities     at least one    discount
//!   required                        frame details  product or      notes
//!                                                  service         protocol
//! ```
//!
//! - `next()` validates the current step and advances only when it passes
//! - `back()` never validates
//! - `go_to()` jumps to any step already reached
//! - `submit()` validates every step and returns the sanitized payload
//!
//! In edit mode every step counts as reached, since the stored sale was
//! complete when it was saved.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, FieldErrors, ValidationError};
use crate::money::Money;
use crate::sale::{FrameDetailsForm, ProductLine, ProtocolForm, SaleDraft, SalePayload, SaleTotals};
use crate::types::{ClientRef, EntityId, OpticalService, Product, Sale};
use crate::validation::{
    validate_discount, validate_frame_detail, validate_notes, validate_protocol_page,
    validate_quantity, validate_service_order,
};
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_LINES};

// =============================================================================
// Step & Mode
// =============================================================================

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Client,
    Prescription,
    Products,
    Services,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Client,
        WizardStep::Prescription,
        WizardStep::Products,
        WizardStep::Services,
        WizardStep::Review,
    ];

    /// Zero-based position.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Client => "client",
            WizardStep::Prescription => "prescription",
            WizardStep::Products => "products",
            WizardStep::Services => "services",
            WizardStep::Review => "review",
        };
        f.write_str(name)
    }
}

/// Whether the wizard creates a new sale or edits a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardMode {
    Create,
    Edit(EntityId),
}

// =============================================================================
// Wizard
// =============================================================================

/// Multi-step sale builder.
///
/// ## Example
/// ```rust
/// use optica_core::wizard::{SaleWizard, WizardStep};
/// use optica_core::ClientRef;
///
/// let mut wizard = SaleWizard::new();
/// assert!(wizard.next().is_err()); // no client yet
///
/// wizard.set_client(ClientRef { id: 3, name: "Ana Souza".into() });
/// assert_eq!(wizard.next().unwrap(), WizardStep::Prescription);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SaleWizard {
    draft: SaleDraft,
    mode: WizardMode,
    step: WizardStep,
    reached: WizardStep,
}

impl Default for SaleWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SaleWizard {
    /// An empty wizard in create mode.
    pub fn new() -> Self {
        SaleWizard {
            draft: SaleDraft::default(),
            mode: WizardMode::Create,
            step: WizardStep::Client,
            reached: WizardStep::Client,
        }
    }

    /// Opens a stored sale for editing.
    ///
    /// ## Errors
    /// `SaleNotEditable` when the sale has been canceled.
    pub fn edit(sale: &Sale) -> CoreResult<Self> {
        if !sale.status.is_editable() {
            return Err(CoreError::SaleNotEditable {
                sale_id: sale.id,
                status: sale.status.to_string(),
            });
        }
        Ok(Self::from_draft(SaleDraft::from_sale(sale), WizardMode::Edit(sale.id)))
    }

    /// Resumes a draft that was saved earlier (e.g. to a file).
    ///
    /// Every step counts as reached; `submit()` still validates them all.
    pub fn from_draft(draft: SaleDraft, mode: WizardMode) -> Self {
        SaleWizard {
            draft,
            mode,
            step: WizardStep::Client,
            reached: WizardStep::Review,
        }
    }

    pub fn draft(&self) -> &SaleDraft {
        &self.draft
    }

    pub fn into_draft(self) -> SaleDraft {
        self.draft
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Furthest step the operator has unlocked.
    pub fn reached(&self) -> WizardStep {
        self.reached
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Validates the current step and moves forward.
    ///
    /// On the last step the wizard stays put.
    pub fn next(&mut self) -> CoreResult<WizardStep> {
        self.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            self.step = next;
            self.reached = self.reached.max(next);
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Jumps to a step the operator has already reached.
    pub fn go_to(&mut self, step: WizardStep) -> CoreResult<()> {
        if step > self.reached {
            return Err(CoreError::StepNotReached {
                step: step.to_string(),
            });
        }
        self.step = step;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    /// Sets the client. A prescription picked for another client is cleared.
    pub fn set_client(&mut self, client: ClientRef) {
        let changed = self.draft.client.as_ref().is_some_and(|c| c.id != client.id);
        if changed {
            self.draft.prescription_id = None;
            self.draft.protocol.prescription_id = None;
        }
        self.draft.client = Some(client);
    }

    pub fn set_prescription(&mut self, prescription_id: Option<EntityId>) {
        self.draft.prescription_id = prescription_id;
    }

    /// Adds a product, or increases the quantity of an existing line.
    ///
    /// ## Errors
    /// - Quantity 0 (`Validation`)
    /// - Resulting quantity above 999 (`QuantityTooLarge`)
    /// - A new line when the sale already has 100 (`SaleTooLarge`)
    pub fn add_product(&mut self, product: Product, quantity: u32) -> CoreResult<()> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        if let Some(line) = self
            .draft
            .products
            .iter_mut()
            .find(|l| l.product.id == product.id)
        {
            let requested = line.quantity.saturating_add(quantity);
            if requested > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = requested;
            return Ok(());
        }

        if self.draft.products.len() >= MAX_SALE_LINES {
            return Err(CoreError::SaleTooLarge { max: MAX_SALE_LINES });
        }
        self.draft.products.push(ProductLine::new(product, quantity));
        Ok(())
    }

    pub fn set_quantity(&mut self, product_id: EntityId, quantity: u32) -> CoreResult<()> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;
        self.line_mut(product_id)?.quantity = quantity;
        Ok(())
    }

    /// Sets frame details on a line. Only frames carry them.
    pub fn set_frame_details(&mut self, product_id: EntityId, frame: FrameDetailsForm) -> CoreResult<()> {
        let line = self.line_mut(product_id)?;
        if !line.product.category.is_frame() && !frame.is_blank() {
            return Err(ValidationError::NotApplicable {
                field: "Frame details".to_string(),
                reason: format!("apply only to frames, '{}' is a {}", line.product.name, line.product.category),
            }
            .into());
        }
        line.frame = frame;
        Ok(())
    }

    pub fn remove_product(&mut self, product_id: EntityId) -> CoreResult<ProductLine> {
        let idx = self
            .draft
            .products
            .iter()
            .position(|l| l.product.id == product_id)
            .ok_or(CoreError::LineNotFound { product_id })?;
        Ok(self.draft.products.remove(idx))
    }

    pub fn add_service(&mut self, service: OpticalService) -> CoreResult<()> {
        if self.draft.services.iter().any(|s| s.id == service.id) {
            return Err(CoreError::DuplicateService { service_id: service.id });
        }
        self.draft.services.push(service);
        Ok(())
    }

    /// Returns whether the service was in the sale.
    pub fn remove_service(&mut self, service_id: EntityId) -> bool {
        let before = self.draft.services.len();
        self.draft.services.retain(|s| s.id != service_id);
        self.draft.services.len() != before
    }

    pub fn set_discount(&mut self, discount: Money) -> CoreResult<()> {
        validate_discount(discount)?;
        self.draft.discount = discount;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.notes = notes.into();
    }

    pub fn protocol_mut(&mut self) -> &mut ProtocolForm {
        &mut self.draft.protocol
    }

    fn line_mut(&mut self, product_id: EntityId) -> CoreResult<&mut ProductLine> {
        self.draft
            .products
            .iter_mut()
            .find(|l| l.product.id == product_id)
            .ok_or(CoreError::LineNotFound { product_id })
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    pub fn totals(&self) -> SaleTotals {
        self.draft.totals()
    }

    // -------------------------------------------------------------------------
    // Validation & submission
    // -------------------------------------------------------------------------

    /// Checks one step's rules, collecting every failing field.
    pub fn validate_step(&self, step: WizardStep) -> Result<(), FieldErrors> {
        let draft = &self.draft;
        let mut errors = FieldErrors::new();

        match step {
            WizardStep::Client => {
                if draft.client.is_none() {
                    errors.insert(
                        "clientId",
                        ValidationError::Required {
                            field: "Client".to_string(),
                        },
                    );
                }
            }
            // Linking a prescription is optional.
            WizardStep::Prescription => {}
            WizardStep::Products => {
                for (i, line) in draft.products.iter().enumerate() {
                    errors.merge_prefixed(&format!("items[{i}]"), validate_line(line));
                }
            }
            WizardStep::Services => {
                if draft.products.is_empty() && draft.services.is_empty() {
                    errors.insert(
                        "items",
                        ValidationError::Required {
                            field: "At least one product or service".to_string(),
                        },
                    );
                }
            }
            WizardStep::Review => {
                errors.check("discount", validate_discount(draft.discount));
                errors.check("notes", validate_notes(&draft.notes));
                errors.check(
                    "protocol.recordNumber",
                    validate_frame_detail("Record number", &draft.protocol.record_number),
                );
                errors.check("protocol.book", validate_frame_detail("Book", &draft.protocol.book));
                errors.check("protocol.page", validate_protocol_page(&draft.protocol.page));
                errors.check(
                    "protocol.serviceOrderId",
                    validate_service_order(&draft.protocol.service_order_id),
                );
            }
        }

        errors.into_result()
    }

    /// Validates every step and maps the draft to the request body.
    ///
    /// ## Errors
    /// `CoreError::Fields` with the failures of all steps combined.
    pub fn submit(&self) -> CoreResult<SalePayload> {
        let mut errors = FieldErrors::new();
        for step in WizardStep::ALL {
            if let Err(step_errors) = self.validate_step(step) {
                for (path, err) in step_errors.iter() {
                    errors.insert(path, err.clone());
                }
            }
        }
        errors.into_result()?;
        Ok(self.draft.to_payload())
    }
}

fn validate_line(line: &ProductLine) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check("quantity", validate_quantity(line.quantity));

    if line.product.category.is_frame() {
        errors.check("frameDetails.material", validate_frame_detail("Material", &line.frame.material));
        errors.check("frameDetails.color", validate_frame_detail("Color", &line.frame.color));
        errors.check(
            "frameDetails.reference",
            validate_frame_detail("Reference", &line.frame.reference),
        );
    } else if !line.frame.is_blank() {
        errors.insert(
            "frameDetails",
            ValidationError::NotApplicable {
                field: "Frame details".to_string(),
                reason: "apply only to frames".to_string(),
            },
        );
    }
    errors
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductCategory, SaleStatus};

    fn client() -> ClientRef {
        ClientRef {
            id: 3,
            name: "Ana Souza".into(),
        }
    }

    fn product(id: EntityId, category: ProductCategory, cents: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            category,
            brand: None,
            code: None,
            sale_price: Some(Money::from_cents(cents)),
            cost_price: None,
            stock: Some(10),
            active: true,
        }
    }

    fn service(id: EntityId) -> OpticalService {
        OpticalService {
            id,
            name: "Lens fitting".into(),
            description: None,
            price: Money::from_cents(8000),
            active: true,
        }
    }

    fn sale(status: SaleStatus) -> Sale {
        Sale {
            id: 77,
            client: client(),
            prescription_id: None,
            items: vec![],
            services: vec![service(1)],
            subtotal: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
            notes: None,
            protocol: None,
            status,
            created_at: None,
        }
    }

    #[test]
    fn test_full_walkthrough() {
        let mut wizard = SaleWizard::new();
        wizard.set_client(client());
        assert_eq!(wizard.next().unwrap(), WizardStep::Prescription);
        wizard.set_prescription(Some(4));
        assert_eq!(wizard.next().unwrap(), WizardStep::Products);

        wizard.add_product(product(10, ProductCategory::Frame, 34990), 1).unwrap();
        wizard.add_product(product(11, ProductCategory::Lens, 20000), 2).unwrap();
        assert_eq!(wizard.next().unwrap(), WizardStep::Services);

        wizard.add_service(service(1)).unwrap();
        assert_eq!(wizard.next().unwrap(), WizardStep::Review);
        assert_eq!(wizard.next().unwrap(), WizardStep::Review);

        wizard.set_discount(Money::from_cents(4990)).unwrap();
        assert_eq!(wizard.totals().total.cents(), 70000);

        let payload = wizard.submit().unwrap();
        assert_eq!(payload.client_id, Some(3));
        assert_eq!(payload.prescription_id, Some(4));
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.service_ids, vec![1]);
    }

    #[test]
    fn test_next_blocks_without_client() {
        let mut wizard = SaleWizard::new();
        match wizard.next() {
            Err(CoreError::Fields(errors)) => assert!(errors.get("clientId").is_some()),
            other => panic!("expected field errors, got {other:?}"),
        }
        assert_eq!(wizard.step(), WizardStep::Client);
    }

    #[test]
    fn test_services_step_needs_something_to_sell() {
        let mut wizard = SaleWizard::new();
        wizard.set_client(client());
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), WizardStep::Services);
        assert!(wizard.next().is_err());

        wizard.add_service(service(1)).unwrap();
        assert!(wizard.next().is_ok());
    }

    #[test]
    fn test_go_to_only_reached_steps() {
        let mut wizard = SaleWizard::new();
        assert!(matches!(
            wizard.go_to(WizardStep::Products),
            Err(CoreError::StepNotReached { .. })
        ));

        wizard.set_client(client());
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.back(), WizardStep::Prescription);
        assert!(wizard.go_to(WizardStep::Products).is_ok());
        assert_eq!(wizard.back(), WizardStep::Prescription);
        assert_eq!(wizard.back(), WizardStep::Client);
        assert_eq!(wizard.back(), WizardStep::Client);
    }

    #[test]
    fn test_add_product_merges_lines() {
        let mut wizard = SaleWizard::new();
        wizard.add_product(product(10, ProductCategory::Lens, 100), 2).unwrap();
        wizard.add_product(product(10, ProductCategory::Lens, 100), 3).unwrap();
        assert_eq!(wizard.draft().products.len(), 1);
        assert_eq!(wizard.draft().products[0].quantity, 5);

        let err = wizard.add_product(product(10, ProductCategory::Lens, 100), 995).unwrap_err();
        assert_eq!(
            err,
            CoreError::QuantityTooLarge {
                requested: 1000,
                max: MAX_ITEM_QUANTITY
            }
        );
        assert!(wizard.add_product(product(12, ProductCategory::Lens, 100), 0).is_err());
    }

    #[test]
    fn test_sale_line_limit() {
        let mut wizard = SaleWizard::new();
        for id in 0..MAX_SALE_LINES as EntityId {
            wizard.add_product(product(id, ProductCategory::Accessory, 100), 1).unwrap();
        }
        let err = wizard.add_product(product(1000, ProductCategory::Accessory, 100), 1).unwrap_err();
        assert!(matches!(err, CoreError::SaleTooLarge { .. }));
    }

    #[test]
    fn test_line_edits() {
        let mut wizard = SaleWizard::new();
        wizard.add_product(product(10, ProductCategory::Frame, 100), 1).unwrap();
        wizard.add_product(product(11, ProductCategory::Lens, 100), 1).unwrap();

        wizard.set_quantity(10, 3).unwrap();
        assert_eq!(wizard.draft().line(10).unwrap().quantity, 3);
        assert!(wizard.set_quantity(10, 0).is_err());
        assert!(matches!(
            wizard.set_quantity(99, 1),
            Err(CoreError::LineNotFound { product_id: 99 })
        ));

        let frame = FrameDetailsForm {
            color: "Havana".into(),
            ..Default::default()
        };
        wizard.set_frame_details(10, frame.clone()).unwrap();
        assert!(wizard.set_frame_details(11, frame).is_err());

        assert_eq!(wizard.remove_product(11).unwrap().product.id, 11);
        assert!(wizard.remove_product(11).is_err());
    }

    #[test]
    fn test_services_are_unique() {
        let mut wizard = SaleWizard::new();
        wizard.add_service(service(1)).unwrap();
        assert_eq!(
            wizard.add_service(service(1)).unwrap_err(),
            CoreError::DuplicateService { service_id: 1 }
        );
        assert!(wizard.remove_service(1));
        assert!(!wizard.remove_service(1));
    }

    #[test]
    fn test_changing_client_clears_prescription() {
        let mut wizard = SaleWizard::new();
        wizard.set_client(client());
        wizard.set_prescription(Some(4));
        wizard.set_client(client());
        assert_eq!(wizard.draft().prescription_id, Some(4));

        wizard.set_client(ClientRef {
            id: 8,
            name: "Bruno".into(),
        });
        assert_eq!(wizard.draft().prescription_id, None);
    }

    #[test]
    fn test_review_rules() {
        let mut wizard = SaleWizard::new();
        wizard.set_client(client());
        wizard.add_service(service(1)).unwrap();
        assert!(wizard.set_discount(Money::from_cents(-1)).is_err());

        wizard.protocol_mut().page = "0".into();
        wizard.protocol_mut().service_order_id = "abc".into();
        match wizard.submit() {
            Err(CoreError::Fields(errors)) => {
                assert!(errors.get("protocol.page").is_some());
                assert!(errors.get("protocol.serviceOrderId").is_some());
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected field errors, got {other:?}"),
        }

        wizard.protocol_mut().page = "12".into();
        wizard.protocol_mut().service_order_id = "3301".into();
        let protocol = wizard.submit().unwrap().protocol.unwrap();
        assert_eq!(protocol.page, Some(12));
        assert_eq!(protocol.service_order_id, Some(3301));
    }

    #[test]
    fn test_submit_collects_every_step() {
        let mut draft = SaleDraft::default();
        let mut line = ProductLine::new(product(11, ProductCategory::Lens, 100), 0);
        line.frame.color = "Red".into();
        draft.products.push(line);

        let wizard = SaleWizard::from_draft(draft, WizardMode::Create);
        let Err(CoreError::Fields(errors)) = wizard.submit() else {
            panic!("expected field errors");
        };
        assert!(errors.get("clientId").is_some());
        assert!(errors.get("items[0].quantity").is_some());
        assert!(errors.get("items[0].frameDetails").is_some());
    }

    #[test]
    fn test_edit_mode() {
        let wizard = SaleWizard::edit(&sale(SaleStatus::Pending)).unwrap();
        assert_eq!(wizard.mode(), WizardMode::Edit(77));
        assert_eq!(wizard.reached(), WizardStep::Review);
        assert!(wizard.submit().is_ok());

        let err = SaleWizard::edit(&sale(SaleStatus::Canceled)).unwrap_err();
        assert_eq!(err.to_string(), "Sale 77 is canceled, it cannot be edited");
    }
}
