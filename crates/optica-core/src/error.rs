//! # Error Types
//!
//! Domain-specific error types for optica-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  optica-core errors (this file)                                        │
//! │  ├── CoreError        - Sale wizard / payment rule violations          │
//! │  ├── ValidationError  - A single form field failed a check             │
//! │  └── FieldErrors      - Every failing field of a form, by path         │
//! │                                                                         │
//! │  optica-api errors (separate crate)                                    │
//! │  └── ApiError         - HTTP failures and API error envelopes          │
//! │                                                                         │
//! │  admin app errors                                                      │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → CoreError → ApiError → AppError │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` of a `ValidationError` IS the helper text shown next to
//!    the field, so messages are complete sentences without the field path
//! 3. Errors are enum variants, never String

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent rule violations while building a sale or a
/// payment. They are caught by the front end and shown as notifications.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// One or more form fields failed validation.
    ///
    /// ## When This Occurs
    /// - `SaleWizard::next()` on a step with invalid fields
    /// - `SaleWizard::submit()` before every step is valid
    /// - `PrescriptionForm::into_request()` with bad measurements
    #[error("Validation failed: {0}")]
    Fields(FieldErrors),

    /// A product line does not exist in the draft.
    #[error("Product {product_id} is not in the sale")]
    LineNotFound { product_id: i64 },

    /// A service was added twice to the same sale.
    #[error("Service {service_id} is already in the sale")]
    DuplicateService { service_id: i64 },

    /// Sale has exceeded maximum allowed lines.
    #[error("A sale cannot have more than {max} lines")]
    SaleTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// The wizard was asked to jump to a step it has not reached yet.
    #[error("Step '{step}' has not been reached yet")]
    StepNotReached { step: String },

    /// The sale can no longer be edited.
    ///
    /// ## When This Occurs
    /// - Hydrating the wizard from a canceled sale
    #[error("Sale {sale_id} is {status}, it cannot be edited")]
    SaleNotEditable { sale_id: i64, status: String },

    /// Payment amount is invalid.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Installment count outside the allowed range.
    #[error("Installment count {requested} must be between 1 and {max}")]
    InvalidInstallmentCount { requested: u32, max: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::Fields(errors)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything is sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    ///
    /// Bounds are pre-formatted so dioptric values keep their sign and two
    /// decimals ("-10.00 and 0.00").
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not a multiple of the allowed increment.
    #[error("{field} must be in steps of {step}")]
    InvalidStep { field: String, step: String },

    /// Invalid format (e.g., not a number, bad CPF).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Date lies in the future.
    #[error("{field} cannot be in the future")]
    FutureDate { field: String },

    /// Date is not after another date.
    #[error("{field} must be after {other}")]
    NotAfter { field: String, other: String },

    /// Field does not apply in the current context.
    #[error("{field} {reason}")]
    NotApplicable { field: String, reason: String },

    /// Duplicate value.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Field Errors
// =============================================================================

/// All failing fields of a form, keyed by field path (`"rightEye.axis"`).
///
/// ## Usage
/// ```rust
/// use optica_core::error::FieldErrors;
/// use optica_core::validation::validate_crm;
///
/// let mut errors = FieldErrors::new();
/// errors.check("crm", validate_crm("12"));
/// assert!(errors.get("crm").is_some());
/// assert!(errors.into_result().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, ValidationError>,
}

impl FieldErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of a validator. Only the first error per field
    /// is kept.
    pub fn check(&mut self, path: impl Into<String>, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            self.errors.entry(path.into()).or_insert(err);
        }
    }

    /// Records an error directly.
    pub fn insert(&mut self, path: impl Into<String>, err: ValidationError) {
        self.errors.entry(path.into()).or_insert(err);
    }

    /// Merges another collection, prefixing its paths.
    pub fn merge_prefixed(&mut self, prefix: &str, other: FieldErrors) {
        for (path, err) in other.errors {
            self.insert(format!("{prefix}.{path}"), err);
        }
    }

    /// Returns the error recorded for a field path.
    pub fn get(&self, path: &str) -> Option<&ValidationError> {
        self.errors.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates `(path, error)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `Ok(())` when nothing failed, otherwise the collection itself.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, err) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{path}: {err}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1200 exceeds maximum allowed (999)");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Axis".to_string(),
        };
        assert_eq!(err.to_string(), "Axis is required");

        let err = ValidationError::OutOfRange {
            field: "Cylindrical".to_string(),
            min: "-10.00".to_string(),
            max: "0.00".to_string(),
        };
        assert_eq!(err.to_string(), "Cylindrical must be between -10.00 and 0.00");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "Client".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_field_errors_keep_first_error_per_field() {
        let mut errors = FieldErrors::new();
        errors.insert("crm", ValidationError::Required { field: "CRM".into() });
        errors.insert(
            "crm",
            ValidationError::TooShort {
                field: "CRM".into(),
                min: 4,
            },
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("crm").unwrap().to_string(), "CRM is required");
    }

    #[test]
    fn test_field_errors_prefix_and_display() {
        let mut eye = FieldErrors::new();
        eye.insert("axis", ValidationError::Required { field: "Axis".into() });

        let mut form = FieldErrors::new();
        form.merge_prefixed("rightEye", eye);

        assert!(form.get("rightEye.axis").is_some());
        assert_eq!(form.to_string(), "rightEye.axis: Axis is required");
        assert!(form.into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
