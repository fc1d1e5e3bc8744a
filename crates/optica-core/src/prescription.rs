//! # Prescription Module
//!
//! Optometric prescriptions: the stored record, the raw form the operator
//! fills in, and the request sent to the API.
//!
//! ## Form → Request
//! ```text
//! ┌──────────────────────┐  validate(today)   ┌──────────────────────┐
//! │  PrescriptionForm    │ ─────────────────► │  FieldErrors         │
//! │  (raw strings)       │                    │  "rightEye.axis" ... │
//! └──────────┬───────────┘                    └──────────────────────┘
//!            │ into_request(today)
//!            ▼
//! ┌──────────────────────┐
//! │ PrescriptionRequest  │  typed, Diopters / Millimeters / degrees
//! └──────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, FieldErrors, ValidationError};
use crate::measure::{Diopters, Millimeters};
use crate::types::{EntityId, LensType};
use crate::validation::{
    validate_addition, validate_axis, validate_crm, validate_cylindrical, validate_dnp,
    validate_doctor_name, validate_issue_date, validate_notes, validate_optical_center,
    validate_spherical, validate_valid_until,
};

// =============================================================================
// Stored Prescription
// =============================================================================

/// Measurements for one eye. Blank fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EyeMeasurement {
    pub spherical: Option<Diopters>,
    pub cylindrical: Option<Diopters>,
    /// Cylinder axis in degrees.
    pub axis: Option<u16>,
    /// Naso-pupillary distance.
    pub dnp: Option<Millimeters>,
    pub addition: Option<Diopters>,
    pub optical_center: Option<Millimeters>,
}

/// A prescription as returned by `GET /prescriptions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: EntityId,
    pub client_id: EntityId,
    pub doctor_name: String,
    pub crm: String,
    pub issued_on: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub lens_type: LensType,
    #[serde(default)]
    pub right_eye: EyeMeasurement,
    #[serde(default)]
    pub left_eye: EyeMeasurement,
    pub notes: Option<String>,
}

impl Prescription {
    /// A prescription without an expiry date never expires.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.valid_until.is_some_and(|until| until < today)
    }
}

// =============================================================================
// Form
// =============================================================================

/// Raw text of one eye's fields, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EyeForm {
    pub spherical: String,
    pub cylindrical: String,
    pub axis: String,
    pub dnp: String,
    pub addition: String,
    pub optical_center: String,
}

impl EyeForm {
    /// Runs every field validator for this eye. Paths are relative
    /// (`"axis"`), the caller prefixes them with the eye.
    pub fn validate(&self, lens_type: LensType) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("spherical", validate_spherical(&self.spherical));
        errors.check("cylindrical", validate_cylindrical(&self.cylindrical));
        errors.check("axis", validate_axis(&self.axis, &self.cylindrical));
        errors.check("dnp", validate_dnp(&self.dnp));
        errors.check("addition", validate_addition(&self.addition, lens_type));
        errors.check("opticalCenter", validate_optical_center(&self.optical_center));
        errors
    }

    /// Converts validated text into measurements.
    ///
    /// Unreadable fields become `None`, so call `validate` first. The
    /// addition is dropped for lens types that do not use it.
    pub fn to_measurement(&self, lens_type: LensType) -> EyeMeasurement {
        let addition = if lens_type.requires_addition() {
            Diopters::parse(&self.addition).ok().flatten()
        } else {
            None
        };
        EyeMeasurement {
            spherical: Diopters::parse(&self.spherical).ok().flatten(),
            cylindrical: Diopters::parse(&self.cylindrical).ok().flatten(),
            axis: self.axis.trim().parse().ok(),
            dnp: Millimeters::parse(&self.dnp).ok().flatten(),
            addition,
            optical_center: Millimeters::parse(&self.optical_center).ok().flatten(),
        }
    }

    fn from_measurement(eye: &EyeMeasurement) -> Self {
        fn text<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }
        EyeForm {
            spherical: text(eye.spherical),
            cylindrical: text(eye.cylindrical),
            axis: text(eye.axis),
            dnp: text(eye.dnp),
            addition: text(eye.addition),
            optical_center: text(eye.optical_center),
        }
    }
}

/// The prescription form as the operator fills it in.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use optica_core::prescription::PrescriptionForm;
/// use optica_core::LensType;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let mut form = PrescriptionForm::new(12);
/// form.doctor_name = "Dra. Helena Prado".into();
/// form.crm = "123456".into();
/// form.issued_on = Some(today);
/// form.lens_type = LensType::Bifocal;
/// form.right_eye.cylindrical = "-1.00".into();
///
/// let errors = form.validate(today).unwrap_err();
/// assert!(errors.get("rightEye.axis").is_some());
/// assert!(errors.get("rightEye.addition").is_some());
/// assert!(errors.get("leftEye.addition").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrescriptionForm {
    pub client_id: Option<EntityId>,
    pub doctor_name: String,
    pub crm: String,
    pub issued_on: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub lens_type: LensType,
    pub right_eye: EyeForm,
    pub left_eye: EyeForm,
    pub notes: String,
}

impl PrescriptionForm {
    /// An empty form for a client.
    pub fn new(client_id: EntityId) -> Self {
        PrescriptionForm {
            client_id: Some(client_id),
            ..Default::default()
        }
    }

    /// Prefills the form from a stored prescription (edit screen).
    pub fn from_prescription(p: &Prescription) -> Self {
        PrescriptionForm {
            client_id: Some(p.client_id),
            doctor_name: p.doctor_name.clone(),
            crm: p.crm.clone(),
            issued_on: Some(p.issued_on),
            valid_until: p.valid_until,
            lens_type: p.lens_type,
            right_eye: EyeForm::from_measurement(&p.right_eye),
            left_eye: EyeForm::from_measurement(&p.left_eye),
            notes: p.notes.clone().unwrap_or_default(),
        }
    }

    /// Validates every field and returns all failures at once.
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.client_id.is_none() {
            errors.insert(
                "clientId",
                ValidationError::Required {
                    field: "Client".to_string(),
                },
            );
        }
        errors.check("doctorName", validate_doctor_name(&self.doctor_name));
        errors.check("crm", validate_crm(&self.crm));
        errors.check("notes", validate_notes(&self.notes));

        match self.issued_on {
            Some(issued_on) => {
                errors.check("issuedOn", validate_issue_date(issued_on, today));
                if let Some(until) = self.valid_until {
                    errors.check("validUntil", validate_valid_until(issued_on, until));
                }
            }
            None => errors.insert(
                "issuedOn",
                ValidationError::Required {
                    field: "Issue date".to_string(),
                },
            ),
        }

        errors.merge_prefixed("rightEye", self.right_eye.validate(self.lens_type));
        errors.merge_prefixed("leftEye", self.left_eye.validate(self.lens_type));

        errors.into_result()
    }

    /// Validates the form and builds the API request.
    pub fn into_request(self, today: NaiveDate) -> CoreResult<PrescriptionRequest> {
        self.validate(today)?;

        // Both are guaranteed by validate().
        let (Some(client_id), Some(issued_on)) = (self.client_id, self.issued_on) else {
            return Err(ValidationError::Required {
                field: "Client".to_string(),
            }
            .into());
        };

        let notes = self.notes.trim();
        Ok(PrescriptionRequest {
            client_id,
            doctor_name: self.doctor_name.trim().to_string(),
            crm: self.crm.trim().to_string(),
            issued_on,
            valid_until: self.valid_until,
            lens_type: self.lens_type,
            right_eye: self.right_eye.to_measurement(self.lens_type),
            left_eye: self.left_eye.to_measurement(self.lens_type),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Body of `POST /prescriptions` and `PUT /prescriptions/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRequest {
    pub client_id: EntityId,
    pub doctor_name: String,
    pub crm: String,
    pub issued_on: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub lens_type: LensType,
    pub right_eye: EyeMeasurement,
    pub left_eye: EyeMeasurement,
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
