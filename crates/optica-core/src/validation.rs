//! # Validation Module
//!
//! Client-side field validators for Optica Admin.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (advisory, in the admin client)                  │
//! │  ├── One pure function per form field                                  │
//! │  ├── Ok(()) or a ValidationError whose Display is the helper text      │
//! │  └── Blocks submission, recoverable by the operator                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store REST API (authoritative)                               │
//! │  ├── Persistence rules, uniqueness, permissions                        │
//! │  └── Rejections come back as { message } envelopes                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators take the raw text of the field (what the operator typed)
//! whenever the field is numeric, so "not a number" is reported by the same
//! function that checks the range.
//!
//! ## Usage
//! ```rust
//! use optica_core::validation::{validate_axis, validate_addition};
//! use optica_core::LensType;
//!
//! assert!(validate_axis("", "-1.00").is_err());
//! assert!(validate_axis("", "0.00").is_ok());
//! assert!(validate_addition("", LensType::Monofocal).is_ok());
//! assert!(validate_addition("", LensType::Bifocal).is_err());
//! ```

use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::measure::{Diopters, Millimeters, ParseMeasureError};
use crate::money::Money;
use crate::types::LensType;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Prescription Ranges
// =============================================================================

/// Spherical power range, in hundredths of a diopter.
pub const SPHERICAL_RANGE: (i32, i32) = (-2000, 2000);
/// Cylindrical power range. Cylinder is written in minus form.
pub const CYLINDRICAL_RANGE: (i32, i32) = (-1000, 0);
/// Near addition range.
pub const ADDITION_RANGE: (i32, i32) = (75, 400);
/// Naso-pupillary distance, in hundredths of a millimeter.
pub const DNP_RANGE: (i32, i32) = (2500, 4000);
/// Optical center height, in hundredths of a millimeter.
pub const OPTICAL_CENTER_RANGE: (i32, i32) = (1400, 4000);
/// Axis range, in degrees.
pub const AXIS_RANGE: (u16, u16) = (0, 180);

/// CRM registration numbers have between 4 and 6 digits.
pub const CRM_DIGITS: (usize, usize) = (4, 6);

fn diopter_label(v: i32) -> String {
    Diopters::from_hundredths(v).to_string().trim_start_matches('+').to_string()
}

fn mm_label(v: i32) -> String {
    (v / 100).to_string()
}

fn not_a_number(field: &str, err: ParseMeasureError) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: err.reason().to_string(),
    }
}

/// Shared range/step check for dioptric fields.
fn check_diopters(field: &str, raw: &str, range: (i32, i32)) -> ValidationResult<Option<Diopters>> {
    let Some(value) = Diopters::parse(raw).map_err(|e| not_a_number(field, e))? else {
        return Ok(None);
    };
    if value.hundredths() < range.0 || value.hundredths() > range.1 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: diopter_label(range.0),
            max: diopter_label(range.1),
        });
    }
    if !value.is_quarter_step() {
        return Err(ValidationError::InvalidStep {
            field: field.to_string(),
            step: "0.25".to_string(),
        });
    }
    Ok(Some(value))
}

fn check_millimeters(field: &str, raw: &str, range: (i32, i32)) -> ValidationResult<Option<Millimeters>> {
    let Some(value) = Millimeters::parse(raw).map_err(|e| not_a_number(field, e))? else {
        return Ok(None);
    };
    if value.hundredths() < range.0 || value.hundredths() > range.1 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: mm_label(range.0),
            max: mm_label(range.1),
        });
    }
    Ok(Some(value))
}

// =============================================================================
// Prescription Validators
// =============================================================================

/// Validates a spherical power. Blank is allowed (plano).
///
/// ## Rules
/// - Number between -20.00 and +20.00
/// - Multiple of 0.25
pub fn validate_spherical(raw: &str) -> ValidationResult<()> {
    check_diopters("Spherical", raw, SPHERICAL_RANGE).map(|_| ())
}

/// Validates a cylindrical power. Blank is allowed (no astigmatism).
///
/// ## Rules
/// - Number between -10.00 and 0.00 (minus-cylinder notation)
/// - Multiple of 0.25
///
/// ## Example
/// ```rust
/// use optica_core::validation::validate_cylindrical;
///
/// assert!(validate_cylindrical("-1.75").is_ok());
/// assert!(validate_cylindrical("0.50").is_err());
/// assert!(validate_cylindrical("-10.25").is_err());
/// ```
pub fn validate_cylindrical(raw: &str) -> ValidationResult<()> {
    check_diopters("Cylindrical", raw, CYLINDRICAL_RANGE).map(|_| ())
}

/// Validates the cylinder axis against the cylinder it orients.
///
/// ## Rules
/// - Required when the cylindrical power is non-zero
/// - When present: whole degrees between 0 and 180
///
/// An unreadable cylinder counts as zero here; `validate_cylindrical`
/// reports it on its own field.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cylindrical: -1.00    Axis: [    ]                                     │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_axis("", "-1.00") ← THIS FUNCTION                             │
/// │       │                                                                 │
/// │       ├── cylinder ≠ 0 and axis blank → "Axis is required"             │
/// │       ├── axis not a whole number   → "Axis has invalid format"        │
/// │       ├── axis > 180                → "Axis must be between 0 and 180" │
/// │       └── OK                                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_axis(axis: &str, cylindrical: &str) -> ValidationResult<()> {
    let cylinder_set = matches!(Diopters::parse(cylindrical), Ok(Some(c)) if !c.is_zero());
    let axis = axis.trim();

    if axis.is_empty() {
        if cylinder_set {
            return Err(ValidationError::Required {
                field: "Axis".to_string(),
            });
        }
        return Ok(());
    }

    let degrees: u16 = axis.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "Axis".to_string(),
        reason: "must be a whole number of degrees".to_string(),
    })?;

    if degrees < AXIS_RANGE.0 || degrees > AXIS_RANGE.1 {
        return Err(ValidationError::OutOfRange {
            field: "Axis".to_string(),
            min: AXIS_RANGE.0.to_string(),
            max: AXIS_RANGE.1.to_string(),
        });
    }
    Ok(())
}

/// Validates the near addition for the selected lens type.
///
/// ## Rules
/// - Required for bifocal and multifocal lenses
/// - When present: between +0.75 and +4.00, in 0.25 steps
pub fn validate_addition(value: &str, lens_type: LensType) -> ValidationResult<()> {
    if value.trim().is_empty() {
        if lens_type.requires_addition() {
            return Err(ValidationError::Required {
                field: "Addition".to_string(),
            });
        }
        return Ok(());
    }
    check_diopters("Addition", value, ADDITION_RANGE).map(|_| ())
}

/// Validates the naso-pupillary distance. Blank is allowed.
///
/// ## Rules
/// - Between 25 and 40 mm
pub fn validate_dnp(raw: &str) -> ValidationResult<()> {
    check_millimeters("DNP", raw, DNP_RANGE).map(|_| ())
}

/// Validates the optical center height. Blank is allowed.
///
/// ## Rules
/// - Between 14 and 40 mm
pub fn validate_optical_center(raw: &str) -> ValidationResult<()> {
    check_millimeters("Optical center", raw, OPTICAL_CENTER_RANGE).map(|_| ())
}

/// Validates a doctor's CRM registration number.
///
/// ## Rules
/// - Required
/// - Digits only, 4 to 6 of them (surrounding whitespace ignored)
///
/// ## Example
/// ```rust
/// use optica_core::validation::validate_crm;
///
/// assert!(validate_crm("123456").is_ok());
/// assert!(validate_crm("123").is_err());
/// assert!(validate_crm("12a45").is_err());
/// ```
pub fn validate_crm(crm: &str) -> ValidationResult<()> {
    let crm = crm.trim();
    if crm.is_empty() {
        return Err(ValidationError::Required {
            field: "CRM".to_string(),
        });
    }
    if !crm.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "CRM".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }
    let (min, max) = CRM_DIGITS;
    if crm.len() < min || crm.len() > max {
        return Err(ValidationError::OutOfRange {
            field: "CRM".to_string(),
            min: format!("{min} digits"),
            max: format!("{max} digits"),
        });
    }
    Ok(())
}

/// Validates the prescribing doctor's name.
///
/// ## Rules
/// - Required, 3 to 100 characters
/// - Letters (accented included), spaces, periods, apostrophes, hyphens
pub fn validate_doctor_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "Doctor name".to_string(),
        });
    }
    if name.chars().count() < 3 {
        return Err(ValidationError::TooShort {
            field: "Doctor name".to_string(),
            min: 3,
        });
    }
    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "Doctor name".to_string(),
            max: 100,
        });
    }
    if !name
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '.' || c == '\'' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "Doctor name".to_string(),
            reason: "must contain only letters, spaces, periods, apostrophes and hyphens".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates a prescription issue date.
///
/// ## Rules
/// - Not after `today`
pub fn validate_issue_date(issued_on: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if issued_on > today {
        return Err(ValidationError::FutureDate {
            field: "Issue date".to_string(),
        });
    }
    Ok(())
}

/// Validates a prescription expiry date against its issue date.
pub fn validate_valid_until(issued_on: NaiveDate, valid_until: NaiveDate) -> ValidationResult<()> {
    if valid_until <= issued_on {
        return Err(ValidationError::NotAfter {
            field: "Valid until".to_string(),
            other: "the issue date".to_string(),
        });
    }
    Ok(())
}

/// Validates a client's birth date.
///
/// ## Rules
/// - Not in the future
/// - Not before 1900
pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if birth_date > today {
        return Err(ValidationError::FutureDate {
            field: "Birth date".to_string(),
        });
    }
    if birth_date.year() < 1900 {
        return Err(ValidationError::OutOfRange {
            field: "Birth date".to_string(),
            min: "1900".to_string(),
            max: today.year().to_string(),
        });
    }
    Ok(())
}

/// Validates a from/to filter.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::NotAfter {
            field: "End date".to_string(),
            other: "the start date".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Client Validators
// =============================================================================

/// Validates a client name (3 to 120 characters).
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "Name".to_string(),
        });
    }
    let len = name.chars().count();
    if len < 3 {
        return Err(ValidationError::TooShort {
            field: "Name".to_string(),
            min: 3,
        });
    }
    if len > 120 {
        return Err(ValidationError::TooLong {
            field: "Name".to_string(),
            max: 120,
        });
    }
    Ok(())
}

/// Validates a CPF (Brazilian taxpayer id), formatted or not.
///
/// ## Rules
/// - 11 digits once `.` `-` and spaces are removed
/// - Not all digits equal
/// - Both check digits match
///
/// ## Example
/// ```rust
/// use optica_core::validation::validate_cpf;
///
/// assert!(validate_cpf("529.982.247-25").is_ok());
/// assert!(validate_cpf("529.982.247-26").is_err());
/// assert!(validate_cpf("111.111.111-11").is_err());
/// ```
pub fn validate_cpf(cpf: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "CPF".to_string(),
        reason: reason.to_string(),
    };

    let digits: Vec<u32> = cpf
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .map(|c| c.to_digit(10).ok_or_else(|| invalid("must contain only digits")))
        .collect::<Result<_, _>>()?;

    if digits.is_empty() {
        return Err(ValidationError::Required {
            field: "CPF".to_string(),
        });
    }
    if digits.len() != 11 {
        return Err(invalid("must have 11 digits"));
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return Err(invalid("check digits do not match"));
    }

    let check_digit = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 {
            0
        } else {
            rest
        }
    };

    if check_digit(9) != digits[9] || check_digit(10) != digits[10] {
        return Err(invalid("check digits do not match"));
    }
    Ok(())
}

/// Validates an e-mail address (basic `local@domain.tld` shape).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    let invalid = || ValidationError::InvalidFormat {
        field: "E-mail".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.starts_with('.')
        || domain.ends_with('.')
        || !domain.contains('.')
        || email.chars().any(char::is_whitespace)
        || domain.contains('@')
    {
        return Err(invalid());
    }
    Ok(())
}

/// Validates a phone number: 10 or 11 digits once punctuation is removed.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    let others = phone
        .chars()
        .filter(|c| !c.is_ascii_digit() && !matches!(c, ' ' | '(' | ')' | '-' | '+'))
        .count();
    if others > 0 || !(10..=11).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "Phone".to_string(),
            reason: "must have 10 or 11 digits including area code".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Product & Sale Validators
// =============================================================================

/// Validates a product name (1 to 200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "Name".to_string(),
        });
    }
    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "Name".to_string(),
            max: 200,
        });
    }
    Ok(())
}

/// Validates a price. Zero is allowed (courtesy items).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "Price".to_string(),
            min: "0.00".to_string(),
            max: "any amount".to_string(),
        });
    }
    Ok(())
}

/// Validates one frame detail field (material, color or reference).
pub fn validate_frame_detail(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 50,
        });
    }
    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - At least 1
/// - At most MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "Quantity".to_string(),
        });
    }
    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "Quantity".to_string(),
            min: "1".to_string(),
            max: MAX_ITEM_QUANTITY.to_string(),
        });
    }
    Ok(())
}

/// Validates a sale discount. It may exceed the subtotal (the total then
/// clamps to zero) but cannot be negative.
pub fn validate_discount(discount: Money) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "Discount".to_string(),
            min: "0.00".to_string(),
            max: "the subtotal".to_string(),
        });
    }
    Ok(())
}

/// Validates free-text notes (at most 500 characters).
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.trim().chars().count() > 500 {
        return Err(ValidationError::TooLong {
            field: "Notes".to_string(),
            max: 500,
        });
    }
    Ok(())
}

/// Validates the protocol page. Blank is allowed.
pub fn validate_protocol_page(raw: &str) -> ValidationResult<()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(());
    }
    match raw.parse::<i32>() {
        Ok(page) if page > 0 => Ok(()),
        Ok(_) => Err(ValidationError::MustBePositive {
            field: "Page".to_string(),
        }),
        Err(_) => Err(ValidationError::InvalidFormat {
            field: "Page".to_string(),
            reason: "must be a whole number".to_string(),
        }),
    }
}

/// Validates the protocol service-order id. Blank is allowed.
pub fn validate_service_order(raw: &str) -> ValidationResult<()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(());
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "Service order".to_string(),
            reason: "must be a positive number".to_string(),
        }),
    }
}

/// Validates a payment amount against what is still owed.
pub fn validate_payment_amount(amount: Money, remaining: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "Payment amount".to_string(),
        });
    }
    if amount > remaining {
        return Err(ValidationError::OutOfRange {
            field: "Payment amount".to_string(),
            min: "0.01".to_string(),
            max: remaining.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_axis() {
        assert!(validate_axis("", "-1.00").is_err());
        assert!(validate_axis("", "0.00").is_ok());
        assert!(validate_axis("90", "-1.00").is_ok());
        assert!(validate_axis("", "").is_ok());
        assert!(validate_axis("0", "-0.25").is_ok());
        assert!(validate_axis("180", "-0.25").is_ok());
        assert!(validate_axis("181", "-0.25").is_err());
        assert!(validate_axis("45.5", "-0.25").is_err());
        // Bad cylinder is reported on its own field.
        assert!(validate_axis("", "abc").is_ok());

        let err = validate_axis(" ", "-2.25").unwrap_err();
        assert_eq!(err.to_string(), "Axis is required");
    }

    #[test]
    fn test_validate_addition() {
        assert!(validate_addition("", LensType::Monofocal).is_ok());
        assert!(validate_addition("", LensType::Bifocal).is_err());
        assert!(validate_addition("", LensType::Multifocal).is_err());
        assert!(validate_addition("+2.00", LensType::Multifocal).is_ok());
        assert!(validate_addition("0.50", LensType::Bifocal).is_err());
        assert!(validate_addition("2.10", LensType::Bifocal).is_err());
    }

    #[test]
    fn test_validate_cylindrical() {
        assert!(validate_cylindrical("").is_ok());
        assert!(validate_cylindrical("0").is_ok());
        assert!(validate_cylindrical("-10.00").is_ok());
        assert!(validate_cylindrical("-10.25").is_err());
        assert!(validate_cylindrical("+0.25").is_err());
        assert!(validate_cylindrical("-1.30").is_err());
        assert!(validate_cylindrical("x").is_err());

        let err = validate_cylindrical("1").unwrap_err();
        assert_eq!(err.to_string(), "Cylindrical must be between -10.00 and 0.00");
    }

    #[test]
    fn test_validate_spherical() {
        assert!(validate_spherical("+4.75").is_ok());
        assert!(validate_spherical("-20").is_ok());
        assert!(validate_spherical("-20.25").is_err());
    }

    #[test]
    fn test_validate_dnp_and_optical_center() {
        assert!(validate_dnp("25").is_ok());
        assert!(validate_dnp("31,5").is_ok());
        assert!(validate_dnp("40").is_ok());
        assert!(validate_dnp("24.9").is_err());
        assert!(validate_dnp("41").is_err());
        assert_eq!(
            validate_dnp("50").unwrap_err().to_string(),
            "DNP must be between 25 and 40"
        );

        assert!(validate_optical_center("14").is_ok());
        assert!(validate_optical_center("13.99").is_err());
        assert!(validate_optical_center("").is_ok());
    }

    #[test]
    fn test_validate_crm_and_doctor_name() {
        assert!(validate_crm("1234").is_ok());
        assert!(validate_crm(" 123456 ").is_ok());
        assert!(validate_crm("1234567").is_err());
        assert!(validate_crm("").is_err());
        assert!(validate_crm("12-34").is_err());

        assert!(validate_doctor_name("Dra. Maria José D'Ávila").is_ok());
        assert!(validate_doctor_name("Dr").is_err());
        assert!(validate_doctor_name("Dr. Smith 2nd").is_err());
        assert!(validate_doctor_name("").is_err());
    }

    #[test]
    fn test_date_validators() {
        let today = date(2026, 10, 19);
        assert!(validate_issue_date(today, today).is_ok());
        assert!(validate_issue_date(date(2026, 10, 20), today).is_err());

        assert!(validate_valid_until(today, date(2027, 10, 19)).is_ok());
        assert!(validate_valid_until(today, today).is_err());

        assert!(validate_birth_date(date(1980, 1, 1), today).is_ok());
        assert!(validate_birth_date(date(1899, 12, 31), today).is_err());
        assert!(validate_birth_date(date(2030, 1, 1), today).is_err());

        assert!(validate_date_range(date(2026, 1, 1), date(2026, 1, 1)).is_ok());
        assert!(validate_date_range(date(2026, 2, 1), date(2026, 1, 1)).is_err());
    }

    #[test]
    fn test_validate_cpf() {
        assert!(validate_cpf("52998224725").is_ok());
        assert!(validate_cpf("529.982.247-25").is_ok());
        assert!(validate_cpf("529.982.247-24").is_err());
        assert!(validate_cpf("000.000.000-00").is_err());
        assert!(validate_cpf("1234").is_err());
        assert!(validate_cpf("529.98a.247-25").is_err());
        assert!(validate_cpf("").is_err());
    }

    #[test]
    fn test_validate_contact_fields() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana example@x.com").is_err());

        assert!(validate_phone("(11) 98765-4321").is_ok());
        assert!(validate_phone("1133224455").is_ok());
        assert!(validate_phone("98765-4321").is_err());
        assert!(validate_phone("11 9876x4321").is_err());

        assert!(validate_client_name("Ana Souza").is_ok());
        assert!(validate_client_name("Al").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_money_fields() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
        assert!(validate_discount(Money::from_cents(50_000)).is_ok());
        assert!(validate_discount(Money::from_cents(-100)).is_err());

        let remaining = Money::from_cents(10_000);
        assert!(validate_payment_amount(Money::from_cents(10_000), remaining).is_ok());
        assert!(validate_payment_amount(Money::from_cents(10_001), remaining).is_err());
        assert!(validate_payment_amount(Money::zero(), remaining).is_err());
    }

    #[test]
    fn test_protocol_fields() {
        assert!(validate_protocol_page("").is_ok());
        assert!(validate_protocol_page("5").is_ok());
        assert!(validate_protocol_page("0").is_err());
        assert!(validate_protocol_page("five").is_err());
        assert!(validate_service_order("1024").is_ok());
        assert!(validate_service_order("OS-1").is_err());
    }

    #[test]
    fn test_frame_detail_and_notes_length() {
        assert!(validate_frame_detail("Color", "Tortoise").is_ok());
        assert!(validate_frame_detail("Color", &"x".repeat(51)).is_err());
        assert!(validate_notes(&"n".repeat(500)).is_ok());
        assert!(validate_notes(&"n".repeat(501)).is_err());
    }
}
