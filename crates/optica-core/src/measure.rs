//! # Optical Measurements
//!
//! Fixed-point types for lens prescriptions, in hundredths.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form field        Raw text     Parsed                                 │
//! │  ───────────────   ──────────   ──────────────────────────             │
//! │  Spherical         "-2,75"      Diopters(-275)                         │
//! │  Cylindrical       "-0.50"      Diopters(-50)                          │
//! │  Addition          "+2.00"      Diopters(200)                          │
//! │  DNP               "31.5"       Millimeters(3150)                      │
//! │  Optical center    "22"         Millimeters(2200)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Like `Money`, parsing never goes through floating point, so `"-0.25"`
//! is exactly a quarter step and step checks are integer remainders.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Why a numeric form value could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMeasureError {
    /// Not a number at all.
    NotANumber,
    /// More than two fraction digits.
    TooPrecise,
}

impl ParseMeasureError {
    pub fn reason(&self) -> &'static str {
        match self {
            ParseMeasureError::NotANumber => "must be a number",
            ParseMeasureError::TooPrecise => "must have at most two decimal places",
        }
    }
}

/// Parses a decimal form value into hundredths.
///
/// `Ok(None)` for blank input. Accepts an optional sign and `.` or `,` as
/// the decimal separator.
///
/// ## Example
/// ```rust
/// use optica_core::measure::parse_hundredths;
///
/// assert_eq!(parse_hundredths("-1.25"), Ok(Some(-125)));
/// assert_eq!(parse_hundredths("+2,5"), Ok(Some(250)));
/// assert_eq!(parse_hundredths(""), Ok(None));
/// assert!(parse_hundredths("1.255").is_err());
/// ```
pub fn parse_hundredths(raw: &str) -> Result<Option<i64>, ParseMeasureError> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }

    let (negative, digits) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (int_part, frac_part) = match digits.find(|c: char| c == '.' || c == ',') {
        Some(pos) => (&digits[..pos], &digits[pos + 1..]),
        None => (digits, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ParseMeasureError::NotANumber);
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
        || int_part.len() > 15
    {
        return Err(ParseMeasureError::NotANumber);
    }
    if frac_part.len() > 2 {
        return Err(ParseMeasureError::TooPrecise);
    }

    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| ParseMeasureError::NotANumber)?
    };
    let frac: i64 = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().map_err(|_| ParseMeasureError::NotANumber)? * 10,
        _ => frac_part.parse().map_err(|_| ParseMeasureError::NotANumber)?,
    };

    let value = whole * 100 + frac;
    Ok(Some(if negative { -value } else { value }))
}

/// Wire value (`-2.75`) to hundredths, `None` when it does not fit an `i32`.
fn hundredths_from_wire(value: f64) -> Option<i32> {
    let scaled = (value * 100.0).round();
    (scaled >= i32::MIN as f64 && scaled <= i32::MAX as f64).then_some(scaled as i32)
}

fn write_hundredths(f: &mut fmt::Formatter<'_>, value: i32, force_sign: bool) -> fmt::Result {
    let sign = if value < 0 {
        "-"
    } else if force_sign && value > 0 {
        "+"
    } else {
        ""
    };
    let abs = value.unsigned_abs();
    write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
}

// =============================================================================
// Diopters
// =============================================================================

/// Lens power in hundredths of a diopter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Diopters(i32);

impl Diopters {
    /// The quarter-diopter increment lenses are ground in.
    pub const STEP: i32 = 25;

    #[inline]
    pub const fn from_hundredths(value: i32) -> Self {
        Diopters(value)
    }

    #[inline]
    pub const fn hundredths(&self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when the power is a whole number of quarter steps.
    #[inline]
    pub const fn is_quarter_step(&self) -> bool {
        self.0 % Self::STEP == 0
    }

    /// Parses a form value ("-1.25", "+0,75"). Blank yields `Ok(None)`.
    pub fn parse(raw: &str) -> Result<Option<Self>, ParseMeasureError> {
        match parse_hundredths(raw)? {
            Some(v) => i32::try_from(v)
                .map(|v| Some(Diopters(v)))
                .map_err(|_| ParseMeasureError::NotANumber),
            None => Ok(None),
        }
    }
}

/// Signed rendering as printed on a prescription ("+1.25", "-0.50", "0.00").
impl fmt::Display for Diopters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hundredths(f, self.0, true)
    }
}

impl Serialize for Diopters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Diopters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        hundredths_from_wire(value)
            .map(Diopters)
            .ok_or_else(|| D::Error::custom(format!("measurement {value} is out of range")))
    }
}

// =============================================================================
// Millimeters
// =============================================================================

/// A distance in hundredths of a millimeter (DNP, optical center height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millimeters(i32);

impl Millimeters {
    #[inline]
    pub const fn from_hundredths(value: i32) -> Self {
        Millimeters(value)
    }

    #[inline]
    pub const fn from_mm(mm: i32) -> Self {
        Millimeters(mm * 100)
    }

    #[inline]
    pub const fn hundredths(&self) -> i32 {
        self.0
    }

    /// Parses a form value ("31.5"). Blank yields `Ok(None)`.
    pub fn parse(raw: &str) -> Result<Option<Self>, ParseMeasureError> {
        match parse_hundredths(raw)? {
            Some(v) => i32::try_from(v)
                .map(|v| Some(Millimeters(v)))
                .map_err(|_| ParseMeasureError::NotANumber),
            None => Ok(None),
        }
    }
}

impl fmt::Display for Millimeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hundredths(f, self.0, false)
    }
}

impl Serialize for Millimeters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Millimeters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        hundredths_from_wire(value)
            .map(Millimeters)
            .ok_or_else(|| D::Error::custom(format!("measurement {value} is out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hundredths() {
        assert_eq!(parse_hundredths("0"), Ok(Some(0)));
        assert_eq!(parse_hundredths("-0.25"), Ok(Some(-25)));
        assert_eq!(parse_hundredths("-.5"), Ok(Some(-50)));
        assert_eq!(parse_hundredths("12,3"), Ok(Some(1230)));
        assert_eq!(parse_hundredths("   "), Ok(None));
        assert_eq!(parse_hundredths("-"), Err(ParseMeasureError::NotANumber));
        assert_eq!(parse_hundredths("1.2.3"), Err(ParseMeasureError::NotANumber));
        assert_eq!(parse_hundredths("1e3"), Err(ParseMeasureError::NotANumber));
        assert_eq!(parse_hundredths("0.125"), Err(ParseMeasureError::TooPrecise));
    }

    #[test]
    fn test_diopter_display() {
        assert_eq!(Diopters::from_hundredths(125).to_string(), "+1.25");
        assert_eq!(Diopters::from_hundredths(-50).to_string(), "-0.50");
        assert_eq!(Diopters::from_hundredths(0).to_string(), "0.00");
    }

    #[test]
    fn test_quarter_steps() {
        assert!(Diopters::from_hundredths(-275).is_quarter_step());
        assert!(!Diopters::from_hundredths(-260).is_quarter_step());
    }

    #[test]
    fn test_millimeter_parse_and_wire() {
        let dnp = Millimeters::parse("31,5").unwrap().unwrap();
        assert_eq!(dnp, Millimeters::from_hundredths(3150));
        assert_eq!(dnp.to_string(), "31.50");
        assert_eq!(serde_json::to_string(&dnp).unwrap(), "31.5");

        let back: Millimeters = serde_json::from_str("31.5").unwrap();
        assert_eq!(back, dnp);
    }

    #[test]
    fn test_out_of_range_wire_values_are_rejected() {
        assert!(serde_json::from_str::<Diopters>("1e300").is_err());
        assert!(serde_json::from_str::<Diopters>("-30000000").is_err());
        assert!(serde_json::from_str::<Millimeters>("21474837").is_err());

        let max: Millimeters = serde_json::from_str("21474836.47").unwrap();
        assert_eq!(max.hundredths(), i32::MAX);
    }
}
