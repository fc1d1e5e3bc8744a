//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A frame at 349.90 × 3 must total exactly 1049.70.                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    34990 cents × 3 = 104970 cents, always                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The store API speaks decimal numbers (`"salePrice": 349.9`). `Money`
//! serializes as a JSON number of major units and accepts either a number
//! or a numeric string when deserializing, rounding to the nearest cent.
//! Amounts that do not fit in `i64` cents are rejected.
//!
//! ## Arithmetic
//! Never leaves integer cents. `+`, `-`, `*` and `sum()` saturate at the
//! `i64` bounds, so an absurd draft line yields an absurd total instead of
//! a panic; validation rejects it later.
//!
//! ## Usage
//! ```rust
//! use optica_core::money::Money;
//!
//! let price = Money::from_cents(34990);
//! let line = price * 3;
//! assert_eq!(line.cents(), 104970);
//! assert_eq!(Money::parse("349,90"), Some(price));
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::measure::parse_hundredths;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction can go negative before clamping
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Product.sale_price ──► ProductLine.line_total ──► SaleTotals.subtotal
///                                                        │
///                        SaleDraft.discount ─────────────┤
///                                                        ▼
///                                                  SaleTotals.total
///                                                        │
///                                                        ▼
///                                        InstallmentPlan / Payment.amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use optica_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        let major = major.saturating_mul(100);
        if major < 0 {
            Money(major.saturating_sub(minor))
        } else {
            Money(major.saturating_add(minor))
        }
    }

    /// Parses an amount typed into a form field.
    ///
    /// Accepts `.` or `,` as the decimal separator and at most two fraction
    /// digits. Blank or malformed input yields `None`.
    ///
    /// ## Example
    /// ```rust
    /// use optica_core::money::Money;
    ///
    /// assert_eq!(Money::parse("10.5"), Some(Money::from_cents(1050)));
    /// assert_eq!(Money::parse(" 10,50 "), Some(Money::from_cents(1050)));
    /// assert_eq!(Money::parse(""), None);
    /// assert_eq!(Money::parse("ten"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Money> {
        parse_hundredths(raw).ok().flatten().map(Money)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative amounts to zero.
    ///
    /// ## Example
    /// ```rust
    /// use optica_core::money::Money;
    ///
    /// let owed = Money::from_cents(5000) - Money::from_cents(8000);
    /// assert_eq!(owed.non_negative(), Money::zero());
    /// ```
    #[inline]
    pub const fn non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a line quantity, saturating.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Splits the amount into `parts` shares whose sum is exactly `self`.
    ///
    /// Every share gets `self / parts` cents; the leftover cents go to the
    /// first share so no cent is lost.
    ///
    /// ## Example
    /// ```rust
    /// use optica_core::money::Money;
    ///
    /// let shares = Money::from_cents(1000).split(3);
    /// assert_eq!(shares, vec![
    ///     Money::from_cents(334),
    ///     Money::from_cents(333),
    ///     Money::from_cents(333),
    /// ]);
    /// ```
    ///
    /// ## Panics
    /// Never: `parts == 0` returns an empty vector.
    pub fn split(&self, parts: u32) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let parts_i = parts as i64;
        let base = self.0 / parts_i;
        let remainder = self.0 - base * parts_i;

        let mut shares = vec![Money(base); parts as usize];
        shares[0] = Money(base + remainder);
        shares
    }

    /// Major units as a float, for the wire only.
    fn to_wire(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `None` for values that are not finite or do not fit in `i64` cents.
    fn from_wire(value: f64) -> Option<Money> {
        let cents = (value * 100.0).round();
        // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
        (cents >= i64::MIN as f64 && cents < i64::MAX as f64).then_some(Money(cents as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering ("-5.50"). Currency symbols are a presentation
/// concern of the front end.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_wire())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a number or numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        Money::from_wire(v).ok_or_else(|| E::custom("amount too large"))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom("amount too large"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .ok_or_else(|| E::custom("amount too large"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).ok_or_else(|| E::custom(format!("invalid amount '{v}'")))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
