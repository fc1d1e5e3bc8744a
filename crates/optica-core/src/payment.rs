//! # Payments & Installments
//!
//! Installment plans, balance summaries, and payment requests.
//!
//! ## Installment Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1000.00 in 3 installments, first due 2026-01-31                        │
//! │                                                                         │
//! │  #1  333.34  2026-01-31   ← leftover cent lands on the first one        │
//! │  #2  333.33  2026-02-28   ← clamped to month end                        │
//! │  #3  333.33  2026-03-31                                                 │
//! │      ──────                                                             │
//! │     1000.00   (always exact)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{EntityId, Installment, InstallmentStatus, Payment, PaymentMethod};
use crate::validation::validate_payment_amount;
use crate::MAX_INSTALLMENTS;

// =============================================================================
// Installment Status
// =============================================================================

impl Installment {
    /// Status as of `today`. A pending installment past its due date is
    /// overdue even when the API has not flagged it yet.
    pub fn effective_status(&self, today: NaiveDate) -> InstallmentStatus {
        match self.status {
            InstallmentStatus::Pending if self.due_date < today => InstallmentStatus::Overdue,
            status => status,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }
}

// =============================================================================
// Installment Plan
// =============================================================================

/// One planned installment, before the API assigns ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedInstallment {
    pub number: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
}

/// A financed amount split into monthly installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub total: Money,
    pub installments: Vec<PlannedInstallment>,
}

impl InstallmentPlan {
    /// Splits `amount` into `count` monthly installments.
    ///
    /// ## Rules
    /// - `count` between 1 and 24
    /// - `amount` positive
    /// - Shares differ by at most one cent; the remainder goes first
    /// - Installment *n* is due `n − 1` months after `first_due`, clamped to
    ///   the last day of the month
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use optica_core::payment::InstallmentPlan;
    /// use optica_core::Money;
    ///
    /// let first = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    /// let plan = InstallmentPlan::build(Money::from_cents(100_000), 3, first).unwrap();
    /// assert_eq!(plan.installments[0].amount.cents(), 33_334);
    /// assert_eq!(plan.installments[1].due_date, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    /// ```
    pub fn build(amount: Money, count: u32, first_due: NaiveDate) -> CoreResult<Self> {
        if count == 0 || count > MAX_INSTALLMENTS {
            return Err(CoreError::InvalidInstallmentCount {
                requested: count,
                max: MAX_INSTALLMENTS,
            });
        }
        if !amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "amount to finance must be positive".to_string(),
            });
        }

        let installments = amount
            .split(count)
            .into_iter()
            .zip(0u32..)
            .map(|(share, offset)| {
                let due_date = first_due.checked_add_months(Months::new(offset)).ok_or_else(|| {
                    CoreError::InvalidInstallmentCount {
                        requested: count,
                        max: MAX_INSTALLMENTS,
                    }
                })?;
                Ok(PlannedInstallment {
                    number: offset + 1,
                    amount: share,
                    due_date,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(InstallmentPlan {
            total: amount,
            installments,
        })
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }
}

// =============================================================================
// Balance Summary
// =============================================================================

/// How much of a sale has been paid, and how much is already covered by
/// registered payments.
///
/// ```text
/// total 1000.00 ── financed 1000.00 in 3 (one paid)
///   paid        333.34    remaining    666.66   ◄── what the client still owes
///   committed  1000.00    uncommitted    0.00   ◄── room for new payments
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total: Money,
    pub paid: Money,
    pub remaining: Money,
    pub committed: Money,
    pub uncommitted: Money,
    pub is_settled: bool,
}

impl PaymentSummary {
    /// Sums the payments made against a sale.
    ///
    /// For `paid`, a payment without installments counts in full and a
    /// financed payment counts only its installments marked paid. For
    /// `committed`, every payment counts in full.
    pub fn for_sale(total: Money, payments: &[Payment]) -> Self {
        let paid: Money = payments.iter().map(paid_amount).sum();
        let committed: Money = payments.iter().map(|p| p.amount).sum();
        let remaining = (total - paid).non_negative();
        PaymentSummary {
            total,
            paid,
            remaining,
            committed,
            uncommitted: (total - committed).non_negative(),
            is_settled: remaining.is_zero(),
        }
    }
}

fn paid_amount(payment: &Payment) -> Money {
    if payment.installments.is_empty() {
        payment.amount
    } else {
        payment
            .installments
            .iter()
            .filter(|i| i.is_paid())
            .map(|i| i.amount)
            .sum()
    }
}

/// Unpaid installments of a set of payments that are overdue as of `today`,
/// oldest first.
pub fn overdue_installments(payments: &[Payment], today: NaiveDate) -> Vec<&Installment> {
    let mut overdue: Vec<&Installment> = payments
        .iter()
        .flat_map(|p| p.installments.iter())
        .filter(|i| i.effective_status(today) == InstallmentStatus::Overdue)
        .collect();
    overdue.sort_by_key(|i| i.due_date);
    overdue
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub sale_id: EntityId,
    pub method: PaymentMethod,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub installments: Vec<PlannedInstallment>,
}

impl PaymentRequest {
    /// A single payment against the part of the sale no payment covers yet
    /// ([`PaymentSummary::uncommitted`]).
    ///
    /// ## Errors
    /// `InvalidPaymentAmount` when the amount is not positive or exceeds
    /// `available`.
    pub fn single(sale_id: EntityId, method: PaymentMethod, amount: Money, available: Money) -> CoreResult<Self> {
        check_amount(amount, available)?;
        Ok(PaymentRequest {
            sale_id,
            method,
            amount,
            installments: Vec::new(),
        })
    }

    /// A financed payment following an installment plan.
    ///
    /// A one-installment plan is allowed for any method; longer plans need
    /// a method that can be financed.
    pub fn financed(
        sale_id: EntityId,
        method: PaymentMethod,
        plan: InstallmentPlan,
        available: Money,
    ) -> CoreResult<Self> {
        check_amount(plan.total, available)?;
        if plan.len() > 1 && !method.allows_installments() {
            return Err(CoreError::InvalidPaymentAmount {
                reason: format!("{method} cannot be split into installments"),
            });
        }
        Ok(PaymentRequest {
            sale_id,
            method,
            amount: plan.total,
            installments: plan.installments,
        })
    }
}

fn check_amount(amount: Money, available: Money) -> CoreResult<()> {
    validate_payment_amount(amount, available).map_err(|e| CoreError::InvalidPaymentAmount {
        reason: e.to_string(),
    })
}

/// Body of the pay-installment call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayInstallmentRequest {
    pub paid_at: NaiveDate,
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

    fn installment(number: u32, cents: i64, due: NaiveDate, status: InstallmentStatus) -> Installment {
        Installment {
            id: Some(number as i64),
            number,
            amount: Money::from_cents(cents),
            due_date: due,
            paid_at: None,
            status,
        }
    }

    fn payment(cents: i64, installments: Vec<Installment>) -> Payment {
        Payment {
            id: 1,
            sale_id: 9,
            method: PaymentMethod::CreditCard,
            amount: Money::from_cents(cents),
            installments,
            created_at: None,
        }
    }

    #[test]
    fn test_plan_sums_exactly() {
        let plan = InstallmentPlan::build(Money::from_cents(100_001), 12, date(2026, 1, 15)).unwrap();
        assert_eq!(plan.len(), 12);
        let sum: Money = plan.installments.iter().map(|i| i.amount).sum();
        assert_eq!(sum, Money::from_cents(100_001));
        assert_eq!(plan.installments[0].amount.cents(), 8_333 + 5);
        assert_eq!(plan.installments[11].number, 12);
        assert_eq!(plan.installments[11].due_date, date(2026, 12, 15));
    }

    #[test]
    fn test_plan_due_dates_clamp_to_month_end() {
        let plan = InstallmentPlan::build(Money::from_cents(400), 4, date(2026, 1, 31)).unwrap();
        let dates: Vec<NaiveDate> = plan.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(
            dates,
            vec![date(2026, 1, 31), date(2026, 2, 28), date(2026, 3, 31), date(2026, 4, 30)]
        );
    }

    #[test]
    fn test_plan_rejects_bad_input() {
        let first = date(2026, 1, 1);
        assert!(InstallmentPlan::build(Money::from_cents(100), 0, first).is_err());
        assert!(InstallmentPlan::build(Money::from_cents(100), 25, first).is_err());
        assert!(InstallmentPlan::build(Money::zero(), 2, first).is_err());
    }

    #[test]
    fn test_effective_status() {
        let today = date(2026, 10, 19);
        let due_yesterday = installment(1, 100, date(2026, 10, 18), InstallmentStatus::Pending);
        let due_today = installment(2, 100, today, InstallmentStatus::Pending);
        let paid_late = installment(3, 100, date(2026, 1, 1), InstallmentStatus::Paid);

        assert_eq!(due_yesterday.effective_status(today), InstallmentStatus::Overdue);
        assert_eq!(due_today.effective_status(today), InstallmentStatus::Pending);
        assert_eq!(paid_late.effective_status(today), InstallmentStatus::Paid);
    }

    #[test]
    fn test_summary() {
        let financed = payment(
            30_000,
            vec![
                installment(1, 10_000, date(2026, 8, 1), InstallmentStatus::Paid),
                installment(2, 10_000, date(2026, 9, 1), InstallmentStatus::Pending),
                installment(3, 10_000, date(2026, 10, 1), InstallmentStatus::Pending),
            ],
        );
        let cash = payment(5_000, vec![]);

        let summary = PaymentSummary::for_sale(Money::from_cents(40_000), &[financed.clone(), cash]);
        assert_eq!(summary.paid.cents(), 15_000);
        assert_eq!(summary.remaining.cents(), 25_000);
        assert_eq!(summary.committed.cents(), 35_000);
        assert_eq!(summary.uncommitted.cents(), 5_000);
        assert!(!summary.is_settled);

        let overdue = overdue_installments(std::slice::from_ref(&financed), date(2026, 10, 19));
        assert_eq!(overdue.len(), 2);
        assert_eq!(overdue[0].number, 2);

        let summary = PaymentSummary::for_sale(Money::from_cents(4_000), &[payment(5_000, vec![])]);
        assert_eq!(summary.remaining, Money::zero());
        assert!(summary.is_settled);
    }

    #[test]
    fn test_payment_requests() {
        let remaining = Money::from_cents(50_000);
        assert!(PaymentRequest::single(9, PaymentMethod::Pix, Money::from_cents(50_000), remaining).is_ok());
        assert!(PaymentRequest::single(9, PaymentMethod::Pix, Money::from_cents(50_001), remaining).is_err());
        assert!(PaymentRequest::single(9, PaymentMethod::Cash, Money::zero(), remaining).is_err());

        let plan = InstallmentPlan::build(remaining, 5, date(2026, 11, 10)).unwrap();
        let req = PaymentRequest::financed(9, PaymentMethod::CreditCard, plan.clone(), remaining).unwrap();
        assert_eq!(req.installments.len(), 5);

        let err = PaymentRequest::financed(9, PaymentMethod::Cash, plan, remaining).unwrap_err();
        assert_eq!(err.to_string(), "Invalid payment amount: cash cannot be split into installments");
    }

    #[test]
    fn test_financed_sale_cannot_be_financed_again() {
        let first = date(2026, 11, 10);
        let plan = InstallmentPlan::build(Money::from_cents(100_000), 3, first).unwrap();
        let installments = plan
            .installments
            .iter()
            .map(|i| installment(i.number, i.amount.cents(), i.due_date, InstallmentStatus::Pending))
            .collect();
        let financed = payment(100_000, installments);

        let summary = PaymentSummary::for_sale(Money::from_cents(100_000), &[financed]);
        assert_eq!(summary.remaining.cents(), 100_000);
        assert_eq!(summary.committed.cents(), 100_000);
        assert_eq!(summary.uncommitted, Money::zero());
        assert!(!summary.is_settled);

        let again = InstallmentPlan::build(Money::from_cents(100_000), 3, first).unwrap();
        let err = PaymentRequest::financed(9, PaymentMethod::CreditCard, again, summary.uncommitted).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPaymentAmount { .. }));
        assert!(PaymentRequest::single(9, PaymentMethod::Pix, Money::from_cents(1), summary.uncommitted).is_err());
    }

    #[test]
    fn test_request_wire_shape() {
        let req = PaymentRequest::single(9, PaymentMethod::DebitCard, Money::from_cents(1990), Money::from_cents(1990)).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"saleId": 9, "method": "DEBIT_CARD", "amount": 19.9}));
    }
}
