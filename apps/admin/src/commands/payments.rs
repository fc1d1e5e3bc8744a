//! # Payment Commands
//!
//! ```text
//! $ optica-admin payments plan 12 --count 3 --first-due 2026-11-10 --method bank-slip
//! #  AMOUNT       DUE
//! 1  R$ 333.34    2026-11-10
//! 2  R$ 333.33    2026-12-10
//! 3  R$ 333.33    2027-01-10
//! ```

use chrono::NaiveDate;
use optica_core::payment::{overdue_installments, InstallmentPlan, PaymentRequest, PaymentSummary};
use optica_core::{EntityId, Money, Payment, PaymentMethod};
use tracing::{debug, info};

use super::{or_dash, table, Outcome};
use crate::error::{AppError, AppResult, ErrorCode};
use crate::notify::Notice;
use crate::state::AppState;

/// Flags of `payments plan`.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub count: u32,
    pub first_due: NaiveDate,
    pub method: PaymentMethod,
    /// Defaults to the part of the sale no payment covers yet.
    pub amount: Option<Money>,
    pub submit: bool,
}

pub async fn list(state: &AppState, sale_id: EntityId) -> AppResult<Outcome> {
    state.require_login().await?;
    let sale = state.client.sales().get(sale_id).await?;
    let payments = state.client.payments().for_sale(sale_id).await?;
    let summary = PaymentSummary::for_sale(sale.total, &payments);
    let today = state.today();

    let overdue = overdue_installments(&payments, today).into_iter().map(|i| {
        Notice::warning(format!(
            "Installment #{} of {} was due {}",
            i.number,
            state.money(i.amount),
            i.due_date
        ))
    });
    Ok(Outcome::output(render_payments(state, &payments, &summary, today)).with_notices(overdue))
}

/// Builds an installment plan for the part of the sale not yet covered by a
/// payment and optionally registers it.
pub async fn plan(state: &AppState, sale_id: EntityId, options: PlanOptions) -> AppResult<Outcome> {
    state.require_login().await?;
    let sale = state.client.sales().get(sale_id).await?;
    let summary = state.client.payments().summary(&sale).await?;
    if summary.uncommitted.is_zero() {
        return Err(AppError::new(
            ErrorCode::PaymentError,
            format!("Sale {sale_id} is already covered by registered payments"),
        ));
    }
    let amount = options.amount.unwrap_or(summary.uncommitted);
    debug!(sale_id, amount = %amount, count = options.count, "payments plan command");

    let plan = InstallmentPlan::build(amount, options.count, options.first_due)?;
    let output = render_plan(state, &plan);
    let request = PaymentRequest::financed(sale.id, options.method, plan, summary.uncommitted)?;

    if !options.submit {
        return Ok(Outcome::output(output).with_notice(Notice::warning(
            "Plan not registered. Run again with --submit to register it.",
        )));
    }

    let payment = state.client.payments().create(&request).await?;
    info!(payment_id = payment.id, sale_id, "Payment registered");
    Ok(Outcome::output(output).with_notice(Notice::success(format!(
        "Payment {} registered ({} in {} installment{})",
        payment.id,
        state.money(payment.amount),
        request.installments.len(),
        if request.installments.len() == 1 { "" } else { "s" }
    ))))
}

pub async fn pay(state: &AppState, payment_id: EntityId, installment_id: EntityId) -> AppResult<Outcome> {
    state.require_login().await?;
    let payment = state.client.payments().pay_installment(payment_id, installment_id).await?;
    let number = payment
        .installments
        .iter()
        .find(|i| i.id == Some(installment_id))
        .map(|i| format!("#{}", i.number))
        .unwrap_or_else(|| installment_id.to_string());
    Ok(Outcome::notice(Notice::success(format!(
        "Installment {number} of payment {} marked as paid",
        payment.id
    ))))
}

// =============================================================================
// Rendering
// =============================================================================

pub fn render_plan(state: &AppState, plan: &InstallmentPlan) -> String {
    let mut rows = vec![["#", "AMOUNT", "DUE"].map(String::from).to_vec()];
    rows.extend(plan.installments.iter().map(|i| {
        vec![i.number.to_string(), state.money(i.amount), i.due_date.to_string()]
    }));
    rows.push(vec!["".into(), state.money(plan.total), "total".into()]);
    table(&rows)
}

pub fn render_payments(state: &AppState, payments: &[Payment], summary: &PaymentSummary, today: NaiveDate) -> String {
    let mut out = String::new();
    for payment in payments {
        out.push_str(&format!(
            "Payment #{} {} {}\n",
            payment.id,
            payment.method,
            state.money(payment.amount)
        ));
        if !payment.installments.is_empty() {
            let rows: Vec<Vec<String>> = payment
                .installments
                .iter()
                .map(|i| {
                    vec![
                        format!("  {}", i.number),
                        or_dash(i.id),
                        state.money(i.amount),
                        i.due_date.to_string(),
                        i.effective_status(today).to_string(),
                        or_dash(i.paid_at),
                    ]
                })
                .collect();
            out.push_str(&table(&rows));
        }
    }
    if payments.is_empty() {
        out.push_str("No payments yet\n");
    }
    out.push_str(&table(&[
        vec!["Total".into(), state.money(summary.total)],
        vec!["Paid".into(), state.money(summary.paid)],
        vec!["Committed".into(), state.money(summary.committed)],
        vec![
            "Remaining".into(),
            if summary.is_settled {
                "settled".to_string()
            } else {
                state.money(summary.remaining)
            },
        ],
    ]));
    out
}
