//! # Sale Commands
//!
//! Sales are edited as JSON drafts on disk:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales edit 12 -o draft.json  ──► SaleDraft (prices as charged)         │
//! │         │                                                               │
//! │         ▼  operator edits the file                                      │
//! │  sales totals draft.json      ──► subtotal / discount / total, offline  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  sales submit draft.json --id 12 ──► validate every step ──► PUT        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use optica_api::{Page, PageRequest};
use optica_core::payment::PaymentSummary;
use optica_core::{CoreError, EntityId, Sale, SaleDraft, SaleWizard, WizardMode};
use tracing::{debug, info};

use super::{or_dash, table, Outcome};
use crate::error::AppResult;
use crate::notify::Notice;
use crate::state::AppState;

pub async fn list(state: &AppState, page: &PageRequest) -> AppResult<Outcome> {
    state.require_login().await?;
    let sales = state.client.sales().list(page).await?;
    Ok(Outcome::output(render_list(state, &sales)))
}

pub async fn show(state: &AppState, id: EntityId) -> AppResult<Outcome> {
    state.require_login().await?;
    let sale = state.client.sales().get(id).await?;
    let summary = state.client.payments().summary(&sale).await?;
    Ok(Outcome::output(render_sale(state, &sale, &summary)))
}

/// Totals of a draft file, with the problems that would block submitting it.
pub fn totals(state: &AppState, draft: &SaleDraft) -> Outcome {
    let outcome = Outcome::output(render_totals(state, draft));
    match SaleWizard::from_draft(draft.clone(), WizardMode::Create).submit() {
        Ok(_) => outcome,
        Err(CoreError::Fields(errors)) => outcome
            .with_notice(Notice::warning(format!(
                "Draft is not ready to submit ({} field{})",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            )))
            .with_notices(Notice::for_fields(&errors)),
        Err(other) => outcome.with_notice(Notice::warning(other.to_string())),
    }
}

/// Writes a stored sale to `out` as an editable draft.
pub async fn edit(state: &AppState, id: EntityId, out: &Path) -> AppResult<Outcome> {
    state.require_login().await?;
    let wizard = state.client.sales().edit(id).await?;
    let json = serde_json::to_string_pretty(wizard.draft())?;
    std::fs::write(out, json)?;
    debug!(sale_id = id, path = %out.display(), "Draft written");
    Ok(Outcome::notice(Notice::success(format!(
        "Sale {id} written to {}",
        out.display()
    ))))
}

/// Creates a sale from a draft, or updates sale `id`.
pub async fn submit(state: &AppState, draft: SaleDraft, id: Option<EntityId>) -> AppResult<Outcome> {
    state.require_login().await?;
    let mode = id.map_or(WizardMode::Create, WizardMode::Edit);
    let wizard = SaleWizard::from_draft(draft, mode);
    let sale = state.client.sales().submit(&wizard).await?;
    info!(sale_id = sale.id, "Sale submitted");

    let verb = if id.is_some() { "updated" } else { "registered" };
    Ok(Outcome::output(render_totals(state, wizard.draft())).with_notice(Notice::success(format!(
        "Sale {} {verb} (total {})",
        sale.id,
        state.money(sale.total)
    ))))
}

pub async fn cancel(state: &AppState, id: EntityId) -> AppResult<Outcome> {
    state.require_login().await?;
    let sale = state.client.sales().cancel(id).await?;
    Ok(Outcome::notice(Notice::success(format!("Sale {} is now {}", sale.id, sale.status))))
}

// =============================================================================
// Rendering
// =============================================================================

pub fn render_totals(state: &AppState, draft: &SaleDraft) -> String {
    let totals = draft.totals();
    let mut rows: Vec<Vec<String>> = draft
        .products
        .iter()
        .map(|line| {
            vec![
                format!("{} x{}", line.product.name, line.quantity),
                state.money(line.line_total()),
            ]
        })
        .collect();
    rows.push(vec!["Subtotal".into(), state.money(totals.subtotal)]);
    rows.push(vec!["Discount".into(), state.money(totals.discount)]);
    rows.push(vec!["Total".into(), state.money(totals.total)]);
    if !draft.services.is_empty() {
        rows.push(vec![
            format!("Services ({})", draft.services.len()),
            state.money(draft.services_total()),
        ]);
    }
    table(&rows)
}

fn render_list(state: &AppState, page: &Page<Sale>) -> String {
    if page.is_empty() {
        return "No sales found\n".to_string();
    }
    let mut rows = vec![["ID", "CLIENT", "TOTAL", "STATUS", "DATE"].map(String::from).to_vec()];
    rows.extend(page.content.iter().map(|s| {
        vec![
            s.id.to_string(),
            s.client.name.clone(),
            state.money(s.total),
            s.status.to_string(),
            or_dash(s.created_at.map(|at| at.format("%Y-%m-%d").to_string())),
        ]
    }));
    table(&rows)
}

fn render_sale(state: &AppState, sale: &Sale, summary: &PaymentSummary) -> String {
    let mut out = format!(
        "Sale #{} for {} (#{}), {}\n",
        sale.id, sale.client.name, sale.client.id, sale.status
    );
    let mut rows: Vec<Vec<String>> = sale
        .items
        .iter()
        .map(|item| {
            let unit = item.unit_price.unwrap_or_else(|| item.product.unit_price());
            vec![
                item.product.name.clone(),
                format!("x{}", item.quantity),
                state.money(unit.multiply_quantity(item.quantity)),
            ]
        })
        .collect();
    rows.extend(sale.services.iter().map(|s| vec![s.name.clone(), "service".into(), state.money(s.price)]));
    rows.push(vec!["Discount".into(), String::new(), state.money(sale.discount)]);
    rows.push(vec!["Total".into(), String::new(), state.money(sale.total)]);
    rows.push(vec!["Paid".into(), String::new(), state.money(summary.paid)]);
    rows.push(vec!["Remaining".into(), String::new(), state.money(summary.remaining)]);
    out.push_str(&table(&rows));
    if let Some(notes) = sale.notes.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("Notes: {notes}\n"));
    }
    out
}
