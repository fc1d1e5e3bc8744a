//! # Catalog Commands
//!
//! Products and services, read-only from the command line.

use optica_api::{Page, PageRequest};
use optica_core::{OpticalService, Product};

use super::{or_dash, table, Outcome};
use crate::error::AppResult;
use crate::state::AppState;

pub async fn products(state: &AppState, page: &PageRequest) -> AppResult<Outcome> {
    state.require_login().await?;
    let products = state.client.products().list(page).await?;
    Ok(Outcome::output(render_products(state, &products)))
}

pub async fn services(state: &AppState, page: &PageRequest) -> AppResult<Outcome> {
    state.require_login().await?;
    let services = state.client.services().list(page).await?;
    Ok(Outcome::output(render_services(state, &services)))
}

fn render_products(state: &AppState, page: &Page<Product>) -> String {
    if page.is_empty() {
        return "No products found\n".to_string();
    }
    let mut rows = vec![["ID", "NAME", "CATEGORY", "BRAND", "PRICE", "STOCK"]
        .map(String::from)
        .to_vec()];
    rows.extend(page.content.iter().map(|p| {
        vec![
            p.id.to_string(),
            if p.active { p.name.clone() } else { format!("{} (inactive)", p.name) },
            p.category.to_string(),
            or_dash(p.brand.as_deref()),
            p.sale_price.map(|price| state.money(price)).unwrap_or_else(|| "-".into()),
            or_dash(p.stock),
        ]
    }));
    table(&rows)
}

fn render_services(state: &AppState, page: &Page<OpticalService>) -> String {
    if page.is_empty() {
        return "No services found\n".to_string();
    }
    let mut rows = vec![["ID", "NAME", "PRICE", "DESCRIPTION"].map(String::from).to_vec()];
    rows.extend(page.content.iter().map(|s| {
        vec![
            s.id.to_string(),
            s.name.clone(),
            state.money(s.price),
            or_dash(s.description.as_deref()),
        ]
    }));
    table(&rows)
}
