//! `/sales`
//!
//! Creating and editing go through [`SaleWizard`]: the draft is validated
//! and sanitized locally, so an invalid sale is never sent.

use optica_core::{EntityId, Sale, SaleWizard, WizardMode};
use tracing::info;

use crate::envelope::{Page, PageRequest};
use crate::error::ApiResult;
use crate::http::HttpClient;

pub struct SalesApi<'a> {
    http: &'a HttpClient,
}

impl<'a> SalesApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        SalesApi { http }
    }

    pub async fn list(&self, page: &PageRequest) -> ApiResult<Page<Sale>> {
        self.http.get_page("/sales", page).await
    }

    pub async fn get(&self, id: EntityId) -> ApiResult<Sale> {
        self.http.get_data(&format!("/sales/{id}")).await
    }

    /// Fetches a sale and opens it in an edit-mode wizard.
    pub async fn edit(&self, id: EntityId) -> ApiResult<SaleWizard> {
        let sale = self.get(id).await?;
        Ok(SaleWizard::edit(&sale)?)
    }

    /// Validates the wizard and creates or updates the sale, depending on
    /// its mode.
    pub async fn submit(&self, wizard: &SaleWizard) -> ApiResult<Sale> {
        let payload = wizard.submit()?;
        let sale: Sale = match wizard.mode() {
            WizardMode::Create => self.http.post_data("/sales", &payload).await?,
            WizardMode::Edit(id) => self.http.put_data(&format!("/sales/{id}"), &payload).await?,
        };
        info!(sale_id = sale.id, total = %sale.total, "Sale saved");
        Ok(sale)
    }

    pub async fn cancel(&self, id: EntityId) -> ApiResult<Sale> {
        let sale: Sale = self.http.patch_empty(&format!("/sales/{id}/cancel")).await?;
        info!(sale_id = id, "Sale canceled");
        Ok(sale)
    }
}
