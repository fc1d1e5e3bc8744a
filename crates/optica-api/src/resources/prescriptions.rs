//! `/prescriptions`

use optica_core::prescription::{Prescription, PrescriptionForm};
use optica_core::EntityId;

use super::today;
use crate::envelope::{Page, PageRequest};
use crate::error::ApiResult;
use crate::http::HttpClient;

pub struct PrescriptionsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> PrescriptionsApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        PrescriptionsApi { http }
    }

    pub async fn list(&self, page: &PageRequest) -> ApiResult<Page<Prescription>> {
        self.http.get_page("/prescriptions", page).await
    }

    pub async fn get(&self, id: EntityId) -> ApiResult<Prescription> {
        self.http.get_data(&format!("/prescriptions/{id}")).await
    }

    /// Every prescription of one client, newest first as the API orders them.
    pub async fn for_client(&self, client_id: EntityId) -> ApiResult<Vec<Prescription>> {
        self.http
            .get_data(&format!("/clients/{client_id}/prescriptions"))
            .await
    }

    /// Validates the form and registers the prescription. An invalid form
    /// never reaches the API.
    pub async fn create(&self, form: PrescriptionForm) -> ApiResult<Prescription> {
        let request = form.into_request(today())?;
        self.http.post_data("/prescriptions", &request).await
    }

    pub async fn update(&self, id: EntityId, form: PrescriptionForm) -> ApiResult<Prescription> {
        let request = form.into_request(today())?;
        self.http
            .put_data(&format!("/prescriptions/{id}"), &request)
            .await
    }

    pub async fn delete(&self, id: EntityId) -> ApiResult<()> {
        self.http.delete(&format!("/prescriptions/{id}")).await
    }
}
