//! `/clients`

use optica_core::{Client, ClientRequest, EntityId};

use super::today;
use crate::envelope::{Page, PageRequest};
use crate::error::ApiResult;
use crate::http::HttpClient;

pub struct ClientsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> ClientsApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        ClientsApi { http }
    }

    pub async fn list(&self, page: &PageRequest) -> ApiResult<Page<Client>> {
        self.http.get_page("/clients", page).await
    }

    pub async fn get(&self, id: EntityId) -> ApiResult<Client> {
        self.http.get_data(&format!("/clients/{id}")).await
    }

    /// Validates locally, then registers the client.
    pub async fn create(&self, request: ClientRequest) -> ApiResult<Client> {
        let request = request.into_sanitized(today())?;
        self.http.post_data("/clients", &request).await
    }

    pub async fn update(&self, id: EntityId, request: ClientRequest) -> ApiResult<Client> {
        let request = request.into_sanitized(today())?;
        self.http.put_data(&format!("/clients/{id}"), &request).await
    }

    pub async fn delete(&self, id: EntityId) -> ApiResult<()> {
        self.http.delete(&format!("/clients/{id}")).await
    }
}
