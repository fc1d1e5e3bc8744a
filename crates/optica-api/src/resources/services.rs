//! `/opticalservices`

use optica_core::{CoreError, EntityId, OpticalService, ServiceRequest};

use crate::envelope::{Page, PageRequest};
use crate::error::ApiResult;
use crate::http::HttpClient;

pub struct ServicesApi<'a> {
    http: &'a HttpClient,
}

impl<'a> ServicesApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        ServicesApi { http }
    }

    pub async fn list(&self, page: &PageRequest) -> ApiResult<Page<OpticalService>> {
        self.http.get_page("/opticalservices", page).await
    }

    pub async fn get(&self, id: EntityId) -> ApiResult<OpticalService> {
        self.http.get_data(&format!("/opticalservices/{id}")).await
    }

    pub async fn create(&self, request: &ServiceRequest) -> ApiResult<OpticalService> {
        request.validate().map_err(CoreError::from)?;
        self.http.post_data("/opticalservices", request).await
    }

    pub async fn update(&self, id: EntityId, request: &ServiceRequest) -> ApiResult<OpticalService> {
        request.validate().map_err(CoreError::from)?;
        self.http.put_data(&format!("/opticalservices/{id}"), request).await
    }

    pub async fn delete(&self, id: EntityId) -> ApiResult<()> {
        self.http.delete(&format!("/opticalservices/{id}")).await
    }
}
