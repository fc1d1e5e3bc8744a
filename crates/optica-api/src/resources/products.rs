//! `/products`

use optica_core::{CoreError, EntityId, Product, ProductRequest};

use crate::envelope::{Page, PageRequest};
use crate::error::ApiResult;
use crate::http::HttpClient;

pub struct ProductsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        ProductsApi { http }
    }

    pub async fn list(&self, page: &PageRequest) -> ApiResult<Page<Product>> {
        self.http.get_page("/products", page).await
    }

    pub async fn get(&self, id: EntityId) -> ApiResult<Product> {
        self.http.get_data(&format!("/products/{id}")).await
    }

    pub async fn create(&self, request: &ProductRequest) -> ApiResult<Product> {
        request.validate().map_err(CoreError::from)?;
        self.http.post_data("/products", request).await
    }

    pub async fn update(&self, id: EntityId, request: &ProductRequest) -> ApiResult<Product> {
        request.validate().map_err(CoreError::from)?;
        self.http.put_data(&format!("/products/{id}"), request).await
    }

    pub async fn delete(&self, id: EntityId) -> ApiResult<()> {
        self.http.delete(&format!("/products/{id}")).await
    }
}
