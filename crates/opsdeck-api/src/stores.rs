// Store endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{StoreBody, StoreDto};

impl ApiClient {
    /// `GET /api/stores`
    pub async fn list_stores(&self) -> Result<Vec<StoreDto>, Error> {
        let url = self.api_url("stores")?;
        debug!("listing stores");
        self.get(url).await
    }

    /// `POST /api/stores`
    pub async fn create_store(&self, body: &StoreBody) -> Result<StoreDto, Error> {
        let url = self.api_url("stores")?;
        self.post(url, body).await
    }

    /// `PATCH /api/stores/{id}`
    pub async fn update_store(&self, id: &str, body: &StoreBody) -> Result<StoreDto, Error> {
        let url = self.api_url(&format!("stores/{id}"))?;
        self.patch(url, body).await
    }

    /// `DELETE /api/stores/{id}`
    pub async fn delete_store(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("stores/{id}"))?;
        self.delete_ack(url).await
    }
}
