// Region endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{RegionBody, RegionDto};

impl ApiClient {
    /// `GET /api/regions`
    pub async fn list_regions(&self) -> Result<Vec<RegionDto>, Error> {
        let url = self.api_url("regions")?;
        debug!("listing regions");
        self.get(url).await
    }

    /// `POST /api/regions`
    pub async fn create_region(&self, body: &RegionBody) -> Result<RegionDto, Error> {
        let url = self.api_url("regions")?;
        self.post(url, body).await
    }

    /// `PATCH /api/regions/{id}`
    pub async fn update_region(&self, id: &str, body: &RegionBody) -> Result<RegionDto, Error> {
        let url = self.api_url(&format!("regions/{id}"))?;
        self.patch(url, body).await
    }

    /// `DELETE /api/regions/{id}`
    pub async fn delete_region(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("regions/{id}"))?;
        self.delete_ack(url).await
    }
}
