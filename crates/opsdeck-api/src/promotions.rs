// Promotion endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{PromotionBody, PromotionDto};

impl ApiClient {
    /// `GET /api/promotions`
    pub async fn list_promotions(&self) -> Result<Vec<PromotionDto>, Error> {
        let url = self.api_url("promotions")?;
        debug!("listing promotions");
        self.get(url).await
    }

    /// `POST /api/promotions`
    pub async fn create_promotion(&self, body: &PromotionBody) -> Result<PromotionDto, Error> {
        let url = self.api_url("promotions")?;
        self.post(url, body).await
    }

    /// `PATCH /api/promotions/{id}`
    pub async fn update_promotion(
        &self,
        id: &str,
        body: &PromotionBody,
    ) -> Result<PromotionDto, Error> {
        let url = self.api_url(&format!("promotions/{id}"))?;
        self.patch(url, body).await
    }

    /// `DELETE /api/promotions/{id}`
    pub async fn delete_promotion(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("promotions/{id}"))?;
        self.delete_ack(url).await
    }
}
