// Role endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{RoleBody, RoleDto};

impl ApiClient {
    /// `GET /api/roles`
    pub async fn list_roles(&self) -> Result<Vec<RoleDto>, Error> {
        let url = self.api_url("roles")?;
        debug!("listing roles");
        self.get(url).await
    }

    /// `POST /api/roles`
    pub async fn create_role(&self, body: &RoleBody) -> Result<RoleDto, Error> {
        let url = self.api_url("roles")?;
        self.post(url, body).await
    }

    /// `PATCH /api/roles/{id}`
    pub async fn update_role(&self, id: &str, body: &RoleBody) -> Result<RoleDto, Error> {
        let url = self.api_url(&format!("roles/{id}"))?;
        self.patch(url, body).await
    }

    /// `DELETE /api/roles/{id}`
    pub async fn delete_role(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("roles/{id}"))?;
        self.delete_ack(url).await
    }
}
