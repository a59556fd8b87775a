// User endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::UserDto;

impl ApiClient {
    /// List all users.
    ///
    /// `GET /api/users`
    pub async fn list_users(&self) -> Result<Vec<UserDto>, Error> {
        let url = self.api_url("users")?;
        debug!("listing users");
        self.get(url).await
    }

    /// Reset a user's password. The server generates a one-time password
    /// and delivers it out of band; the response is an acknowledgement.
    ///
    /// `POST /api/users/{id}/reset-password`
    pub async fn reset_password(&self, user_id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("users/{user_id}/reset-password"))?;
        debug!(user_id, "resetting password");
        self.post_ack(url, &serde_json::json!({})).await
    }
}
