// Session endpoints
//
// Login sets the access-token cookie in the client's jar; logout clears
// the server-side session. The routing guard that the browser front end
// relied on has no equivalent here -- an expired session simply surfaces
// as an authentication error on the next call.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginBody, UserInfoDto};

impl ApiClient {
    /// Authenticate with username/password.
    ///
    /// `POST /api/auth/login` -- on success the server sets the
    /// access-token cookie and returns the authenticated principal.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<UserInfoDto, Error> {
        let url = self.api_url("auth/login")?;
        debug!(username, "logging in");

        let body = LoginBody {
            username: username.to_owned(),
            password: password.expose_secret().to_owned(),
        };

        self.post(url, &body).await.map_err(|e| match e {
            // A login rejection comes back as an envelope error; present it
            // as an authentication failure rather than a generic API error.
            Error::Api { message, .. } => Error::Authentication { message },
            other => other,
        })
    }

    /// End the current session.
    ///
    /// `POST /api/auth/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("auth/logout")?;
        debug!("logging out");
        self.post_ack(url, &serde_json::json!({})).await
    }

    /// Fetch the authenticated principal for the current session.
    ///
    /// `GET /api/auth/user-info`
    pub async fn user_info(&self) -> Result<UserInfoDto, Error> {
        let url = self.api_url("auth/user-info")?;
        self.get(url).await
    }
}
