// Admin API HTTP client
//
// Wraps `reqwest::Client` with URL construction and envelope unwrapping.
// All endpoint modules (users, stores, tickets, projects, etc.) are
// implemented as inherent methods via separate files to keep this module
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Envelope `statusCode` values treated as success. Anything else is an
/// application error carrying the server-supplied message.
const ACCEPTED: [u16; 3] = [200, 201, 202];

/// Raw HTTP client for the admin API.
///
/// Handles the `{ statusCode, message, data }` envelope and `/api/...`
/// URL construction. All methods return unwrapped `data` payloads -- the
/// envelope is stripped before the caller sees it. Session state lives in
/// the cookie jar: a successful login sets the access-token cookie and
/// every subsequent request carries it automatically.
///
/// Cheap to clone -- the underlying `reqwest::Client` (and its cookie jar)
/// is shared between clones.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). The `base_url` should
    /// be the server root (e.g. `https://admin.example.com`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when you already have a client with a session cookie in its
    /// jar (e.g. in tests, or after authenticating via a shared client).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope payload.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        self.parse_data(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope payload.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_data(resp).await
    }

    /// Send a POST request, validating the envelope but discarding `data`.
    pub(crate) async fn post_ack(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_ack(resp).await
    }

    /// Send a PATCH request with JSON body and unwrap the envelope payload.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("PATCH {}", url);
        let resp = self
            .http
            .patch(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_data(resp).await
    }

    /// Send a PATCH request, validating the envelope but discarding `data`.
    pub(crate) async fn patch_ack(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("PATCH {}", url);
        let resp = self
            .http
            .patch(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_ack(resp).await
    }

    /// Send a PUT request, validating the envelope but discarding `data`.
    pub(crate) async fn put_ack(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_ack(resp).await
    }

    /// Send a DELETE request, validating the envelope but discarding `data`.
    pub(crate) async fn delete_ack(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_ack(resp).await
    }

    // ── Envelope parsing ─────────────────────────────────────────────

    /// Parse the envelope and return the `data` payload. A missing `data`
    /// field on a success envelope is a decoding error.
    async fn parse_data<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let envelope: Envelope<T> = self.parse_envelope(resp).await?;
        envelope.data.ok_or_else(|| Error::Deserialization {
            message: "success envelope without data".into(),
            body: String::new(),
        })
    }

    /// Parse the envelope, validating the status code only.
    async fn parse_ack(&self, resp: reqwest::Response) -> Result<(), Error> {
        let _: Envelope<serde_json::Value> = self.parse_envelope(resp).await?;
        Ok(())
    }

    /// Parse the `{ statusCode, message, data }` envelope, returning it on
    /// success or an `Error::Api` if `statusCode` is outside the accepted
    /// set. HTTP 401 short-circuits to an authentication error.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if ACCEPTED.contains(&envelope.status_code) {
            Ok(envelope)
        } else {
            Err(Error::Api {
                status_code: envelope.status_code,
                message: envelope.message,
            })
        }
    }
}
