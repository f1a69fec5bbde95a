//! Authenticated HTTP client for the controller REST API.
//!
//! The controller authenticates with a short-lived token obtained from
//! `POST /api/system/{version}/auth/token` under basic auth; every other
//! call carries it in the `X-Auth-Token` header and hits
//! `https://{host}/api/{version}/{path}`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ControllerConfig;
use crate::error::ClientError;

const TOKEN_HEADER: &str = "X-Auth-Token";

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: String,
}

/// HTTP client holding the session token.
pub struct ApiClient {
    inner: reqwest::Client,
    config: ControllerConfig,
    token: String,
}

impl ApiClient {
    /// Build the underlying client and obtain an auth token.
    ///
    /// Any failure here is [`ClientError::Auth`]; without a token no further
    /// work is possible.
    pub async fn connect(config: ControllerConfig) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let url = config.auth_url();
        debug!(url = %url, "Requesting auth token");

        let response = inner
            .post(&url)
            .basic_auth(&config.username, Some(&config.password))
            .send()
            .await
            .map_err(|e| ClientError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Auth(format!("HTTP {}", response.status())));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Auth(format!("token response: {e}")))?;

        Ok(Self {
            inner,
            config,
            token: body.token,
        })
    }

    /// Get JSON from an API path.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.config.api_url(path);
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
                path: path.to_owned(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::decode(path, e.to_string()))
    }

    /// Post a JSON body to an API path and decode the JSON response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, ClientError> {
        let url = self.config.api_url(path);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .post(&url)
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
                path: path.to_owned(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::decode(path, e.to_string()))
    }
}
