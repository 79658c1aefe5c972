//! UAA interactions needed before a run: a client-credentials token for the
//! Cloud Controller and the OIDC issuer used as the Perm actor namespace.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum UaaError {
    #[error("UAA request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("UAA {endpoint} returned {status}: {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String
    },

    #[error("invalid access token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String
}

#[derive(Debug, Deserialize)]
struct OpenIdConfiguration {
    issuer: String
}

pub struct UaaClient {
    base_url: String,
    http: Client
}

impl UaaClient {
    pub fn new(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http
        }
    }

    fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url)
    }

    pub async fn client_credentials_token(
        &self,
        client_id: &str,
        client_secret: &str,
        scopes: &[String]
    ) -> Result<String, UaaError> {
        let url = self.token_url();
        debug!(url = %url, client_id, "Requesting client credentials token");

        let scope = scopes.join(" ");
        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", scope.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UaaError::BadStatus {
                endpoint: url,
                status,
                body
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    pub async fn issuer(&self) -> Result<String, UaaError> {
        let url = format!("{}/.well-known/openid-configuration", self.token_url());
        debug!(url = %url, "Discovering OIDC issuer");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UaaError::BadStatus {
                endpoint: url,
                status,
                body
            });
        }

        let configuration: OpenIdConfiguration = response.json().await?;
        Ok(configuration.issuer)
    }
}

/// Builds a client that sends `Authorization: bearer <token>` on every
/// request.
pub fn authorized_client(builder: ClientBuilder, token: &str) -> Result<Client, UaaError> {
    let mut value = HeaderValue::from_str(&format!("bearer {}", token))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);

    Ok(builder.default_headers(headers).build()?)
}
