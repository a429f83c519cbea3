//! Token issuer contract and its HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, instrument};

use starlink_config::SessionConfig;
use starlink_models::{Credentials, LoginResponse, RefreshTokenResponse, UserProfile};

use crate::error::SessionError;
use crate::http::{read_data, read_envelope};

/// The remote authority that mints and exchanges tokens.
///
/// Implementations never touch session state; the
/// [`SessionStore`](crate::SessionStore) applies their results.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Exchanges credentials for a user profile and a token pair.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, SessionError>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<String, SessionError>;

    /// Fetches the profile the access token belongs to.
    async fn me(&self, access_token: &str) -> Result<UserProfile, SessionError>;

    /// Tells the issuer the access token is no longer in use.
    async fn logout(&self, access_token: &str) -> Result<(), SessionError>;
}

/// [`TokenIssuer`] backed by the platform's `/auth/*` endpoints.
#[derive(Clone, Debug)]
pub struct HttpIssuer {
    http: Client,
    base_url: String,
}

impl HttpIssuer {
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(http, &config.api_base_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TokenIssuer for HttpIssuer {
    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, SessionError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;
        read_data(response).await
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<String, SessionError> {
        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        let data: RefreshTokenResponse = read_data(response).await?;
        debug!("access token refreshed");
        Ok(data.access_token)
    }

    #[instrument(skip_all)]
    async fn me(&self, access_token: &str) -> Result<UserProfile, SessionError> {
        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(access_token)
            .send()
            .await?;
        read_data(response).await
    }

    #[instrument(skip_all)]
    async fn logout(&self, access_token: &str) -> Result<(), SessionError> {
        let response = self
            .http
            .post(self.url("/auth/logout"))
            .bearer_auth(access_token)
            .send()
            .await?;
        read_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }
}
