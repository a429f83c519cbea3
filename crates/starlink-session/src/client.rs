//! Authenticated API calls routed through the session store.

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SessionError;
use crate::http::read_data;
use crate::issuer::HttpIssuer;
use crate::store::SessionStore;

/// Sends bearer-authenticated requests for the current session. A
/// `token_expired` rejection is refreshed and retried transparently.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(http: Client, base_url: &str, session: SessionStore) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Shares the issuer's connection pool and base URL.
    pub fn from_issuer(issuer: &HttpIssuer, session: SessionStore) -> Self {
        Self::new(issuer.client().clone(), issuer.base_url(), session)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SessionError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, SessionError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, SessionError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| SessionError::Decode(e.to_string()))?;

        self.session
            .send(|token| {
                let mut builder = self
                    .http
                    .request(method.clone(), url.as_str())
                    .bearer_auth(token);
                if let Some(body) = &body {
                    builder = builder.json(body);
                }
                async move {
                    match builder.send().await {
                        Ok(response) => read_data(response).await,
                        Err(e) => Err(SessionError::from(e)),
                    }
                }
            })
            .await
    }
}
