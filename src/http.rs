use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::AuthContext;
use crate::error::{AppError, Result};

/// JSON transport shared by the provider adapters. Success bodies are
/// decoded, non-2xx responses become `ProviderApi` with the status kept.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
}

impl ApiClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, auth: &AuthContext) -> Result<T> {
        debug!("GET {}", url);
        self.send(self.http_client.get(url), auth).await
    }

    pub async fn post_json<B, T>(&self, url: &str, auth: &AuthContext, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);
        self.send(self.http_client.post(url).json(body), auth).await
    }

    pub async fn delete_json<B, T>(&self, url: &str, auth: &AuthContext, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("DELETE {}", url);
        self.send(self.http_client.delete(url).json(body), auth).await
    }

    /// POST without provider credentials, for the mood services.
    pub async fn post_unauthenticated<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);
        let response = self.http_client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, auth: &AuthContext) -> Result<T> {
        let response = request.bearer_auth(auth.bearer_token()).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Provider request failed ({}): {}", status, error_text);
            return Err(AppError::ProviderApi {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
