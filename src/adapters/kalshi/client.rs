//! Kalshi HTTP Client - Signed REST API Client
//!
//! Wraps reqwest with RSA-PSS authentication for all Kalshi trade API
//! interactions. Every request carries the three signed headers; each
//! call is a single attempt; failures surface as `GatewayError` and
//! the strategy absorbs them at the tick boundary. No retry, no
//! backoff.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ports::exchange::{GatewayError, GatewayResult};

use super::auth::KalshiAuth;

/// Configuration for the Kalshi HTTP client.
#[derive(Debug, Clone)]
pub struct KalshiClientConfig {
    /// Base URL for the trade API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for KalshiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elections.kalshi.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Signed HTTP client for the Kalshi trade API.
pub struct KalshiClient {
    /// Underlying HTTP client.
    http: Client,
    /// Request signer.
    auth: Arc<KalshiAuth>,
    /// Base URL, trailing slash stripped.
    base_url: String,
}

impl KalshiClient {
    /// Create a new signed client.
    pub fn new(auth: Arc<KalshiAuth>, config: KalshiClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(5)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            auth,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Execute a GET request and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let request = self.http.get(format!("{}{}", self.base_url, path));
        self.execute("GET", path, request).await
    }

    /// Execute a POST request with a JSON body and decode the response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        let request = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        self.execute("POST", path, request).await
    }

    /// Execute a DELETE request and decode the JSON response.
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let request = self.http.delete(format!("{}{}", self.base_url, path));
        self.execute("DELETE", path, request).await
    }

    /// Sign, send, and decode one request. Single attempt.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> GatewayResult<T> {
        let (key, signature, timestamp) = self.auth.signed_headers(method, path);

        debug!(method, path, "Sending signed request");

        let response = request
            .header("KALSHI-ACCESS-KEY", key)
            .header("KALSHI-ACCESS-SIGNATURE", signature)
            .header("KALSHI-ACCESS-TIMESTAMP", timestamp)
            .send()
            .await?;

        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
