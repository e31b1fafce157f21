//! HTTP clients for the pixdrop upload pipeline.
//!
//! `ApiClient` talks to the authorization backend with configurable auth (Bearer token
//! or X-API-Key). The two pipeline stages built on top of it are the presign request
//! (`presign`) and the direct PUT to object storage (`transfer`).

pub mod presign;
pub mod transfer;

use anyhow::{Context, Result};
use pixdrop_core::UploaderConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use presign::{HttpUploadAuthorizer, UploadAuthorizer};
pub use transfer::{HttpTransferExecutor, ProgressFn, TransferExecutor};

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// Build the underlying reqwest client with the configured transport timeout.
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to create HTTP client")
}

/// HTTP client for the authorization backend with optional auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<Auth>,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Option<Auth>) -> Result<Self> {
        let client = build_http_client(60)?;
        Ok(Self::with_client(client, base_url, auth))
    }

    pub fn with_client(client: Client, base_url: String, auth: Option<Auth>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Create a client from configuration. A bearer token wins over an API key.
    pub fn from_config(config: &UploaderConfig) -> Result<Self> {
        let client = build_http_client(config.http_timeout_secs)?;
        Ok(Self::with_client(
            client,
            config.api_url.clone(),
            auth_from_config(config),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::Bearer(token)) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            Some(Auth::XApiKey(key)) => request.header("X-API-Key", key.as_str()),
            None => request,
        }
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let request = self.apply_auth(request);

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }
}

fn auth_from_config(config: &UploaderConfig) -> Option<Auth> {
    config
        .api_token
        .clone()
        .map(Auth::Bearer)
        .or_else(|| config.api_key.clone().map(Auth::XApiKey))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:3000/".to_string(), None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.build_url("/api/v0/uploads/presigned"),
            "http://localhost:3000/api/v0/uploads/presigned"
        );
    }

    #[tokio::test]
    async fn bearer_auth_header_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("authorization", "Bearer t0k3n")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Some(Auth::Bearer("t0k3n".to_string()))).unwrap();
        let body: serde_json::Value = client
            .post_json("/echo", &serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(body["ok"], true);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn config_token_selects_bearer_over_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("authorization", "Bearer t0k3n")
            .match_header("x-api-key", mockito::Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let config = UploaderConfig {
            api_url: server.url(),
            api_key: Some("secret".to_string()),
            api_token: Some("t0k3n".to_string()),
            ..UploaderConfig::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        client
            .post_json::<serde_json::Value, _>("/echo", &serde_json::json!({}))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn config_without_token_uses_api_key() {
        let config = UploaderConfig {
            api_key: Some("secret".to_string()),
            ..UploaderConfig::default()
        };
        assert!(matches!(auth_from_config(&config), Some(Auth::XApiKey(ref k)) if k == "secret"));
        assert!(auth_from_config(&UploaderConfig::default()).is_none());
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/echo")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), None).unwrap();
        let err = client
            .post_json::<serde_json::Value, _>("/echo", &serde_json::json!({}))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("503"), "{message}");
        assert!(message.contains("maintenance"), "{message}");
    }
}
