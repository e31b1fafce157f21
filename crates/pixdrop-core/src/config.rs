//! Configuration module
//!
//! Settings for the upload pipeline: where the authorization backend lives, how the
//! client authenticates, the validation limit and how storage references are
//! turned into public URLs.

use std::env;

use crate::validation::DEFAULT_MAX_FILE_SIZE_BYTES;

// Common constants
const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_API_VERSION: &str = "v0";
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Upload pipeline configuration
#[derive(Clone, Debug)]
pub struct UploaderConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    /// Bearer token; takes precedence over `api_key` when both are set
    pub api_token: Option<String>,
    pub presign_path: String,
    pub max_file_size_bytes: u64,
    /// Base URL used to build public links for stored objects
    pub public_base_url: Option<String>,
    pub http_timeout_secs: u64,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            api_token: None,
            presign_path: default_presign_path(DEFAULT_API_VERSION),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            public_base_url: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }
}

/// API version prefix (e.g. "/api/v0").
pub fn api_prefix(version: &str) -> String {
    format!("/api/{}", version)
}

fn default_presign_path(version: &str) -> String {
    format!("{}/uploads/presigned", api_prefix(version))
}

impl UploaderConfig {
    /// Load configuration from the environment (and a `.env` file when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("PIXDROP_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let api_key = env::var("PIXDROP_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let api_token = env::var("PIXDROP_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let api_version =
            env::var("PIXDROP_API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());

        let config = UploaderConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            api_token,
            presign_path: env::var("PIXDROP_PRESIGN_PATH")
                .unwrap_or_else(|_| default_presign_path(&api_version)),
            max_file_size_bytes: env::var("PIXDROP_MAX_FILE_SIZE_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES),
            public_base_url: env::var("PIXDROP_PUBLIC_BASE_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            http_timeout_secs: env::var("PIXDROP_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "PIXDROP_API_URL must be an http(s) URL, got '{}'",
                self.api_url
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "PIXDROP_MAX_FILE_SIZE_BYTES must be greater than zero"
            ));
        }

        if !self.presign_path.starts_with('/') {
            return Err(anyhow::anyhow!(
                "PIXDROP_PRESIGN_PATH must start with '/', got '{}'",
                self.presign_path
            ));
        }

        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }
}
