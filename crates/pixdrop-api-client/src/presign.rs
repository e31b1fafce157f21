//! Presigned upload authorization.
//!
//! One POST per upload attempt; the grant is handed straight to the transfer stage
//! and never cached.

use async_trait::async_trait;
use pixdrop_core::models::{AuthorizationGrant, PresignedUploadRequest};
use pixdrop_core::{UploadError, UploadResult, UploaderConfig};

use crate::ApiClient;

/// Obtains a time-limited write authorization for one file.
#[async_trait]
pub trait UploadAuthorizer: Send + Sync {
    /// Single attempt; any failure is reported as `UploadError::AuthorizationFailed`.
    async fn request_authorization(
        &self,
        filename: &str,
        content_type: &str,
    ) -> UploadResult<AuthorizationGrant>;
}

/// Authorizer backed by the presign endpoint of the API.
#[derive(Clone, Debug)]
pub struct HttpUploadAuthorizer {
    api: ApiClient,
    presign_path: String,
}

impl HttpUploadAuthorizer {
    pub fn new(api: ApiClient, presign_path: impl Into<String>) -> Self {
        Self {
            api,
            presign_path: presign_path.into(),
        }
    }

    pub fn from_config(config: &UploaderConfig) -> UploadResult<Self> {
        let api = ApiClient::from_config(config)
            .map_err(|e| UploadError::Config(format!("{:#}", e)))?;
        Ok(Self::new(api, config.presign_path.clone()))
    }
}

#[async_trait]
impl UploadAuthorizer for HttpUploadAuthorizer {
    #[tracing::instrument(skip(self), fields(operation = "request_authorization"))]
    async fn request_authorization(
        &self,
        filename: &str,
        content_type: &str,
    ) -> UploadResult<AuthorizationGrant> {
        let request = PresignedUploadRequest {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        };

        let grant: AuthorizationGrant = self
            .api
            .post_json(&self.presign_path, &request)
            .await
            .map_err(|e| UploadError::AuthorizationFailed(format!("{:#}", e)))?;

        tracing::debug!(
            storage_key = %grant.storage_key,
            "Received presigned upload URL"
        );

        Ok(grant)
    }
}
