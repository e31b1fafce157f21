use serde::{Deserialize, Serialize};

/// Request body sent to the backend to obtain a presigned upload URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignedUploadRequest {
    /// Name the object should be stored under
    pub filename: String,
    /// Content type (MIME type) the transfer will declare
    pub content_type: String,
}

/// Time-limited write authorization returned by the backend.
///
/// Valid for a single transfer attempt; never cached or reused across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGrant {
    /// Presigned URL for the direct PUT
    #[serde(rename = "url", alias = "presigned_url", alias = "upload_url")]
    pub upload_url: String,
    /// Key where the object will be stored
    #[serde(rename = "key", alias = "s3_key", alias = "storage_key")]
    pub storage_key: String,
}
