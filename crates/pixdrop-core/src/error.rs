//! Error types module
//!
//! Every failure of the upload pipeline is represented by `UploadError`. The variants
//! follow the pipeline stages: validation, authorization, transfer and local reads.
//! `Display` carries the internal detail for logs; `client_message` is the normalized
//! text shown to users.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failed network round trips
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to a user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "TRANSFER_FAILED")
    fn error_code(&self) -> &'static str;

    /// Human-readable message for notifications and error callbacks
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Local read failed: {0}")]
    LocalReadFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for upload pipeline operations
pub type UploadResult<T> = Result<T, UploadError>;

impl From<io::Error> for UploadError {
    fn from(err: io::Error) -> Self {
        UploadError::LocalReadFailed(err.to_string())
    }
}

/// Static metadata for each variant: (error_code, log_level).
fn upload_error_static_metadata(err: &UploadError) -> (&'static str, LogLevel) {
    match err {
        UploadError::ValidationRejected(_) => ("VALIDATION_REJECTED", LogLevel::Debug),
        UploadError::AuthorizationFailed(_) => ("AUTHORIZATION_FAILED", LogLevel::Warn),
        UploadError::TransferFailed(_) => ("TRANSFER_FAILED", LogLevel::Warn),
        UploadError::LocalReadFailed(_) => ("LOCAL_READ_FAILED", LogLevel::Warn),
        UploadError::Config(_) => ("CONFIG_ERROR", LogLevel::Error),
    }
}

impl UploadError {
    /// Get the error type name for detailed error output
    pub fn error_type(&self) -> &str {
        match self {
            UploadError::ValidationRejected(_) => "ValidationRejected",
            UploadError::AuthorizationFailed(_) => "AuthorizationFailed",
            UploadError::TransferFailed(_) => "TransferFailed",
            UploadError::LocalReadFailed(_) => "LocalReadFailed",
            UploadError::Config(_) => "Config",
        }
    }

    /// Emit this error as a tracing event at its configured level.
    pub fn log(&self) {
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(
                error_code = self.error_code(),
                error = %self,
                "Upload rejected"
            ),
            LogLevel::Warn => tracing::warn!(
                error_code = self.error_code(),
                error = %self,
                "Upload failed"
            ),
            LogLevel::Error => tracing::error!(
                error_code = self.error_code(),
                error = %self,
                "Upload failed"
            ),
        }
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        upload_error_static_metadata(self).0
    }

    fn log_level(&self) -> LogLevel {
        upload_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::ValidationRejected(ref msg) => msg.clone(),
            UploadError::AuthorizationFailed(_) => "Failed to create image upload URL".to_string(),
            UploadError::TransferFailed(_) => "Failed to upload image".to_string(),
            UploadError::LocalReadFailed(_) => "Failed to read the selected file".to_string(),
            UploadError::Config(ref msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_validation() {
        let err = UploadError::ValidationRejected("File size must not exceed 5MB".to_string());
        assert_eq!(err.error_code(), "VALIDATION_REJECTED");
        assert_eq!(err.client_message(), "File size must not exceed 5MB");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_client_message_hides_transport_detail() {
        let err = UploadError::AuthorizationFailed("connection refused (os error 111)".to_string());
        assert_eq!(err.error_code(), "AUTHORIZATION_FAILED");
        assert_eq!(err.client_message(), "Failed to create image upload URL");
        assert!(err.to_string().contains("connection refused"));

        let err = UploadError::TransferFailed("status 403".to_string());
        assert_eq!(err.client_message(), "Failed to upload image");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_io_error_maps_to_local_read() {
        let err = UploadError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.error_type(), "LocalReadFailed");
        assert_eq!(err.error_code(), "LOCAL_READ_FAILED");
    }
}
