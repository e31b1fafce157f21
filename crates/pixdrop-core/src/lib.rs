//! Pixdrop Core Library
//!
//! This crate provides the domain models, error types, configuration and validation
//! shared by the pixdrop upload pipeline: the API client, the orchestrator and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::UploaderConfig;
pub use error::{ErrorMetadata, LogLevel, UploadError, UploadResult};
pub use models::{
    AuthorizationGrant, BatchUploadState, FileOutcome, FileSource, StorageReference, UploadFile,
    UploadPhase, UploadRequest, UploadState, UploadStatus,
};
pub use validation::{check_file, validate, DEFAULT_MAX_FILE_SIZE_BYTES};
