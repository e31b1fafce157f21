//! Direct transfer of file bytes to a presigned storage URL.
//!
//! The body is written with a single HTTP PUT carrying the file's Content-Type.
//! Success is a 2xx status; the response body is not inspected.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use pixdrop_core::models::UploadFile;
use pixdrop_core::{UploadError, UploadResult, UploaderConfig};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use std::sync::Arc;

use crate::build_http_client;

/// Default size of the body chunks handed to the transport
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Progress callback: `(bytes_sent, total_bytes)`.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Writes a file to an authorized storage URL.
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    /// Single attempt. Transport or status failures are `TransferFailed`; a body
    /// that cannot be read is `LocalReadFailed`.
    async fn transfer(
        &self,
        upload_url: &str,
        file: &UploadFile,
        progress: Option<ProgressFn>,
    ) -> UploadResult<()>;
}

/// Transfer executor using a plain reqwest client (no API auth headers).
#[derive(Clone, Debug)]
pub struct HttpTransferExecutor {
    client: Client,
    chunk_size: usize,
}

impl HttpTransferExecutor {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn from_config(config: &UploaderConfig) -> UploadResult<Self> {
        let client = build_http_client(config.http_timeout_secs)
            .map_err(|e| UploadError::Config(format!("{:#}", e)))?;
        Ok(Self::new(client))
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Split `data` into chunks, reporting cumulative bytes as each chunk is polled.
fn progress_stream(
    data: Bytes,
    chunk_size: usize,
    progress: ProgressFn,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let total = data.len() as u64;
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect();

    let mut sent = 0u64;
    futures::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        progress(sent, total);
        Ok(chunk)
    })
}

#[async_trait]
impl TransferExecutor for HttpTransferExecutor {
    async fn transfer(
        &self,
        upload_url: &str,
        file: &UploadFile,
        progress: Option<ProgressFn>,
    ) -> UploadResult<()> {
        let data = file.read().await?;
        let total = data.len() as u64;

        let body = match progress {
            Some(progress) => Body::wrap_stream(progress_stream(data, self.chunk_size, progress)),
            None => Body::from(data),
        };

        let response = self
            .client
            .put(upload_url)
            .header(CONTENT_TYPE, file.mime_type.as_str())
            .header(CONTENT_LENGTH, total)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    file_name = %file.name,
                    "Transfer to storage failed"
                );
                UploadError::TransferFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UploadError::TransferFailed(format!(
                "Storage responded with status {}: {}",
                status, error_text
            )));
        }

        tracing::debug!(
            file_name = %file.name,
            size_bytes = total,
            "Transferred file to storage"
        );

        Ok(())
    }
}
