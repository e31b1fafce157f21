//! Candidate file and upload request models.

use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::error::{UploadError, UploadResult};
use crate::validation::content_type_for_path;

/// Where the bytes of an `UploadFile` live.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already held in memory (clipboard data, picker blobs)
    Memory(Bytes),
    /// A file on disk, read lazily when the preview or the transfer needs it
    Path(PathBuf),
}

/// A file selected for upload.
///
/// `size_bytes` and `mime_type` are the declared metadata the validator checks;
/// the body is only read when needed.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    source: FileSource,
}

impl UploadFile {
    /// Create a file from in-memory bytes. The size is the length of `data`.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size_bytes: data.len() as u64,
            mime_type: mime_type.into(),
            source: FileSource::Memory(data),
        }
    }

    /// Create a file with explicitly declared metadata.
    pub fn with_metadata(
        name: impl Into<String>,
        size_bytes: u64,
        mime_type: impl Into<String>,
        source: FileSource,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            source,
        }
    }

    /// Describe a file on disk. Size comes from the file metadata and the MIME
    /// type from the extension; the contents are not read here.
    pub async fn from_path(path: impl AsRef<Path>) -> UploadResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            UploadError::LocalReadFailed(format!("{}: {}", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(UploadError::LocalReadFailed(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            mime_type: content_type_for_path(path).to_string(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Read the full contents of the file.
    ///
    /// The body must be exactly `size_bytes` long: the validator only ever saw the
    /// declared size, so a body that differs (wrong metadata, or a file that changed
    /// on disk since it was selected) is refused.
    pub async fn read(&self) -> UploadResult<Bytes> {
        let data = match self.source {
            FileSource::Memory(ref data) => data.clone(),
            FileSource::Path(ref path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|e| UploadError::LocalReadFailed(format!("{}: {}", path.display(), e)))?,
        };

        if data.len() as u64 != self.size_bytes {
            return Err(UploadError::LocalReadFailed(format!(
                "{}: read {} bytes but {} were declared",
                self.name,
                data.len(),
                self.size_bytes
            )));
        }
        Ok(data)
    }
}

/// A request to upload one file. Immutable once submitted.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: UploadFile,
    target_name: Option<String>,
}

impl UploadRequest {
    pub fn new(file: UploadFile) -> Self {
        Self {
            file,
            target_name: None,
        }
    }

    /// Upload under an explicit name instead of the file's own name.
    pub fn with_name(file: UploadFile, name: Option<String>) -> Self {
        Self {
            file,
            target_name: name.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Name sent to the authorization backend.
    pub fn target_name(&self) -> &str {
        self.target_name.as_deref().unwrap_or(&self.file.name)
    }
}
