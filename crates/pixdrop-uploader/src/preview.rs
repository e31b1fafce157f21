//! Local preview generation.
//!
//! Renders the selected file as a `data:` URI so it can be shown before, and
//! regardless of, the network upload finishing.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pixdrop_core::{UploadFile, UploadResult};

/// Read `file` and encode it as `data:<mime>;base64,<payload>`.
pub async fn generate_preview(file: &UploadFile) -> UploadResult<String> {
    let data = file.read().await?;
    Ok(format!(
        "data:{};base64,{}",
        file.mime_type,
        STANDARD.encode(&data)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixdrop_core::UploadError;

    #[tokio::test]
    async fn test_in_memory_preview() {
        let file = UploadFile::from_bytes("dot.gif", "image/gif", &b"GIF89a"[..]);
        let uri = generate_preview(&file).await.unwrap();
        assert_eq!(uri, "data:image/gif;base64,R0lGODlh");
    }

    #[tokio::test]
    async fn test_missing_file_is_local_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.png");
        std::fs::write(&path, b"png").unwrap();
        let file = UploadFile::from_path(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = generate_preview(&file).await.unwrap_err();
        assert!(matches!(err, UploadError::LocalReadFailed(_)));
    }
}
