//! Client-side validation run before any network call.
//!
//! A file is accepted when its declared size is within the limit and its MIME type
//! belongs to the `image/` class.

use std::path::Path;

use crate::error::{UploadError, UploadResult};
use crate::models::UploadFile;

/// Default upload size limit: 5 MB
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const IMAGE_CLASS_PREFIX: &str = "image/";

/// Check `file` against the size limit and the image content-type class.
pub fn check_file(file: &UploadFile, max_size_bytes: u64) -> UploadResult<()> {
    if file.size_bytes > max_size_bytes {
        return Err(UploadError::ValidationRejected(format!(
            "File size must not exceed {}MB",
            format_megabytes(max_size_bytes)
        )));
    }

    if !is_image_content_type(&file.mime_type) {
        return Err(UploadError::ValidationRejected(
            "Only image files are allowed".to_string(),
        ));
    }

    Ok(())
}

/// Predicate form of [`check_file`].
pub fn validate(file: &UploadFile, max_size_bytes: u64) -> bool {
    check_file(file, max_size_bytes).is_ok()
}

/// True when the MIME type is in the `image/` class (case-insensitive).
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..IMAGE_CLASS_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IMAGE_CLASS_PREFIX))
}

/// Render a byte count as megabytes: whole numbers without decimals, otherwise one decimal.
pub fn format_megabytes(bytes: u64) -> String {
    let mb = bytes as f64 / BYTES_PER_MB;
    if mb.fract() == 0.0 {
        format!("{:.0}", mb)
    } else {
        format!("{:.1}", mb)
    }
}

/// Map a file extension to the Content-Type declared for the transfer.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "heic" => "image/heic",
        "tif" | "tiff" => "image/tiff",
        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        // Documents
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileSource;
    use bytes::Bytes;

    fn declared(size_bytes: u64, mime_type: &str) -> UploadFile {
        UploadFile::with_metadata(
            "photo",
            size_bytes,
            mime_type,
            FileSource::Memory(Bytes::new()),
        )
    }

    #[test]
    fn test_oversized_file_rejected_with_limit_in_mb() {
        let file = declared(6 * 1024 * 1024, "image/png");
        let err = check_file(&file, DEFAULT_MAX_FILE_SIZE_BYTES).unwrap_err();
        assert_eq!(
            err,
            UploadError::ValidationRejected("File size must not exceed 5MB".to_string())
        );
        assert!(!validate(&file, DEFAULT_MAX_FILE_SIZE_BYTES));
    }

    #[test]
    fn test_size_at_limit_accepted() {
        let file = declared(DEFAULT_MAX_FILE_SIZE_BYTES, "image/jpeg");
        assert!(validate(&file, DEFAULT_MAX_FILE_SIZE_BYTES));
        assert!(!validate(&file, DEFAULT_MAX_FILE_SIZE_BYTES - 1));
    }

    #[test]
    fn test_non_image_types_rejected() {
        for mime in ["application/pdf", "text/plain", "video/mp4", "", "imagex/png", "image"] {
            let file = declared(10, mime);
            assert!(!validate(&file, DEFAULT_MAX_FILE_SIZE_BYTES), "{mime}");
        }
    }

    #[test]
    fn test_image_class_is_case_insensitive() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("IMAGE/JPEG"));
        assert!(is_image_content_type("image/svg+xml"));
        assert!(!is_image_content_type("img/png"));
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(5_242_880), "5");
        assert_eq!(format_megabytes(1_572_864), "1.5");
    }

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(content_type_for_path(Path::new("a/b/cat.PNG")), "image/png");
        assert_eq!(content_type_for_path(Path::new("cat.jpeg")), "image/jpeg");
        assert_eq!(
            content_type_for_path(Path::new("notes")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for_path(Path::new("doc.pdf")), "application/pdf");
    }
}
