use pixdrop_core::{check_file, ErrorMetadata, UploadFile};
use serde::Serialize;

/// Truncate a string to `max_len` characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Result of the `validate` command.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub max_size_bytes: u64,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationReport {
    pub fn check(file: &UploadFile, max_size_bytes: u64) -> Self {
        let message = check_file(file, max_size_bytes)
            .err()
            .map(|err| err.client_message());
        Self {
            file_name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size_bytes: file.size_bytes,
            max_size_bytes,
            valid: message.is_none(),
            message,
        }
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays parseable JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("data:image/png", 20), "data:image/png");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(
            truncate_string("data:image/png;base64,iVBORw==", 14),
            "data:image/..."
        );
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_chars() {
        assert_eq!(truncate_string("ééééé", 4), "é...");
    }

    #[test]
    fn validation_report_accepts_image() {
        let file = UploadFile::from_bytes("cat.png", "image/png", vec![0u8; 10]);
        let report = ValidationReport::check(&file, 1024);
        assert!(report.valid);
        assert_eq!(report.message, None);
        assert_eq!(report.size_bytes, 10);
    }

    #[test]
    fn validation_report_explains_rejection() {
        let file = UploadFile::from_bytes("cat.png", "image/png", vec![0u8; 2 * 1024 * 1024]);
        let report = ValidationReport::check(&file, 1024 * 1024);
        assert!(!report.valid);
        assert_eq!(
            report.message.as_deref(),
            Some("File size must not exceed 1MB")
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
    }
}
