//! Storage reference model: where an uploaded object now resides.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A reference to a stored object, returned to callers after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageReference {
    /// Opaque storage key assigned by the backend
    pub key: String,
    /// Public URL of the object, when a public base URL is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StorageReference {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: None,
        }
    }

    /// Build a reference whose URL is `{public_base_url}/{key}`.
    pub fn with_public_base(key: impl Into<String>, public_base_url: Option<&str>) -> Self {
        let key = key.into();
        let url = public_base_url.map(|base| {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                key.trim_start_matches('/')
            )
        });
        Self { key, url }
    }
}

impl Display for StorageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.url {
            Some(ref url) => write!(f, "{}", url),
            None => write!(f, "{}", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_without_double_slash() {
        let reference =
            StorageReference::with_public_base("/uploads/a.png", Some("https://cdn.test/"));
        assert_eq!(
            reference.url.as_deref(),
            Some("https://cdn.test/uploads/a.png")
        );
        assert_eq!(reference.key, "/uploads/a.png");
    }

    #[test]
    fn display_prefers_url() {
        assert_eq!(StorageReference::new("k1").to_string(), "k1");
        let reference = StorageReference::with_public_base("k1", Some("https://cdn.test"));
        assert_eq!(reference.to_string(), "https://cdn.test/k1");
    }
}
