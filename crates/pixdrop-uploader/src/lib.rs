//! Pixdrop Uploader Library
//!
//! Sequences validation, presigned authorization and the direct transfer for one
//! file or a batch, and exposes the reactive upload status to UI collaborators.
//! Capture adapters (file picker, clipboard paste) and the local preview generator
//! feed an `UploadField`, which represents one upload surface.

pub mod capture;
pub mod field;
pub mod notify;
pub mod preview;
pub mod uploader;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use capture::{intercept_paste, take_selected_file, ClipboardItem, PasteEvent, PickerEvent};
pub use field::UploadField;
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use preview::generate_preview;
pub use uploader::{Uploader, UploaderCallbacks};
