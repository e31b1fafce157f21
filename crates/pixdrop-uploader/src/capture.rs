//! Capture adapters: turn picker and clipboard events into a single candidate file.
//!
//! Both adapters are synchronous. They decide what to forward before any
//! asynchronous upload work starts.

use pixdrop_core::validation::is_image_content_type;
use pixdrop_core::UploadFile;

/// Files chosen in a file-picker interaction, in selection order.
#[derive(Debug, Clone, Default)]
pub struct PickerEvent {
    files: Vec<UploadFile>,
}

impl PickerEvent {
    pub fn new(files: Vec<UploadFile>) -> Self {
        Self { files }
    }
}

/// First selected file, or `None` when the picker was dismissed.
pub fn take_selected_file(event: PickerEvent) -> Option<UploadFile> {
    event.files.into_iter().next()
}

/// One entry of a clipboard payload.
#[derive(Debug, Clone)]
pub enum ClipboardItem {
    /// A file entry (kind "file")
    File(UploadFile),
    /// A string entry such as `text/plain` or `text/html`
    Text { mime_type: String },
}

impl ClipboardItem {
    pub fn text(mime_type: impl Into<String>) -> Self {
        ClipboardItem::Text {
            mime_type: mime_type.into(),
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            ClipboardItem::File(file) => &file.mime_type,
            ClipboardItem::Text { mime_type } => mime_type,
        }
    }
}

/// A paste event whose default handling can be suppressed.
#[derive(Debug, Clone, Default)]
pub struct PasteEvent {
    items: Vec<ClipboardItem>,
    default_prevented: bool,
}

impl PasteEvent {
    pub fn new(items: Vec<ClipboardItem>) -> Self {
        Self {
            items,
            default_prevented: false,
        }
    }

    pub fn items(&self) -> &[ClipboardItem] {
        &self.items
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Claim the first image file of a paste event.
///
/// Ignored entirely while an upload is in flight. On a match the event's default
/// action is prevented and only that one file is returned; anything else leaves
/// the event untouched.
pub fn intercept_paste(event: &mut PasteEvent, is_uploading: bool) -> Option<UploadFile> {
    if is_uploading {
        tracing::debug!("Ignoring paste while an upload is in flight");
        return None;
    }

    let file = event.items.iter().find_map(|item| match item {
        ClipboardItem::File(file) if is_image_content_type(&file.mime_type) => Some(file.clone()),
        _ => None,
    })?;

    event.prevent_default();
    tracing::debug!(file_name = %file.name, mime_type = %file.mime_type, "Captured pasted image");
    Some(file)
}
