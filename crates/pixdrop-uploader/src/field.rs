//! One upload surface: a field that accepts picked or pasted images, shows a
//! local preview and keeps the last stored reference.

use pixdrop_core::{
    ErrorMetadata, StorageReference, UploadError, UploadFile, UploadRequest, UploadResult,
    UploadState,
};

use crate::capture::{intercept_paste, take_selected_file, PasteEvent, PickerEvent};
use crate::notify::Notification;
use crate::preview::generate_preview;
use crate::uploader::Uploader;

pub struct UploadField {
    uploader: Uploader,
    file: Option<UploadFile>,
    preview: Option<String>,
    result: Option<StorageReference>,
}

impl UploadField {
    pub fn new(uploader: Uploader) -> Self {
        Self {
            uploader,
            file: None,
            preview: None,
            result: None,
        }
    }

    pub fn uploader(&self) -> &Uploader {
        &self.uploader
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    /// `data:` URI of the current file, once generated.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn result(&self) -> Option<&StorageReference> {
        self.result.as_ref()
    }

    pub fn clear(&mut self) {
        self.file = None;
        self.preview = None;
        self.result = None;
    }

    /// Preview and upload `file` concurrently.
    ///
    /// A preview failure abandons the upload: the in-flight upload future is
    /// dropped, the field is cleared and the error is returned. An upload failure
    /// is not an error here; it is carried by the returned state.
    pub async fn submit(
        &mut self,
        file: UploadFile,
        name: Option<String>,
    ) -> UploadResult<UploadState> {
        self.clear();
        self.file = Some(file.clone());

        let uploader = self.uploader.clone();
        let mut upload = Box::pin(uploader.upload(UploadRequest::with_name(file.clone(), name)));
        let preview = generate_preview(&file);
        tokio::pin!(preview);

        let (uri, state) = tokio::select! {
            uri = &mut preview => match uri {
                Ok(uri) => (uri, upload.await),
                Err(err) => {
                    drop(upload);
                    return Err(self.abort(err));
                }
            },
            state = &mut upload => match preview.await {
                Ok(uri) => (uri, state),
                Err(err) => return Err(self.abort(err)),
            },
        };

        self.preview = Some(uri);
        self.result = state.result().cloned();
        Ok(state)
    }

    /// Upload the first file of a picker interaction. A dismissed picker does nothing.
    pub async fn handle_picker(&mut self, event: PickerEvent) -> Option<UploadResult<UploadState>> {
        let file = take_selected_file(event)?;
        Some(self.submit(file, None).await)
    }

    /// Upload the first pasted image, unless an upload on this surface is already
    /// in flight.
    pub async fn handle_paste(
        &mut self,
        event: &mut PasteEvent,
    ) -> Option<UploadResult<UploadState>> {
        let file = intercept_paste(event, self.uploader.is_uploading())?;
        Some(self.submit(file, None).await)
    }

    fn abort(&mut self, err: UploadError) -> UploadError {
        err.log();
        self.clear();
        self.uploader
            .notifier()
            .notify(Notification::error(err.client_message()));
        err
    }
}
