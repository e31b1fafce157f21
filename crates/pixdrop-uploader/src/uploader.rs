//! Upload orchestrator.
//!
//! `Uploader` drives each request through validation, authorization and transfer,
//! publishes `UploadStatus` for UI collaborators and reports terminal outcomes via
//! callbacks and the notification port. Clones share the same status channel, so
//! one logical upload surface can hand out handles to its adapters. The in-flight
//! flag stays set until every request started through that channel has finished.

use futures::stream::{FuturesUnordered, StreamExt};
use pixdrop_api_client::{
    HttpTransferExecutor, HttpUploadAuthorizer, ProgressFn, TransferExecutor, UploadAuthorizer,
};
use pixdrop_core::models::transfer_percent;
use pixdrop_core::{
    check_file, BatchUploadState, ErrorMetadata, FileOutcome, StorageReference, UploadError,
    UploadFile, UploadRequest, UploadResult, UploadState, UploadStatus, UploaderConfig,
    DEFAULT_MAX_FILE_SIZE_BYTES,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::notify::{Notification, Notifier, TracingNotifier};

const UPLOAD_SUCCEEDED_MESSAGE: &str = "Image uploaded successfully";

pub type SuccessCallback = Arc<dyn Fn(&StorageReference) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Caller-supplied hooks invoked on terminal outcomes.
#[derive(Clone, Default)]
pub struct UploaderCallbacks {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl UploaderCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, callback: impl Fn(&StorageReference) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    fn success(&self, reference: &StorageReference) {
        if let Some(ref callback) = self.on_success {
            callback(reference);
        }
    }

    fn error(&self, message: &str) {
        if let Some(ref callback) = self.on_error {
            callback(message);
        }
    }
}

/// Reactive status shared by every handle of one upload surface, plus the number
/// of requests currently holding the in-flight flag.
///
/// `active` is only changed inside the channel's modify closures, so the count and
/// the published flag move together under the channel lock.
struct StatusChannel {
    tx: watch::Sender<UploadStatus>,
    active: AtomicUsize,
}

impl StatusChannel {
    fn new() -> Self {
        let (tx, _) = watch::channel(UploadStatus::default());
        Self {
            tx,
            active: AtomicUsize::new(0),
        }
    }
}

/// Holds the in-flight flag for one request or batch. The flag clears and progress
/// resets when the last guard on the channel is dropped, whichever way its request
/// ended.
struct InFlightGuard {
    channel: Arc<StatusChannel>,
}

impl InFlightGuard {
    fn begin(channel: Arc<StatusChannel>, progress: u8) -> Self {
        channel.tx.send_modify(|current| {
            let others = channel.active.fetch_add(1, Ordering::SeqCst);
            current.is_uploading = true;
            current.progress = if others == 0 {
                progress
            } else {
                current.progress.max(progress)
            };
        });
        Self { channel }
    }

    /// Raise progress; never lowers it.
    fn advance(&self, progress: u8) {
        advance_status(&self.channel, progress);
    }

    fn progress_fn(&self) -> ProgressFn {
        let channel = self.channel.clone();
        Arc::new(move |sent, total| advance_status(&channel, transfer_percent(sent, total)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let channel = &self.channel;
        channel.tx.send_if_modified(|current| {
            if channel.active.fetch_sub(1, Ordering::SeqCst) == 1 {
                *current = UploadStatus::default();
                true
            } else {
                false
            }
        });
    }
}

fn advance_status(channel: &StatusChannel, progress: u8) {
    channel.tx.send_if_modified(|current| {
        if current.is_uploading && progress > current.progress {
            current.progress = progress;
            true
        } else {
            false
        }
    });
}

/// Orchestrates single and batch uploads for one upload surface.
#[derive(Clone)]
pub struct Uploader {
    authorizer: Arc<dyn UploadAuthorizer>,
    transfer: Arc<dyn TransferExecutor>,
    notifier: Arc<dyn Notifier>,
    callbacks: UploaderCallbacks,
    max_file_size_bytes: u64,
    public_base_url: Option<String>,
    status: Arc<StatusChannel>,
}

impl Uploader {
    pub fn new(
        authorizer: Arc<dyn UploadAuthorizer>,
        transfer: Arc<dyn TransferExecutor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            authorizer,
            transfer,
            notifier,
            callbacks: UploaderCallbacks::default(),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            public_base_url: None,
            status: Arc::new(StatusChannel::new()),
        }
    }

    /// Build an uploader backed by the HTTP authorizer and transfer executor.
    pub fn from_config(config: &UploaderConfig) -> UploadResult<Self> {
        let authorizer = HttpUploadAuthorizer::from_config(config)?;
        let transfer = HttpTransferExecutor::from_config(config)?;

        Ok(Self::new(
            Arc::new(authorizer),
            Arc::new(transfer),
            Arc::new(TracingNotifier),
        )
        .with_max_file_size(config.max_file_size_bytes())
        .with_public_base_url(config.public_base_url().map(String::from)))
    }

    pub fn with_callbacks(mut self, callbacks: UploaderCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_max_file_size(mut self, max_file_size_bytes: u64) -> Self {
        self.max_file_size_bytes = max_file_size_bytes;
        self
    }

    pub fn with_public_base_url(mut self, public_base_url: Option<String>) -> Self {
        self.public_base_url = public_base_url;
        self
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn status(&self) -> UploadStatus {
        *self.status.tx.borrow()
    }

    pub fn is_uploading(&self) -> bool {
        self.status.tx.borrow().is_uploading
    }

    pub fn upload_progress(&self) -> u8 {
        self.status.tx.borrow().progress
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.status.tx.subscribe()
    }

    /// Validate a file without uploading it. A rejection is reported as an error
    /// notification.
    pub fn validate_file(&self, file: &UploadFile, max_size_bytes: Option<u64>) -> bool {
        let limit = max_size_bytes.unwrap_or(self.max_file_size_bytes);
        match check_file(file, limit) {
            Ok(()) => true,
            Err(err) => {
                err.log();
                self.notifier.notify(Notification::error(err.client_message()));
                false
            }
        }
    }

    /// Upload one file, optionally under an explicit name. Returns the storage
    /// reference on success.
    pub async fn upload_file(
        &self,
        file: UploadFile,
        name: Option<String>,
    ) -> Option<StorageReference> {
        self.upload(UploadRequest::with_name(file, name))
            .await
            .into_result()
    }

    /// Run one request to its terminal state and report the outcome.
    #[tracing::instrument(
        skip(self, request),
        fields(
            file_name = %request.file.name,
            size_bytes = request.file.size_bytes,
            operation = "upload"
        )
    )]
    pub async fn upload(&self, request: UploadRequest) -> UploadState {
        let state = self.execute(&request, true).await;

        match (state.result(), state.error_message()) {
            (Some(reference), _) => {
                self.callbacks.success(reference);
                self.notifier
                    .notify(Notification::success(UPLOAD_SUCCEEDED_MESSAGE));
            }
            (None, Some(message)) => {
                self.callbacks.error(message);
                self.notifier.notify(Notification::error(message));
            }
            (None, None) => {}
        }

        state
    }

    /// Upload every file, each through its own state machine. The returned outcomes
    /// are in submission order.
    #[tracing::instrument(skip(self, files), fields(file_count = files.len(), operation = "upload_batch"))]
    pub async fn upload_batch(&self, files: Vec<UploadFile>) -> BatchUploadState {
        if files.is_empty() {
            return BatchUploadState::default();
        }

        let total = files.len();
        let requests: Vec<UploadRequest> = files.into_iter().map(UploadRequest::new).collect();
        let guard = InFlightGuard::begin(self.status.clone(), 0);

        let mut pending: FuturesUnordered<_> = requests
            .iter()
            .enumerate()
            .map(|(index, request)| async move { (index, self.execute(request, false).await) })
            .collect();

        let mut finished: Vec<(usize, UploadState)> = Vec::with_capacity(total);
        while let Some((index, state)) = pending.next().await {
            finished.push((index, state));
            guard.advance((finished.len() * 100 / total) as u8);
        }
        drop(pending);
        drop(guard);

        finished.sort_by_key(|(index, _)| *index);
        let outcomes: Vec<FileOutcome> = finished
            .into_iter()
            .zip(requests.iter())
            .map(|((_, state), request)| match state.result() {
                Some(reference) => FileOutcome::Stored(reference.clone()),
                None => FileOutcome::Failed {
                    file_name: request.file.name.clone(),
                    message: state.error_message().unwrap_or_default().to_string(),
                },
            })
            .collect();
        let batch = BatchUploadState::new(outcomes);

        self.report_batch(&batch);
        batch
    }

    /// All-or-nothing batch upload: the references of every file when all of them
    /// were stored, otherwise an empty list.
    pub async fn upload_multiple_files(&self, files: Vec<UploadFile>) -> Vec<StorageReference> {
        self.upload_batch(files).await.into_all_or_nothing()
    }

    fn report_batch(&self, batch: &BatchUploadState) {
        for reference in batch.references() {
            self.callbacks.success(&reference);
        }

        let failures = batch.failures();
        if failures.is_empty() {
            tracing::info!(file_count = batch.len(), "Batch upload succeeded");
            self.notifier.notify(Notification::success(format!(
                "Uploaded {} images successfully",
                batch.len()
            )));
        } else {
            let message = format!(
                "Failed to upload {} of {} images",
                failures.len(),
                batch.len()
            );
            tracing::warn!(
                failed = failures.len(),
                file_count = batch.len(),
                "Batch upload finished with failures"
            );
            self.callbacks.error(&message);
            self.notifier.notify(Notification::error(message));
        }
    }

    /// Drive one request through the state machine. With `track` set, the in-flight
    /// flag and progress of this uploader follow the request.
    async fn execute(&self, request: &UploadRequest, track: bool) -> UploadState {
        let file = &request.file;
        let mut state = UploadState::new();

        state.begin_validation();
        if let Err(err) = check_file(file, self.max_file_size_bytes) {
            return fail(state, err);
        }

        state.begin_authorization();
        let guard = (track && state.phase().is_in_flight())
            .then(|| InFlightGuard::begin(self.status.clone(), state.progress_percent()));

        let grant = match self
            .authorizer
            .request_authorization(request.target_name(), &file.mime_type)
            .await
        {
            Ok(grant) => grant,
            Err(err) => return fail(state, err),
        };

        state.begin_transfer();
        let progress = guard.as_ref().map(|guard| {
            guard.advance(state.progress_percent());
            guard.progress_fn()
        });

        if let Err(err) = self
            .transfer
            .transfer(&grant.upload_url, file, progress)
            .await
        {
            return fail(state, err);
        }

        let reference =
            StorageReference::with_public_base(grant.storage_key, self.public_base_url.as_deref());
        tracing::info!(
            file_name = %file.name,
            storage_key = %reference.key,
            "Upload succeeded"
        );
        state.succeed(reference);
        if let Some(ref guard) = guard {
            guard.advance(state.progress_percent());
        }

        state
    }
}

fn fail(mut state: UploadState, err: UploadError) -> UploadState {
    tracing::debug!(phase = ?state.phase(), "Upload request failed");
    err.log();
    state.fail(err.client_message());
    state
}
