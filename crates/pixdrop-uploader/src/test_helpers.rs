//! In-crate fakes for the authorization and transfer ports and a recording notifier.

use async_trait::async_trait;
use pixdrop_api_client::{ProgressFn, TransferExecutor, UploadAuthorizer};
use pixdrop_core::{AuthorizationGrant, UploadError, UploadFile, UploadResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::notify::{Notification, NotificationLevel, Notifier};
use crate::uploader::Uploader;

#[derive(Default)]
pub struct FakeAuthorizer {
    calls: Mutex<Vec<(String, String)>>,
    failure: Mutex<Option<UploadError>>,
    key_by_name: Mutex<bool>,
}

impl FakeAuthorizer {
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_with(&self, err: UploadError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    /// Derive url and key from the filename instead of the fixed `k1` grant.
    pub fn key_by_name(&self) {
        *self.key_by_name.lock().unwrap() = true;
    }
}

#[async_trait]
impl UploadAuthorizer for FakeAuthorizer {
    async fn request_authorization(
        &self,
        filename: &str,
        content_type: &str,
    ) -> UploadResult<AuthorizationGrant> {
        self.calls
            .lock()
            .unwrap()
            .push((filename.to_string(), content_type.to_string()));

        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }

        if *self.key_by_name.lock().unwrap() {
            Ok(AuthorizationGrant {
                upload_url: format!("https://store/uploads/{}", filename),
                storage_key: format!("uploads/{}", filename),
            })
        } else {
            Ok(AuthorizationGrant {
                upload_url: "https://store/x".to_string(),
                storage_key: "k1".to_string(),
            })
        }
    }
}

/// Releases a held transfer.
pub struct Gate(Arc<Notify>);

impl Gate {
    pub fn release(&self) {
        self.0.notify_one();
    }
}

#[derive(Default)]
pub struct FakeTransfer {
    urls: Mutex<Vec<String>>,
    failure: Mutex<Option<UploadError>>,
    failures_by_url: Mutex<HashMap<String, UploadError>>,
    held: Mutex<Option<Arc<Notify>>>,
    held_by_url: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeTransfer {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn fail_with(&self, err: UploadError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn fail_for(&self, url: &str, err: UploadError) {
        self.failures_by_url
            .lock()
            .unwrap()
            .insert(url.to_string(), err);
    }

    /// Block every transfer until the returned gate is released.
    pub fn hold(&self) -> Gate {
        let notify = Arc::new(Notify::new());
        *self.held.lock().unwrap() = Some(notify.clone());
        Gate(notify)
    }

    /// Block only the transfer to `url` until the returned gate is released.
    pub fn hold_url(&self, url: &str) -> Gate {
        let notify = Arc::new(Notify::new());
        self.held_by_url
            .lock()
            .unwrap()
            .insert(url.to_string(), notify.clone());
        Gate(notify)
    }
}

#[async_trait]
impl TransferExecutor for FakeTransfer {
    async fn transfer(
        &self,
        upload_url: &str,
        file: &UploadFile,
        progress: Option<ProgressFn>,
    ) -> UploadResult<()> {
        self.urls.lock().unwrap().push(upload_url.to_string());

        let held = self
            .held
            .lock()
            .unwrap()
            .clone()
            .or_else(|| self.held_by_url.lock().unwrap().get(upload_url).cloned());
        if let Some(notify) = held {
            notify.notified().await;
        }

        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        if let Some(err) = self.failures_by_url.lock().unwrap().get(upload_url).cloned() {
            return Err(err);
        }

        if let Some(progress) = progress {
            progress(file.size_bytes, file.size_bytes);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn levels(&self) -> Vec<NotificationLevel> {
        self.events.lock().unwrap().iter().map(|n| n.level).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.events.lock().unwrap().push(notification);
    }
}

pub struct Harness {
    pub authorizer: Arc<FakeAuthorizer>,
    pub transfer: Arc<FakeTransfer>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            authorizer: Arc::new(FakeAuthorizer::default()),
            transfer: Arc::new(FakeTransfer::default()),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub fn uploader(&self) -> Uploader {
        Uploader::new(
            self.authorizer.clone(),
            self.transfer.clone(),
            self.notifier.clone(),
        )
    }
}
