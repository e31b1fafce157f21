//! Per-request upload state machine.
//!
//! `Idle -> Validating -> RequestingAuthorization -> Transferring -> Succeeded`,
//! with `Failed` reachable from every non-terminal phase after `Idle`.

use serde::Serialize;

use super::StorageReference;

/// Progress reported once the authorization request is in flight
pub const PROGRESS_AUTHORIZING: u8 = 10;
/// Progress at the start of the byte transfer
pub const PROGRESS_TRANSFER_START: u8 = 20;
/// Highest progress reported before the storage endpoint confirms the transfer
pub const PROGRESS_TRANSFER_END: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    Idle,
    Validating,
    RequestingAuthorization,
    Transferring,
    Succeeded,
    Failed,
}

impl UploadPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadPhase::Succeeded | UploadPhase::Failed)
    }

    /// Phases during which a network round trip is outstanding.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            UploadPhase::RequestingAuthorization | UploadPhase::Transferring
        )
    }
}

/// State of one upload request, owned by the orchestrator handling it.
///
/// Fields are only changed through the transition methods, so a terminal state
/// always carries exactly one of `result` and `error_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadState {
    phase: UploadPhase,
    progress_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<StorageReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl Default for UploadState {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadState {
    pub fn new() -> Self {
        Self {
            phase: UploadPhase::Idle,
            progress_percent: 0,
            result: None,
            error_message: None,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn result(&self) -> Option<&StorageReference> {
        self.result.as_ref()
    }

    pub fn result_key(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.key.as_str())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn into_result(self) -> Option<StorageReference> {
        self.result
    }

    pub fn begin_validation(&mut self) {
        debug_assert_eq!(self.phase, UploadPhase::Idle);
        self.phase = UploadPhase::Validating;
        self.progress_percent = 0;
    }

    pub fn begin_authorization(&mut self) {
        debug_assert_eq!(self.phase, UploadPhase::Validating);
        self.phase = UploadPhase::RequestingAuthorization;
        self.progress_percent = PROGRESS_AUTHORIZING;
    }

    pub fn begin_transfer(&mut self) {
        debug_assert_eq!(self.phase, UploadPhase::RequestingAuthorization);
        self.phase = UploadPhase::Transferring;
        self.progress_percent = PROGRESS_TRANSFER_START;
    }

    pub fn succeed(&mut self, reference: StorageReference) {
        debug_assert_eq!(self.phase, UploadPhase::Transferring);
        self.phase = UploadPhase::Succeeded;
        self.progress_percent = 100;
        self.result = Some(reference);
        self.error_message = None;
    }

    /// Move to `Failed`. Progress is not retained.
    pub fn fail(&mut self, message: impl Into<String>) {
        debug_assert!(!self.phase.is_terminal());
        self.phase = UploadPhase::Failed;
        self.progress_percent = 0;
        self.result = None;
        self.error_message = Some(message.into());
    }
}

/// Map `sent / total` bytes onto `PROGRESS_TRANSFER_START..=PROGRESS_TRANSFER_END`.
pub fn transfer_percent(sent: u64, total: u64) -> u8 {
    let span = u64::from(PROGRESS_TRANSFER_END - PROGRESS_TRANSFER_START);
    let scaled = if total == 0 {
        span
    } else {
        sent.min(total).saturating_mul(span) / total
    };
    PROGRESS_TRANSFER_START + scaled as u8
}

/// Reactive view of an orchestrator, read by UI collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadStatus {
    pub is_uploading: bool,
    pub progress: u8,
}
