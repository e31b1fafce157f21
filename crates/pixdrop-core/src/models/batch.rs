//! Batch upload outcomes.

use serde::Serialize;

use super::StorageReference;

/// Terminal outcome of one file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Stored(StorageReference),
    Failed { file_name: String, message: String },
}

impl FileOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, FileOutcome::Stored(_))
    }
}

/// Per-file outcomes of a batch, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchUploadState {
    outcomes: Vec<FileOutcome>,
}

impl BatchUploadState {
    pub fn new(outcomes: Vec<FileOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_stored)
    }

    /// References of the files that were stored, in submission order.
    pub fn references(&self) -> Vec<StorageReference> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Stored(reference) => Some(reference.clone()),
                FileOutcome::Failed { .. } => None,
            })
            .collect()
    }

    /// `(file_name, message)` of every failed file, in submission order.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { file_name, message } => {
                    Some((file_name.as_str(), message.as_str()))
                }
                FileOutcome::Stored(_) => None,
            })
            .collect()
    }

    /// All-or-nothing view: every reference when the whole batch succeeded,
    /// otherwise an empty list.
    pub fn into_all_or_nothing(self) -> Vec<StorageReference> {
        if self.all_succeeded() {
            self.references()
        } else {
            Vec::new()
        }
    }
}
