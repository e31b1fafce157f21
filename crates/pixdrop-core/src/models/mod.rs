//! Data models for the upload pipeline
//!
//! Each sub-module covers one concern: the candidate file, the presigned
//! authorization exchanged with the backend, the per-request state machine and
//! the batch outcome list.

mod batch;
mod file;
pub mod presigned_upload;
mod state;
mod storage;

pub use batch::*;
pub use file::*;
pub use presigned_upload::*;
pub use state::*;
pub use storage::*;
