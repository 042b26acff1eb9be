//! Store error types for stride-store.

use stride_core::errors::CoreError;
use thiserror::Error;

/// Errors from ledger and record-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No task with this id exists in the ledger.
    #[error("task not found: {id}")]
    NotFound { id: String },

    /// An update or delete was issued without an explicit user request.
    /// Nothing was changed and no history was appended.
    #[error("{operation} of task {id} requires an explicit user request")]
    ExplicitRequired { operation: &'static str, id: String },

    /// A child task referenced a parent that does not exist.
    #[error("parent task not found: {id}")]
    ParentNotFound { id: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Id generation, state transitions, or validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}
