//! Errors shared by every Stride crate.
//!
//! `StoreError`, `GenerationError` and `ConfigError` live next to the code that
//! raises them; the `stride` binary folds everything into `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A status change the record's state machine does not allow.
    #[error("cannot move {kind} {id} from {from} to {to}")]
    InvalidTransition {
        kind: &'static str,
        id: String,
        from: String,
        to: String,
    },

    /// Input outside the accepted range or format.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
