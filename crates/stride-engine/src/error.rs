//! Engine error types.

use stride_config::ConfigError;
use stride_core::errors::CoreError;
use stride_store::StoreError;
use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// Text-generation failures never appear here: the atomizer absorbs them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
