//! Generation error types.

use thiserror::Error;

/// Errors a text-generation backend can report.
///
/// Callers in the decision core never branch on the variant: any error means
/// "use the deterministic fallback". The variants exist for logging.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The selected provider is missing required settings, or disabled.
    #[error("generation provider '{provider}' is not configured")]
    NotConfigured { provider: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered, but not with the requested structure.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request did not finish within its time budget.
    #[error("generation timed out after {secs}s")]
    Timeout { secs: u64 },
}
