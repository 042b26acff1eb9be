//! Shared HTTP response helpers for provider clients.

use crate::error::GenerationError;

/// Map a non-success status to [`GenerationError::Api`] with the response body.
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, GenerationError> {
    if !resp.status().is_success() {
        return Err(GenerationError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}
