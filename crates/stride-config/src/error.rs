use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layer merge or extraction failed (bad TOML, wrong type in an env override).
    #[error("failed to load stride config: {0}")]
    Figment(#[from] figment::Error),

    #[error("{field} is out of range: {reason}")]
    InvalidValue { field: String, reason: String },
}
