use thiserror::Error;

/// Top-level error type for request validation and configuration.
#[derive(Error, Debug)]
pub enum MemlinkError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Query rejected: contains disallowed keyword '{keyword}'")]
    ForbiddenKeyword { keyword: &'static str },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemlinkError {
    /// Whether the caller is at fault (maps to a 400-class response).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::ForbiddenKeyword { .. } | Self::UnknownPreset(_)
        )
    }
}

impl From<config::ConfigError> for MemlinkError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
