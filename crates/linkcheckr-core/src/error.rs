use thiserror::Error;

/// Application-wide error types for linkcheckr.
///
/// Only pipeline-level failures live here. A single link that cannot be
/// probed is never an error: see [`crate::probe::ProbeOutcome`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller input was missing or malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// The rendering engine failed to launch, navigate, or read the page.
    #[error("Render error: {0}")]
    RenderError(String),

    /// HTTP request failed (static rendering).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Short machine-readable name for the error kind, used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::RenderError(_) => "render_error",
            AppError::HttpError(_) => "http_error",
            AppError::NetworkError(_) => "network_error",
            AppError::Timeout(_) => "timeout",
            AppError::ConfigError(_) => "config_error",
            AppError::SerializationError(_) => "serialization_error",
            AppError::Generic(_) => "internal_error",
        }
    }

    /// Returns true if the error was caused by the caller rather than by
    /// the target page or the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}
