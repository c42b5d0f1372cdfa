use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreatScopeError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Request error: {}", .0.as_deref().unwrap_or("request failed"))]
    RequestError(Option<String>),

    #[error("Missing data: {0}")]
    MissingDataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File error: {path:?} - {message}")]
    FileError {
        path: PathBuf,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl ThreatScopeError {
    /// Build a request error carrying a message
    pub fn request(message: impl Into<String>) -> Self {
        ThreatScopeError::RequestError(Some(message.into()))
    }
}

impl From<anyhow::Error> for ThreatScopeError {
    fn from(error: anyhow::Error) -> Self {
        ThreatScopeError::UnexpectedError(format!("{:#}", error))
    }
}

pub type ThreatScopeResult<T> = std::result::Result<T, ThreatScopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_message() {
        let with_message = ThreatScopeError::request("503 Service Unavailable");
        assert_eq!(with_message.to_string(), "Request error: 503 Service Unavailable");

        let without_message = ThreatScopeError::RequestError(None);
        assert_eq!(without_message.to_string(), "Request error: request failed");
    }
}
