use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Busy: {0}")]
    Busy(String),
    #[error("A generation request is already in flight")]
    GenerationInFlight,
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Generation error: {0}")]
    GenerationError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Timed out after {0}ms")]
    Timeout(u64),
    #[error("Platform error: {0}")]
    PlatformError(String),
}

impl AvatarError {
    /// Failures raised by the generation service itself rather than by a caller or platform.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            AvatarError::GenerationError(_)
                | AvatarError::RequestError(_)
                | AvatarError::ResponseError(_)
                | AvatarError::SerializationError(_)
                | AvatarError::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AvatarError>;
