use std::time::Duration;

use async_trait::async_trait;

use crate::domain::AudioFormat;

/// One call to an external speech-to-text provider.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest<'_>,
    ) -> Result<EngineTranscript, TranscriptionError>;
}

#[derive(Debug, Clone, Copy)]
pub struct TranscriptionRequest<'a> {
    pub audio: &'a [u8],
    pub format: AudioFormat,
    /// Short language code already normalized by the caller.
    pub language: &'a str,
}

/// Raw provider output; `language` may be a long-form name.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineTranscript {
    pub text: String,
    pub language: Option<String>,
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("provider rejected request: {0}")]
    BadRequest(String),
    #[error("provider authentication failed: {0}")]
    Unauthorized(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider rate limited: {0}")]
    RateLimited(String),
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}

impl TranscriptionError {
    /// Errors that another attempt cannot fix.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            TranscriptionError::BadRequest(_)
                | TranscriptionError::Unauthorized(_)
                | TranscriptionError::UnsupportedFormat(_)
        )
    }

    pub fn is_transient(&self) -> bool {
        !self.is_permanent()
    }
}
