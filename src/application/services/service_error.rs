use crate::application::ports::{AudioStoreError, RepositoryError};

use super::QueueError;

/// Request-level failures. Transcription failures are absent here: they are
/// recorded on the response row rather than surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid project key")]
    InvalidProjectKey,
    #[error("validation error: {0}")]
    Validation(String),
    #[error("monthly response quota exceeded ({used}/{limit})")]
    QuotaExceeded { used: u64, limit: u64 },
    #[error("origin not allowed for this project: {}", .0.as_deref().unwrap_or("<none>"))]
    DomainUnauthorized(Option<String>),
    #[error("plan does not include {0}")]
    PlanFeatureUnavailable(&'static str),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("transcription queue unavailable: {0}")]
    QueueUnavailable(#[from] QueueError),
    #[error("audio storage: {0}")]
    Storage(#[from] AudioStoreError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
