use bytes::Bytes;

use crate::domain::AudioPath;

/// Durable storage for raw audio kept for a later transcription attempt.
#[async_trait::async_trait]
pub trait AudioStore: Send + Sync {
    async fn store(&self, path: &AudioPath, data: Bytes) -> Result<u64, AudioStoreError>;

    async fn fetch(&self, path: &AudioPath) -> Result<Bytes, AudioStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
