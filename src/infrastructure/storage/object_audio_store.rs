use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use tracing::instrument;

use crate::application::ports::{AudioStore, AudioStoreError};
use crate::domain::AudioPath;

/// [`AudioStore`] over any `object_store` backend.
pub struct ObjectAudioStore {
    inner: Arc<dyn ObjectStore>,
    backend: &'static str,
}

impl ObjectAudioStore {
    pub fn new(inner: Arc<dyn ObjectStore>, backend: &'static str) -> Self {
        Self { inner, backend }
    }

    /// Files under `base_path`, created if missing.
    pub fn local(base_path: PathBuf) -> Result<Self, AudioStoreError> {
        std::fs::create_dir_all(&base_path)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| AudioStoreError::UploadFailed(e.to_string()))?;
        Ok(Self::new(Arc::new(fs), "local"))
    }

    pub fn azure(account: &str, access_key: &str, container: &str) -> Result<Self, AudioStoreError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| AudioStoreError::UploadFailed(e.to_string()))?;
        Ok(Self::new(Arc::new(store), "azure"))
    }

    /// Volatile store, lost on restart.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory")
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

fn missing_or(e: object_store::Error, other: fn(String) -> AudioStoreError) -> AudioStoreError {
    match e {
        object_store::Error::NotFound { path, .. } => AudioStoreError::NotFound(path),
        e => other(e.to_string()),
    }
}

#[async_trait::async_trait]
impl AudioStore for ObjectAudioStore {
    #[instrument(skip(self, data), fields(backend = self.backend, path = %path, bytes = data.len()))]
    async fn store(&self, path: &AudioPath, data: Bytes) -> Result<u64, AudioStoreError> {
        let size = data.len() as u64;
        self.inner
            .put(&StorePath::from(path.as_str()), PutPayload::from(data))
            .await
            .map_err(|e| AudioStoreError::UploadFailed(e.to_string()))?;
        Ok(size)
    }

    #[instrument(skip(self), fields(backend = self.backend, path = %path))]
    async fn fetch(&self, path: &AudioPath) -> Result<Bytes, AudioStoreError> {
        let result = self
            .inner
            .get(&StorePath::from(path.as_str()))
            .await
            .map_err(|e| missing_or(e, AudioStoreError::DownloadFailed))?;

        result
            .bytes()
            .await
            .map_err(|e| AudioStoreError::DownloadFailed(e.to_string()))
    }
}
