use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{AudioStore, AudioStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::object_audio_store::ObjectAudioStore;

pub struct AudioStoreFactory;

impl AudioStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn AudioStore>, AudioStoreError> {
        let store = match settings.provider {
            StorageProviderSetting::Local => {
                ObjectAudioStore::local(PathBuf::from(&settings.local_path))?
            }
            StorageProviderSetting::Memory => ObjectAudioStore::in_memory(),
            StorageProviderSetting::Azure => {
                let account = settings.azure_account.as_deref().ok_or_else(|| {
                    AudioStoreError::UploadFailed("azure_account required".into())
                })?;
                let key = settings.azure_access_key.as_deref().ok_or_else(|| {
                    AudioStoreError::UploadFailed("azure_access_key required".into())
                })?;
                let container = settings.azure_container.as_deref().ok_or_else(|| {
                    AudioStoreError::UploadFailed("azure_container required".into())
                })?;
                ObjectAudioStore::azure(account, key, container)?
            }
        };

        tracing::info!(backend = store.backend(), "Audio store ready");
        Ok(Arc::new(store))
    }
}
