use bytes::Bytes;

use voxpulse::application::ports::{AudioStore, AudioStoreError};
use voxpulse::domain::{AudioFormat, AudioPath, ProjectId};
use voxpulse::infrastructure::storage::{AudioStoreFactory, ObjectAudioStore};
use voxpulse::presentation::config::{StorageProviderSetting, StorageSettings};

fn create_test_store() -> (tempfile::TempDir, ObjectAudioStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = ObjectAudioStore::local(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

fn sample_path() -> AudioPath {
    AudioPath::for_session(&ProjectId::new(), "sess-1", 1_700_000_000_000, AudioFormat::Webm)
}

#[tokio::test]
async fn given_audio_bytes_when_storing_locally_then_file_is_persisted_under_project_dir() {
    let (dir, store) = create_test_store();
    let path = sample_path();

    let size = store
        .store(&path, Bytes::from_static(b"hello audio"))
        .await
        .unwrap();

    assert_eq!(size, 11);
    assert_eq!(std::fs::read(dir.path().join(path.as_str())).unwrap(), b"hello audio");
}

#[tokio::test]
async fn given_stored_audio_when_fetching_then_bytes_match_original() {
    let (_dir, store) = create_test_store();
    let path = sample_path();
    store
        .store(&path, Bytes::from_static(b"test content"))
        .await
        .unwrap();

    let fetched = store.fetch(&path).await.unwrap();

    assert_eq!(fetched, Bytes::from_static(b"test content"));
}

#[tokio::test]
async fn given_missing_audio_when_fetching_then_not_found() {
    let (_dir, store) = create_test_store();

    let result = store.fetch(&sample_path()).await;

    assert!(matches!(result, Err(AudioStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_memory_provider_when_creating_from_settings_then_store_round_trips() {
    let settings = StorageSettings {
        provider: StorageProviderSetting::Memory,
        ..StorageSettings::default()
    };
    let store = AudioStoreFactory::create(&settings).unwrap();
    let path = sample_path();

    store
        .store(&path, Bytes::from_static(b"in memory"))
        .await
        .unwrap();

    assert_eq!(
        store.fetch(&path).await.unwrap(),
        Bytes::from_static(b"in memory")
    );
}

#[test]
fn given_azure_provider_without_account_when_creating_then_error() {
    let settings = StorageSettings {
        provider: StorageProviderSetting::Azure,
        ..StorageSettings::default()
    };

    assert!(AudioStoreFactory::create(&settings).is_err());
}
