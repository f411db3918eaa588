use std::time::Duration;

use config::{Config, File, FileFormat};

use voxpulse::domain::AudioFormat;
use voxpulse::presentation::Environment;
use voxpulse::presentation::config::{
    Settings, StorageProviderSetting, TranscriptionProviderSetting,
};

fn from_toml(toml: &str) -> Settings {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_no_configuration_when_using_defaults_then_documented_values_apply() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.database.url, None);
    assert_eq!(settings.storage.provider, StorageProviderSetting::Local);
    assert_eq!(
        settings.transcription.provider,
        TranscriptionProviderSetting::OpenAi
    );
    assert_eq!(
        settings.transcription.attempt_timeout(),
        Duration::from_secs(30)
    );
    assert_eq!(settings.transcription.max_retries, 2);
    assert_eq!(settings.ingestion.max_audio_bytes(), 10 * 1024 * 1024);
    assert_eq!(settings.ingestion.max_text_chars, 5000);
    assert_eq!(settings.batch.pricing().assumed_duration_secs, 60);
}

#[test]
fn given_default_mime_list_when_mapping_formats_then_each_format_appears_once() {
    let formats = Settings::default().ingestion.allowed_formats();

    assert_eq!(
        formats,
        vec![
            AudioFormat::Webm,
            AudioFormat::Mp3,
            AudioFormat::Wav,
            AudioFormat::Mp4,
            AudioFormat::Ogg,
        ]
    );
}

#[test]
fn given_partial_toml_when_deserializing_then_missing_keys_keep_defaults() {
    let settings = from_toml(
        r#"
        [transcription]
        provider = "azure"
        base_url = "https://contoso.openai.azure.com"
        azure_deployment = "whisper"
        timeout_secs = 10

        [storage]
        provider = "memory"

        [ingestion]
        allowed_mime_types = ["audio/webm", "audio/flac"]
        "#,
    );

    assert_eq!(
        settings.transcription.provider,
        TranscriptionProviderSetting::Azure
    );
    assert_eq!(
        settings.transcription.attempt_timeout(),
        Duration::from_secs(10)
    );
    assert_eq!(settings.transcription.model, "whisper-1");
    assert_eq!(settings.storage.provider, StorageProviderSetting::Memory);
    assert_eq!(
        settings.ingestion.allowed_formats(),
        vec![AudioFormat::Webm]
    );
    assert_eq!(settings.batch.queue_capacity, 64);
}

#[test]
fn given_environment_names_when_parsing_then_aliases_are_accepted() {
    assert_eq!("development".parse::<Environment>(), Ok(Environment::Local));
    assert_eq!(" PROD ".parse::<Environment>(), Ok(Environment::Prod));
    assert_eq!(Environment::Test.as_str(), "test");
    assert!("staging".parse::<Environment>().is_err());
}

#[test]
fn given_environment_when_selecting_overlay_then_file_name_and_production_flag_follow() {
    assert_eq!(Environment::default(), Environment::Local);
    assert_eq!(Environment::Prod.config_file(), "appsettings.prod");
    assert!(Environment::Prod.is_production());
    assert!(!Environment::Local.is_production());
}
