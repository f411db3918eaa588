use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::domain::{AudioFormat, TranscriptionPricing};

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub transcription: TranscriptionSettings,
    pub ingestion: IngestionSettings,
    pub batch: BatchSettings,
    pub tenants: TenantSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.toml`, `appsettings.{environment}.toml` and `APP_*`
    /// environment variables, later sources winning.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name(&environment.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("ingestion.allowed_mime_types")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Without a URL the service runs on in-memory repositories.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Local,
    Azure,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
    pub azure_container: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            local_path: "./data/audio".to_string(),
            azure_account: None,
            azure_access_key: None,
            azure_container: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub azure_deployment: Option<String>,
    pub azure_api_version: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub jitter_ms: u64,
    pub default_language: String,
}

impl TranscriptionSettings {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            provider: TranscriptionProviderSetting::OpenAi,
            api_key: None,
            base_url: None,
            model: "whisper-1".to_string(),
            azure_deployment: None,
            azure_api_version: "2024-06-01".to_string(),
            timeout_secs: 30,
            max_retries: 2,
            base_backoff_ms: 2000,
            jitter_ms: 1000,
            default_language: "es".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    pub max_audio_size_mb: usize,
    pub allowed_mime_types: Vec<String>,
    pub max_text_chars: usize,
}

impl IngestionSettings {
    pub fn max_audio_bytes(&self) -> usize {
        self.max_audio_size_mb * 1024 * 1024
    }

    /// Configured MIME types that map to a known audio format.
    pub fn allowed_formats(&self) -> Vec<AudioFormat> {
        let mut formats: Vec<AudioFormat> = self
            .allowed_mime_types
            .iter()
            .filter_map(|mime| AudioFormat::from_mime(mime))
            .collect();
        formats.dedup();
        formats
    }
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            max_audio_size_mb: 10,
            allowed_mime_types: [
                "audio/webm",
                "audio/mpeg",
                "audio/mp3",
                "audio/wav",
                "audio/mp4",
                "audio/ogg",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_text_chars: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub queue_capacity: usize,
    pub seconds_per_item: u32,
    pub assumed_duration_secs: u32,
    pub cost_per_minute_usd: f64,
}

impl BatchSettings {
    pub fn pricing(&self) -> TranscriptionPricing {
        TranscriptionPricing {
            cost_per_minute_usd: self.cost_per_minute_usd,
            assumed_duration_secs: self.assumed_duration_secs,
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            seconds_per_item: 2,
            assumed_duration_secs: 60,
            cost_per_minute_usd: 0.006,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TenantSettings {
    pub cache_ttl_secs: u64,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self { cache_ttl_secs: 60 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub enable_json: bool,
}
