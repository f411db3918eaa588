mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    BatchSettings, DatabaseSettings, IngestionSettings, LoggingSettings, ServerSettings,
    Settings, StorageProviderSetting, StorageSettings, TenantSettings,
    TranscriptionProviderSetting, TranscriptionSettings,
};
