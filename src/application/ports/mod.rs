mod audio_store;
mod batch_repository;
mod project_repository;
mod repository_error;
mod response_repository;
mod transcription_engine;
mod usage_repository;

pub use audio_store::{AudioStore, AudioStoreError};
pub use batch_repository::BatchRepository;
pub use project_repository::ProjectRepository;
pub use repository_error::RepositoryError;
pub use response_repository::ResponseRepository;
pub use transcription_engine::{
    EngineTranscript, TranscriptionEngine, TranscriptionError, TranscriptionRequest,
};
pub use usage_repository::UsageRepository;
