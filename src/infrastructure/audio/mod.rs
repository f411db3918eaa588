mod azure_whisper_engine;
mod openai_whisper_engine;
mod transcription_engine_factory;
mod whisper_protocol;

pub use azure_whisper_engine::AzureWhisperEngine;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;
