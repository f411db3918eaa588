use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{TranscriptionProviderSetting, TranscriptionSettings};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &TranscriptionSettings,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        let api_key = settings.api_key.clone().ok_or_else(|| {
            TranscriptionError::Unauthorized("transcription.api_key is not configured".to_string())
        })?;

        match settings.provider {
            TranscriptionProviderSetting::OpenAi => Ok(Arc::new(OpenAiWhisperEngine::new(
                api_key,
                settings.base_url.clone(),
                Some(settings.model.clone()),
            ))),
            TranscriptionProviderSetting::Azure => {
                let base_url = settings.base_url.as_deref().ok_or_else(|| {
                    TranscriptionError::BadRequest(
                        "transcription.base_url required for azure".to_string(),
                    )
                })?;
                let deployment = settings.azure_deployment.as_deref().ok_or_else(|| {
                    TranscriptionError::BadRequest(
                        "transcription.azure_deployment required for azure".to_string(),
                    )
                })?;
                Ok(Arc::new(AzureWhisperEngine::new(
                    base_url,
                    deployment,
                    &api_key,
                    &settings.azure_api_version,
                )))
            }
        }
    }
}
