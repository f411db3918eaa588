use async_trait::async_trait;

use crate::application::ports::{
    EngineTranscript, TranscriptionEngine, TranscriptionError, TranscriptionRequest,
};

use super::whisper_protocol::{read_transcript, request_failed, transcription_form};

pub struct AzureWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AzureWhisperEngine {
    pub fn new(base_url: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        let endpoint = format!(
            "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for AzureWhisperEngine {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest<'_>,
    ) -> Result<EngineTranscript, TranscriptionError> {
        let form = transcription_form(request)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            bytes = request.audio.len(),
            "Sending audio to Azure OpenAI Whisper"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(request_failed)?;

        let transcript = read_transcript(response).await?;

        tracing::info!(
            chars = transcript.text.chars().count(),
            "Azure OpenAI Whisper transcription completed"
        );

        Ok(transcript)
    }
}
