use async_trait::async_trait;

use crate::application::ports::{
    EngineTranscript, TranscriptionEngine, TranscriptionError, TranscriptionRequest,
};

use super::whisper_protocol::{read_transcript, request_failed, transcription_form};

pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest<'_>,
    ) -> Result<EngineTranscript, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let form = transcription_form(request)?.text("model", self.model.clone());

        tracing::debug!(
            model = %self.model,
            bytes = request.audio.len(),
            language = request.language,
            "Sending audio to OpenAI Whisper API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(request_failed)?;

        let transcript = read_transcript(response).await?;

        tracing::info!(
            chars = transcript.text.chars().count(),
            duration = ?transcript.duration_seconds,
            "OpenAI Whisper transcription completed"
        );

        Ok(transcript)
    }
}
