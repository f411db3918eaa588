use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    EngineTranscript, TranscriptionEngine, TranscriptionError, TranscriptionRequest,
};
use crate::domain::{AudioFormat, TranscribedAudio, language};

use super::RetryPolicy;

/// Wraps the speech-to-text engine with a per-attempt timeout, bounded retries for
/// transient failures and language normalization on both sides of the call.
pub struct TranscriptionService {
    engine: Arc<dyn TranscriptionEngine>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    default_language: String,
}

impl TranscriptionService {
    pub fn new(
        engine: Arc<dyn TranscriptionEngine>,
        policy: RetryPolicy,
        attempt_timeout: Duration,
        default_language: String,
    ) -> Self {
        Self {
            engine,
            policy,
            attempt_timeout,
            default_language,
        }
    }

    #[tracing::instrument(skip(self, audio), fields(bytes = audio.len(), format = ?format))]
    pub async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
        language_hint: Option<&str>,
    ) -> Result<TranscribedAudio, TranscriptionError> {
        let language = language::normalize_hint(language_hint, &self.default_language);
        let request = TranscriptionRequest {
            audio,
            format,
            language: &language,
        };

        let engine = self.engine.as_ref();
        let request = &request;
        let timeout = self.attempt_timeout;

        let transcript = self
            .policy
            .run(
                move |attempt| async move {
                    tracing::debug!(attempt, "Calling transcription provider");
                    match tokio::time::timeout(timeout, engine.transcribe(request)).await {
                        Ok(result) => result,
                        Err(_) => Err(TranscriptionError::Timeout(timeout)),
                    }
                },
                TranscriptionError::is_transient,
            )
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    permanent = e.is_permanent(),
                    "Transcription failed"
                );
            })?;

        Ok(Self::normalize(transcript, &language))
    }

    fn normalize(transcript: EngineTranscript, requested_language: &str) -> TranscribedAudio {
        let language = transcript
            .language
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(language::normalize_detected)
            .unwrap_or_else(|| requested_language.to_string());

        TranscribedAudio {
            text: transcript.text.trim().to_string(),
            language: Some(language),
            duration_seconds: transcript
                .duration_seconds
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d.round() as u32),
        }
    }
}
