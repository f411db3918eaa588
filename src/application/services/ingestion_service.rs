use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use crate::application::ports::{AudioStore, ResponseRepository};
use crate::domain::{
    AudioFormat, AudioPath, AudioPointer, Metadata, Response, ResponseId, ResponseKey,
    ResponseStatus, TranscriptionMode, enrich_metadata,
};

use super::{
    QuotaResolver, ServiceError, TenantContext, TranscriptionQueue, TranscriptionService, WorkerJob,
    check_duration, validate_language, validate_question_id, validate_session_id,
};

/// Upload limits applied before any state is persisted.
#[derive(Debug, Clone)]
pub struct IngestionLimits {
    pub max_audio_bytes: usize,
    pub allowed_formats: Vec<AudioFormat>,
}

impl Default for IngestionLimits {
    fn default() -> Self {
        Self {
            max_audio_bytes: 10 * 1024 * 1024,
            allowed_formats: vec![
                AudioFormat::Webm,
                AudioFormat::Mp3,
                AudioFormat::Wav,
                AudioFormat::Mp4,
                AudioFormat::Ogg,
            ],
        }
    }
}

/// A recorded answer as received from the widget.
#[derive(Debug, Clone)]
pub struct AudioSubmission {
    pub audio: Bytes,
    pub content_type: String,
    pub session_id: String,
    pub question_id: Option<String>,
    pub duration_seconds: Option<u32>,
    pub language: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub response_id: ResponseId,
    pub status: ResponseStatus,
    pub transcript: Option<String>,
    /// User-facing explanation when the answer was accepted but not transcribed.
    pub message: Option<String>,
}

pub struct IngestionService {
    responses: Arc<dyn ResponseRepository>,
    audio_store: Arc<dyn AudioStore>,
    transcription: Arc<TranscriptionService>,
    quota: Arc<QuotaResolver>,
    queue: TranscriptionQueue,
    limits: IngestionLimits,
}

impl IngestionService {
    pub fn new(
        responses: Arc<dyn ResponseRepository>,
        audio_store: Arc<dyn AudioStore>,
        transcription: Arc<TranscriptionService>,
        quota: Arc<QuotaResolver>,
        queue: TranscriptionQueue,
        limits: IngestionLimits,
    ) -> Self {
        Self {
            responses,
            audio_store,
            transcription,
            quota,
            queue,
            limits,
        }
    }

    fn validate(
        &self,
        tenant: &TenantContext,
        submission: &AudioSubmission,
    ) -> Result<AudioFormat, ServiceError> {
        if submission.audio.is_empty() {
            return Err(ServiceError::Validation("No audio file provided".to_string()));
        }
        if submission.audio.len() > self.limits.max_audio_bytes {
            return Err(ServiceError::Validation(format!(
                "Audio file too large. Maximum size: {} MB",
                self.limits.max_audio_bytes / (1024 * 1024)
            )));
        }
        let format = AudioFormat::from_mime(&submission.content_type)
            .filter(|f| self.limits.allowed_formats.contains(f))
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "Unsupported audio format: {}",
                    submission.content_type
                ))
            })?;

        validate_session_id(&submission.session_id)?;
        validate_question_id(submission.question_id.as_deref())?;
        validate_language(submission.language.as_deref(), tenant.quota.plan)?;
        if submission.duration_seconds == Some(0) {
            return Err(ServiceError::Validation(
                "duration_seconds must be positive".to_string(),
            ));
        }
        check_duration(submission.duration_seconds, tenant.quota.plan)?;
        tenant.quota.ensure_available()?;

        Ok(format)
    }

    /// Transcribes the answer on receipt. Provider failure is not an error for the
    /// caller: the row is written as `failed` with the audio retained when possible.
    #[tracing::instrument(
        skip(self, tenant, submission),
        fields(
            project_id = %tenant.project.id,
            session_id = %submission.session_id,
            bytes = submission.audio.len()
        )
    )]
    pub async fn ingest(
        &self,
        tenant: &TenantContext,
        submission: AudioSubmission,
    ) -> Result<IngestOutcome, ServiceError> {
        let format = self.validate(tenant, &submission)?;

        let metadata = enrich_metadata(submission.metadata.clone(), tenant.origin.as_deref());
        let key = ResponseKey::new(
            tenant.project.id,
            submission.session_id.clone(),
            submission.question_id.clone(),
        );
        let language_hint = submission
            .language
            .as_deref()
            .or(tenant.project.language.as_deref());

        let transcribed = self
            .transcription
            .transcribe(&submission.audio, format, language_hint)
            .await;

        match transcribed {
            Ok(result) => {
                let response = Response::transcribed_voice(
                    key,
                    submission.audio.len() as u64,
                    result,
                    metadata,
                );
                self.responses.insert(&response).await?;

                if let Err(e) = self.quota.record_completion(&tenant.quota).await {
                    tracing::error!(
                        error = %e,
                        response_id = %response.id,
                        "Failed to increment usage"
                    );
                }

                tracing::info!(response_id = %response.id, "Voice response transcribed");

                Ok(IngestOutcome {
                    response_id: response.id,
                    status: ResponseStatus::Completed,
                    transcript: response.transcript,
                    message: None,
                })
            }
            Err(transcription_error) => {
                let path = AudioPath::for_session(
                    &tenant.project.id,
                    &submission.session_id,
                    Utc::now().timestamp_millis(),
                    format,
                );

                let (audio, size, error_message, message) =
                    match self.audio_store.store(&path, submission.audio.clone()).await {
                        Ok(size) => (
                            AudioPointer::Stored(path),
                            size,
                            format!(
                                "Transcription failed, audio retained for retry: {}",
                                transcription_error
                            ),
                            "Transcription failed. Audio saved for retry.",
                        ),
                        Err(storage_error) => {
                            tracing::error!(
                                error = %storage_error,
                                "Fallback audio storage failed"
                            );
                            (
                                AudioPointer::Lost,
                                submission.audio.len() as u64,
                                format!(
                                    "Transcription and storage both failed: {}; {}",
                                    transcription_error, storage_error
                                ),
                                "Transcription failed. Please try again.",
                            )
                        }
                    };

                let response = Response::failed_voice(
                    key,
                    audio,
                    size,
                    submission.duration_seconds,
                    metadata,
                    error_message,
                );
                self.responses.insert(&response).await?;

                tracing::warn!(
                    response_id = %response.id,
                    audio = %response.audio.as_str(),
                    "Voice response stored as failed"
                );

                Ok(IngestOutcome {
                    response_id: response.id,
                    status: ResponseStatus::Failed,
                    transcript: None,
                    message: Some(message.to_string()),
                })
            }
        }
    }

    /// Stores the audio for later transcription. Realtime projects queue it at once;
    /// batch-mode projects leave it `pending` for a confirmed batch.
    #[tracing::instrument(
        skip(self, tenant, submission),
        fields(project_id = %tenant.project.id, session_id = %submission.session_id)
    )]
    pub async fn stage(
        &self,
        tenant: &TenantContext,
        submission: AudioSubmission,
    ) -> Result<IngestOutcome, ServiceError> {
        let format = self.validate(tenant, &submission)?;

        let metadata = enrich_metadata(submission.metadata.clone(), tenant.origin.as_deref());
        let path = AudioPath::for_session(
            &tenant.project.id,
            &submission.session_id,
            Utc::now().timestamp_millis(),
            format,
        );
        let size = self.audio_store.store(&path, submission.audio.clone()).await?;

        let mut response = Response::staged_voice(
            ResponseKey::new(
                tenant.project.id,
                submission.session_id.clone(),
                submission.question_id.clone(),
            ),
            path,
            size,
            submission.duration_seconds,
            metadata,
        );
        response.language = submission.language.clone();
        self.responses.insert(&response).await?;

        if tenant.project.transcription_mode == TranscriptionMode::Batch {
            return Ok(IngestOutcome {
                response_id: response.id,
                status: ResponseStatus::Pending,
                transcript: None,
                message: None,
            });
        }

        let status = match self.queue.reserve() {
            Ok(slot) => {
                self.responses.mark_processing(response.id).await?;
                slot.submit(WorkerJob::Response(response.id));
                ResponseStatus::Processing
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    response_id = %response.id,
                    "Could not queue staged audio, left pending"
                );
                ResponseStatus::Pending
            }
        };

        Ok(IngestOutcome {
            response_id: response.id,
            status,
            transcript: None,
            message: None,
        })
    }
}
