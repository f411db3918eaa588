use std::sync::Arc;

use crate::application::ports::ResponseRepository;
use crate::domain::{ProjectId, ResponseId, ResponseStatus};

use super::{JobHandle, ServiceError, TranscriptionQueue, WorkerJob};

/// Dashboard-side actions on individual responses.
pub struct ResponseService {
    responses: Arc<dyn ResponseRepository>,
    queue: TranscriptionQueue,
}

impl ResponseService {
    pub fn new(responses: Arc<dyn ResponseRepository>, queue: TranscriptionQueue) -> Self {
        Self { responses, queue }
    }

    /// Re-runs transcription from retained audio, keeping the old transcript in
    /// `previous_transcript`.
    #[tracing::instrument(skip(self))]
    pub async fn retranscribe(
        &self,
        project_id: ProjectId,
        response_id: ResponseId,
    ) -> Result<JobHandle, ServiceError> {
        let response = self
            .responses
            .get_by_id(response_id)
            .await?
            .filter(|r| r.project_id == project_id)
            .ok_or_else(|| ServiceError::NotFound("Recording not found".to_string()))?;

        if response.audio.stored_path().is_none() {
            return Err(ServiceError::Validation(
                "Recording has no retained audio to re-transcribe".to_string(),
            ));
        }
        if response.status == ResponseStatus::Processing {
            return Err(ServiceError::InvalidState(
                "Recording is already being transcribed".to_string(),
            ));
        }

        let slot = self.queue.reserve()?;
        self.responses.begin_retranscription(response_id).await?;
        tracing::info!(previous_status = %response.status, "Re-transcription queued");

        Ok(slot.submit(WorkerJob::Response(response_id)))
    }
}
