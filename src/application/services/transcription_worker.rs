use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::application::ports::{
    AudioStore, AudioStoreError, BatchRepository, ProjectRepository, RepositoryError,
    ResponseRepository, TranscriptionError,
};
use crate::domain::{
    AudioFormat, BatchId, BatchStatus, Response, ResponseId, ResponseStatus, TranscriptionPricing,
};

use super::{JobReport, TranscriptionService, WorkerJob, WorkerMessage};

/// Drains the transcription queue one job at a time. Batch items are also processed
/// sequentially so the provider never sees more than one call from this worker.
pub struct TranscriptionWorker {
    receiver: mpsc::Receiver<WorkerMessage>,
    responses: Arc<dyn ResponseRepository>,
    batches: Arc<dyn BatchRepository>,
    projects: Arc<dyn ProjectRepository>,
    audio_store: Arc<dyn AudioStore>,
    transcription: Arc<TranscriptionService>,
    pricing: TranscriptionPricing,
}

impl TranscriptionWorker {
    pub fn new(
        receiver: mpsc::Receiver<WorkerMessage>,
        responses: Arc<dyn ResponseRepository>,
        batches: Arc<dyn BatchRepository>,
        projects: Arc<dyn ProjectRepository>,
        audio_store: Arc<dyn AudioStore>,
        transcription: Arc<TranscriptionService>,
        pricing: TranscriptionPricing,
    ) -> Self {
        Self {
            receiver,
            responses,
            batches,
            projects,
            audio_store,
            transcription,
            pricing,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Transcription worker started");
        while let Some(msg) = self.receiver.recv().await {
            let report = match msg.job {
                WorkerJob::Batch(batch_id) => {
                    self.process_batch(batch_id)
                        .instrument(tracing::info_span!("batch_job", batch_id = %batch_id))
                        .await
                }
                WorkerJob::Response(response_id) => {
                    self.process_response(response_id)
                        .instrument(tracing::info_span!(
                            "retranscription_job",
                            response_id = %response_id
                        ))
                        .await
                }
            };

            let report = report.unwrap_or_else(|e| {
                tracing::error!(error = %e, job = ?msg.job, "Transcription job aborted");
                JobReport::Aborted {
                    job: msg.job,
                    error: e.to_string(),
                }
            });

            // Submitter may have dropped its handle.
            let _ = msg.reply.send(report);
        }
        tracing::info!("Transcription worker stopped: channel closed");
    }

    async fn process_batch(&self, batch_id: BatchId) -> Result<JobReport, WorkerError> {
        let items = match self.responses.list_by_batch(batch_id).await {
            Ok(rows) => rows
                .into_iter()
                .filter(|r| r.status == ResponseStatus::Processing)
                .collect::<Vec<_>>(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load batch items");
                self.batches
                    .finish(batch_id, BatchStatus::Failed, None, Utc::now())
                    .await?;
                return Err(e.into());
            }
        };

        tracing::info!(items = items.len(), "Batch processing started");

        let project_language = match items.first() {
            Some(first) => self.project_language(first).await,
            None => None,
        };

        let mut completed = 0u32;
        let mut failed = 0u32;

        for item in &items {
            match self.transcribe_item(item, project_language.as_deref()).await {
                Ok(ResponseStatus::Completed) => completed += 1,
                Ok(_) => failed += 1,
                Err(e) => {
                    tracing::warn!(response_id = %item.id, error = %e, "Batch item failed");
                    if let Err(mark_err) = self.responses.mark_failed(item.id, &e.to_string()).await
                    {
                        tracing::error!(
                            error = %mark_err,
                            response_id = %item.id,
                            "Failed to record item failure"
                        );
                    }
                    failed += 1;
                }
            }

            if let Err(e) = self.batches.update_progress(batch_id, completed, failed).await {
                tracing::error!(error = %e, "Failed to persist batch progress");
            }
        }

        let actual_cost = self.actual_cost(batch_id).await;
        let status = BatchStatus::rollup(completed, failed);

        self.batches
            .finish(batch_id, status, actual_cost, Utc::now())
            .await?;

        tracing::info!(
            status = %status,
            completed,
            failed,
            actual_cost_usd = actual_cost,
            "Batch processing finished"
        );

        Ok(JobReport::Batch {
            batch_id,
            status,
            completed,
            failed,
        })
    }

    async fn process_response(&self, response_id: ResponseId) -> Result<JobReport, WorkerError> {
        let response = self
            .responses
            .get_by_id(response_id)
            .await?
            .ok_or_else(|| {
                WorkerError::Repository(RepositoryError::NotFound(response_id.to_string()))
            })?;

        let project_language = self.project_language(&response).await;

        let status = match self
            .transcribe_item(&response, project_language.as_deref())
            .await
        {
            Ok(status) => status,
            Err(e) => {
                self.responses
                    .mark_failed(response_id, &e.to_string())
                    .await?;
                ResponseStatus::Failed
            }
        };

        Ok(JobReport::Response {
            response_id,
            status,
        })
    }

    /// Transcribes one stored-audio response and records the outcome on its row.
    /// Provider failures are recorded and reported as `Failed`, not as errors.
    async fn transcribe_item(
        &self,
        response: &Response,
        project_language: Option<&str>,
    ) -> Result<ResponseStatus, WorkerError> {
        let path = response
            .audio
            .stored_path()
            .ok_or(WorkerError::NoRetainedAudio)?;

        let audio = self.audio_store.fetch(path).await?;
        let format = path.format().unwrap_or(AudioFormat::Webm);
        let language = response.language.as_deref().or(project_language);

        match self
            .transcription
            .transcribe(&audio, format, language)
            .await
        {
            Ok(result) => {
                self.responses
                    .mark_completed(response.id, &result, Utc::now())
                    .await?;
                tracing::debug!(
                    response_id = %response.id,
                    chars = result.text.len(),
                    "Item transcribed"
                );
                Ok(ResponseStatus::Completed)
            }
            Err(e) => {
                self.responses
                    .mark_failed(response.id, &WorkerError::Transcription(e).to_string())
                    .await?;
                Ok(ResponseStatus::Failed)
            }
        }
    }

    async fn project_language(&self, response: &Response) -> Option<String> {
        match self.projects.find_by_id(response.project_id).await {
            Ok(project) => project.and_then(|p| p.language),
            Err(e) => {
                tracing::warn!(error = %e, "Project lookup failed, using default language");
                None
            }
        }
    }

    async fn actual_cost(&self, batch_id: BatchId) -> Option<f64> {
        match self.responses.list_by_batch(batch_id).await {
            Ok(rows) => {
                let seconds: u64 = rows
                    .iter()
                    .filter(|r| r.status == ResponseStatus::Completed)
                    .map(|r| u64::from(r.duration_seconds.unwrap_or(0)))
                    .sum();
                Some(self.pricing.cost_for(seconds))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not compute actual batch cost");
                None
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("no retained audio to transcribe")]
    NoRetainedAudio,
    #[error("audio storage: {0}")]
    Storage(#[from] AudioStoreError),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
