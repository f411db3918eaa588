use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::application::ports::{BatchRepository, ResponseRepository};
use crate::domain::{
    Batch, BatchId, BatchStatus, ProjectId, ResponseId, ResponseStatus, TranscriptionPricing,
};

use super::{JobHandle, ServiceError, TenantContext, TranscriptionQueue, WorkerJob};

pub const MAX_SESSIONS_PER_BATCH: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchQuote {
    pub batch_id: BatchId,
    pub requested: usize,
    pub found: usize,
    pub not_found: usize,
    pub already_transcribed: usize,
    pub to_transcribe: usize,
    pub not_found_session_ids: Vec<String>,
    pub estimated_duration_minutes: u64,
    pub estimated_cost_usd: f64,
    pub status: BatchStatus,
}

#[derive(Debug)]
pub struct ConfirmedBatch {
    pub batch_id: BatchId,
    pub status: BatchStatus,
    pub queued: usize,
    pub estimated_completion: DateTime<Utc>,
    /// Resolves when the worker finishes the batch.
    pub job: JobHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedItem {
    pub response_id: ResponseId,
    pub session_id: String,
    pub error: Option<String>,
}

/// Progress recomputed from the live item rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    pub batch_id: BatchId,
    pub status: BatchStatus,
    pub total: u32,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    pub failed_items: Vec<FailedItem>,
    pub estimated_cost_usd: f64,
    pub actual_cost_usd: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Quote, confirm, cancel and inspect bulk transcription batches.
pub struct BatchService {
    responses: Arc<dyn ResponseRepository>,
    batches: Arc<dyn BatchRepository>,
    queue: TranscriptionQueue,
    pricing: TranscriptionPricing,
    seconds_per_item: u32,
}

impl BatchService {
    pub fn new(
        responses: Arc<dyn ResponseRepository>,
        batches: Arc<dyn BatchRepository>,
        queue: TranscriptionQueue,
        pricing: TranscriptionPricing,
        seconds_per_item: u32,
    ) -> Self {
        Self {
            responses,
            batches,
            queue,
            pricing,
            seconds_per_item,
        }
    }

    fn completion_estimate(&self, items: usize) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(items as i64 * i64::from(self.seconds_per_item))
    }

    /// Partitions the requested sessions and freezes the result in a
    /// `pending_confirmation` batch. Nothing is transcribed yet.
    #[tracing::instrument(
        skip(self, tenant, session_ids),
        fields(project_id = %tenant.project.id, requested = session_ids.len())
    )]
    pub async fn quote(
        &self,
        tenant: &TenantContext,
        session_ids: Vec<String>,
    ) -> Result<BatchQuote, ServiceError> {
        if !tenant.quota.plan.batch_enabled {
            return Err(ServiceError::PlanFeatureUnavailable("batch transcription"));
        }
        if session_ids.is_empty() || session_ids.len() > MAX_SESSIONS_PER_BATCH {
            return Err(ServiceError::Validation(format!(
                "session_ids must contain between 1 and {} entries",
                MAX_SESSIONS_PER_BATCH
            )));
        }

        let rows = self
            .responses
            .list_by_sessions(tenant.project.id, &session_ids)
            .await?;

        let found: HashSet<&str> = rows.iter().map(|r| r.session_id.as_str()).collect();
        let not_found_session_ids: Vec<String> = session_ids
            .iter()
            .filter(|id| !found.contains(id.as_str()))
            .cloned()
            .collect();

        let (already_transcribed, to_transcribe): (Vec<_>, Vec<_>) = rows
            .iter()
            .partition(|r| r.status == ResponseStatus::Completed);

        let total_seconds: u64 = to_transcribe
            .iter()
            .map(|r| self.pricing.quote_duration(r.duration_seconds))
            .sum();
        let estimated_cost_usd = self.pricing.cost_for(total_seconds);

        let batch = Batch::quoted(
            tenant.project.id,
            tenant.project.owner_id,
            session_ids.clone(),
            not_found_session_ids.clone(),
            to_transcribe.len() as u32,
            estimated_cost_usd,
        );
        self.batches.create(&batch).await?;

        tracing::info!(
            batch_id = %batch.id,
            to_transcribe = to_transcribe.len(),
            estimated_cost_usd,
            "Batch quoted"
        );

        Ok(BatchQuote {
            batch_id: batch.id,
            requested: session_ids.len(),
            found: found.len(),
            not_found: not_found_session_ids.len(),
            already_transcribed: already_transcribed.len(),
            to_transcribe: to_transcribe.len(),
            not_found_session_ids,
            estimated_duration_minutes: total_seconds.div_ceil(60),
            estimated_cost_usd,
            status: batch.status,
        })
    }

    async fn load(&self, project_id: ProjectId, batch_id: BatchId) -> Result<Batch, ServiceError> {
        self.batches
            .get_for_project(project_id, batch_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Batch not found".to_string()))
    }

    /// Marks the outstanding items `processing` and hands the batch to the worker.
    /// Returns without waiting for any transcription.
    #[tracing::instrument(skip(self))]
    pub async fn confirm(
        &self,
        project_id: ProjectId,
        batch_id: BatchId,
    ) -> Result<ConfirmedBatch, ServiceError> {
        let batch = self.load(project_id, batch_id).await?;
        if batch.status != BatchStatus::PendingConfirmation {
            return Err(ServiceError::InvalidState(format!(
                "Batch cannot be confirmed. Current status: {}",
                batch.status
            )));
        }

        let slot = self.queue.reserve()?;

        let item_ids: Vec<ResponseId> = self
            .responses
            .list_by_sessions(project_id, &batch.valid_session_ids())
            .await?
            .into_iter()
            .filter(|r| r.status != ResponseStatus::Completed)
            .map(|r| r.id)
            .collect();

        if !self
            .batches
            .confirm(batch_id, item_ids.len() as u32, Utc::now())
            .await?
        {
            return Err(ServiceError::InvalidState(
                "Batch is no longer pending confirmation".to_string(),
            ));
        }

        if !item_ids.is_empty() {
            if let Err(e) = self.responses.assign_to_batch(&item_ids, batch_id).await {
                tracing::error!(error = %e, "Failed to assign items, failing batch");
                self.batches
                    .finish(batch_id, BatchStatus::Failed, None, Utc::now())
                    .await?;
                return Err(e.into());
            }
        }

        let job = slot.submit(WorkerJob::Batch(batch_id));

        tracing::info!(queued = item_ids.len(), "Batch confirmed");

        Ok(ConfirmedBatch {
            batch_id,
            status: BatchStatus::Processing,
            queued: item_ids.len(),
            estimated_completion: self.completion_estimate(item_ids.len()),
            job,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel(
        &self,
        project_id: ProjectId,
        batch_id: BatchId,
    ) -> Result<BatchStatus, ServiceError> {
        let batch = self.load(project_id, batch_id).await?;
        if batch.status != BatchStatus::PendingConfirmation
            || !self.batches.cancel(batch_id).await?
        {
            return Err(ServiceError::InvalidState(
                "Only pending batches can be cancelled".to_string(),
            ));
        }
        tracing::info!("Batch cancelled");
        Ok(BatchStatus::Cancelled)
    }

    #[tracing::instrument(skip(self))]
    pub async fn status(
        &self,
        project_id: ProjectId,
        batch_id: BatchId,
    ) -> Result<BatchProgress, ServiceError> {
        let batch = self.load(project_id, batch_id).await?;
        let items = self.responses.list_by_batch(batch_id).await?;

        let completed = items
            .iter()
            .filter(|r| r.status == ResponseStatus::Completed)
            .count();
        let pending = items.iter().filter(|r| r.status.is_outstanding()).count();
        let failed_items: Vec<FailedItem> = items
            .iter()
            .filter(|r| r.status == ResponseStatus::Failed)
            .map(|r| FailedItem {
                response_id: r.id,
                session_id: r.session_id.clone(),
                error: r.error_message.clone(),
            })
            .collect();

        let estimated_completion = (batch.status == BatchStatus::Processing && pending > 0)
            .then(|| self.completion_estimate(pending));

        Ok(BatchProgress {
            batch_id,
            status: batch.status,
            total: batch.total_count,
            completed,
            failed: failed_items.len(),
            pending,
            failed_items,
            estimated_cost_usd: batch.estimated_cost_usd,
            actual_cost_usd: batch.actual_cost_usd,
            started_at: batch.confirmed_at,
            estimated_completion,
            completed_at: batch.completed_at,
        })
    }
}
