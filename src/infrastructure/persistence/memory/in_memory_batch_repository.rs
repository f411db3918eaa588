use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::{BatchRepository, RepositoryError};
use crate::domain::{Batch, BatchId, BatchStatus, ProjectId};

#[derive(Default)]
pub struct InMemoryBatchRepository {
    batches: RwLock<HashMap<BatchId, Batch>>,
}

impl InMemoryBatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn transition_from_pending<F>(&self, id: BatchId, apply: F) -> bool
    where
        F: FnOnce(&mut Batch),
    {
        let mut batches = self.batches.write().await;
        match batches.get_mut(&id) {
            Some(batch) if batch.status == BatchStatus::PendingConfirmation => {
                apply(batch);
                true
            }
            _ => false,
        }
    }

    async fn update<F>(&self, id: BatchId, apply: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Batch),
    {
        let mut batches = self.batches.write().await;
        let batch = batches
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("batch {}", id)))?;
        apply(batch);
        Ok(())
    }
}

#[async_trait]
impl BatchRepository for InMemoryBatchRepository {
    async fn create(&self, batch: &Batch) -> Result<(), RepositoryError> {
        self.batches.write().await.insert(batch.id, batch.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: BatchId) -> Result<Option<Batch>, RepositoryError> {
        Ok(self.batches.read().await.get(&id).cloned())
    }

    async fn get_for_project(
        &self,
        project_id: ProjectId,
        id: BatchId,
    ) -> Result<Option<Batch>, RepositoryError> {
        Ok(self
            .batches
            .read()
            .await
            .get(&id)
            .filter(|b| b.project_id == project_id)
            .cloned())
    }

    async fn confirm(
        &self,
        id: BatchId,
        total_count: u32,
        confirmed_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .transition_from_pending(id, |batch| {
                batch.status = BatchStatus::Processing;
                batch.total_count = total_count;
                batch.confirmed_at = Some(confirmed_at);
            })
            .await)
    }

    async fn cancel(&self, id: BatchId) -> Result<bool, RepositoryError> {
        Ok(self
            .transition_from_pending(id, |batch| batch.status = BatchStatus::Cancelled)
            .await)
    }

    async fn update_progress(
        &self,
        id: BatchId,
        completed_count: u32,
        failed_count: u32,
    ) -> Result<(), RepositoryError> {
        self.update(id, |batch| {
            batch.completed_count = completed_count;
            batch.failed_count = failed_count;
        })
        .await
    }

    async fn finish(
        &self,
        id: BatchId,
        status: BatchStatus,
        actual_cost_usd: Option<f64>,
        completed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.update(id, |batch| {
            batch.status = status;
            batch.actual_cost_usd = actual_cost_usd;
            batch.completed_at = Some(completed_at);
        })
        .await
    }
}
