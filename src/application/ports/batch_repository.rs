use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Batch, BatchId, BatchStatus, ProjectId};

use super::RepositoryError;

#[async_trait]
pub trait BatchRepository: Send + Sync {
    async fn create(&self, batch: &Batch) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: BatchId) -> Result<Option<Batch>, RepositoryError>;

    async fn get_for_project(
        &self,
        project_id: ProjectId,
        id: BatchId,
    ) -> Result<Option<Batch>, RepositoryError>;

    /// Moves `pending_confirmation` to `processing`. Returns false if the batch was
    /// no longer pending.
    async fn confirm(
        &self,
        id: BatchId,
        total_count: u32,
        confirmed_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;

    /// Moves `pending_confirmation` to `cancelled`. Returns false if the batch was
    /// no longer pending.
    async fn cancel(&self, id: BatchId) -> Result<bool, RepositoryError>;

    async fn update_progress(
        &self,
        id: BatchId,
        completed_count: u32,
        failed_count: u32,
    ) -> Result<(), RepositoryError>;

    async fn finish(
        &self,
        id: BatchId,
        status: BatchStatus,
        actual_cost_usd: Option<f64>,
        completed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
}
