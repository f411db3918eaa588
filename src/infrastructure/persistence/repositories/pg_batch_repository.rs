use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{BatchRepository, RepositoryError};
use crate::domain::{Batch, BatchId, BatchStatus, ProjectId, UserId};

use super::super::pg_error::{corrupt, query_failed};

const BATCH_COLUMNS: &str = r#"
    id, project_id, owner_id, status, session_ids_requested, session_ids_not_found,
    total_count, completed_count, failed_count, estimated_cost_usd, actual_cost_usd,
    created_at, confirmed_at, completed_at
"#;

#[derive(sqlx::FromRow)]
struct BatchRow {
    id: Uuid,
    project_id: Uuid,
    owner_id: Uuid,
    status: String,
    session_ids_requested: Vec<String>,
    session_ids_not_found: Vec<String>,
    total_count: i32,
    completed_count: i32,
    failed_count: i32,
    estimated_cost_usd: f64,
    actual_cost_usd: Option<f64>,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<BatchRow> for Batch {
    type Error = RepositoryError;

    fn try_from(r: BatchRow) -> Result<Self, Self::Error> {
        let count = |field: &str, value: i32| u32::try_from(value).map_err(|e| corrupt(field, e));

        Ok(Batch {
            id: BatchId::from_uuid(r.id),
            project_id: ProjectId::from_uuid(r.project_id),
            owner_id: UserId::from_uuid(r.owner_id),
            status: r
                .status
                .parse::<BatchStatus>()
                .map_err(|e| corrupt("status", e))?,
            session_ids_requested: r.session_ids_requested,
            session_ids_not_found: r.session_ids_not_found,
            total_count: count("total_count", r.total_count)?,
            completed_count: count("completed_count", r.completed_count)?,
            failed_count: count("failed_count", r.failed_count)?,
            estimated_cost_usd: r.estimated_cost_usd,
            actual_cost_usd: r.actual_cost_usd,
            created_at: r.created_at,
            confirmed_at: r.confirmed_at,
            completed_at: r.completed_at,
        })
    }
}

pub struct PgBatchRepository {
    pool: PgPool,
}

impl PgBatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BatchRepository for PgBatchRepository {
    #[instrument(skip(self, batch), fields(batch_id = %batch.id, project_id = %batch.project_id))]
    async fn create(&self, batch: &Batch) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO batches (
                id, project_id, owner_id, status, session_ids_requested, session_ids_not_found,
                total_count, completed_count, failed_count, estimated_cost_usd, actual_cost_usd,
                created_at, confirmed_at, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(batch.id.as_uuid())
        .bind(batch.project_id.as_uuid())
        .bind(batch.owner_id.as_uuid())
        .bind(batch.status.as_str())
        .bind(&batch.session_ids_requested)
        .bind(&batch.session_ids_not_found)
        .bind(batch.total_count as i32)
        .bind(batch.completed_count as i32)
        .bind(batch.failed_count as i32)
        .bind(batch.estimated_cost_usd)
        .bind(batch.actual_cost_usd)
        .bind(batch.created_at)
        .bind(batch.confirmed_at)
        .bind(batch.completed_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(batch_id = %id))]
    async fn get_by_id(&self, id: BatchId) -> Result<Option<Batch>, RepositoryError> {
        let row: Option<BatchRow> = sqlx::query_as(&format!(
            "SELECT {} FROM batches WHERE id = $1",
            BATCH_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Batch::try_from).transpose()
    }

    #[instrument(skip(self), fields(project_id = %project_id, batch_id = %id))]
    async fn get_for_project(
        &self,
        project_id: ProjectId,
        id: BatchId,
    ) -> Result<Option<Batch>, RepositoryError> {
        let row: Option<BatchRow> = sqlx::query_as(&format!(
            "SELECT {} FROM batches WHERE id = $1 AND project_id = $2",
            BATCH_COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(project_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Batch::try_from).transpose()
    }

    #[instrument(skip(self), fields(batch_id = %id))]
    async fn confirm(
        &self,
        id: BatchId,
        total_count: u32,
        confirmed_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE batches
            SET status = 'processing', total_count = $2, confirmed_at = $3
            WHERE id = $1 AND status = 'pending_confirmation'
            "#,
        )
        .bind(id.as_uuid())
        .bind(total_count as i32)
        .bind(confirmed_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(batch_id = %id))]
    async fn cancel(&self, id: BatchId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE batches
            SET status = 'cancelled'
            WHERE id = $1 AND status = 'pending_confirmation'
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(batch_id = %id))]
    async fn update_progress(
        &self,
        id: BatchId,
        completed_count: u32,
        failed_count: u32,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE batches SET completed_count = $2, failed_count = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(completed_count as i32)
            .bind(failed_count as i32)
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(batch_id = %id, status = %status))]
    async fn finish(
        &self,
        id: BatchId,
        status: BatchStatus,
        actual_cost_usd: Option<f64>,
        completed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE batches
            SET status = $2, actual_cost_usd = $3, completed_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(actual_cost_usd)
        .bind(completed_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }
}
