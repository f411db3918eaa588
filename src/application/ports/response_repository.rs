use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    BatchId, Metadata, ProjectId, Response, ResponseId, ResponseKey, TranscribedAudio,
};

use super::RepositoryError;

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn insert(&self, response: &Response) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: ResponseId) -> Result<Option<Response>, RepositoryError>;

    /// The live text-method row for a (project, session, question) key.
    async fn find_text_response(
        &self,
        key: &ResponseKey,
    ) -> Result<Option<Response>, RepositoryError>;

    async fn update_text(
        &self,
        id: ResponseId,
        text: &str,
        language: Option<&str>,
        metadata: &Metadata,
        transcribed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    async fn delete(&self, id: ResponseId) -> Result<(), RepositoryError>;

    async fn list_by_sessions(
        &self,
        project_id: ProjectId,
        session_ids: &[String],
    ) -> Result<Vec<Response>, RepositoryError>;

    /// Marks the rows `processing` and links them to the batch.
    async fn assign_to_batch(
        &self,
        ids: &[ResponseId],
        batch_id: BatchId,
    ) -> Result<(), RepositoryError>;

    async fn list_by_batch(&self, batch_id: BatchId) -> Result<Vec<Response>, RepositoryError>;

    /// Re-enters `processing`. `previous_transcript` is overwritten with the current
    /// transcript, even when there is none.
    async fn begin_retranscription(&self, id: ResponseId) -> Result<(), RepositoryError>;

    async fn mark_processing(&self, id: ResponseId) -> Result<(), RepositoryError>;

    async fn mark_completed(
        &self,
        id: ResponseId,
        result: &TranscribedAudio,
        transcribed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    async fn mark_failed(&self, id: ResponseId, error_message: &str)
        -> Result<(), RepositoryError>;
}
