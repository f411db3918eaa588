use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::{RepositoryError, ResponseRepository};
use crate::domain::{
    BatchId, InputMethod, Metadata, ProjectId, Response, ResponseId, ResponseKey,
    ResponseStatus, TranscribedAudio,
};

#[derive(Default)]
pub struct InMemoryResponseRepository {
    rows: RwLock<HashMap<ResponseId, Response>>,
}

impl InMemoryResponseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored row, oldest first.
    pub async fn all(&self) -> Vec<Response> {
        let mut rows: Vec<Response> = self.rows.read().await.values().cloned().collect();
        rows.sort_by_key(|r| r.created_at);
        rows
    }

    async fn update<F>(&self, id: ResponseId, apply: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Response),
    {
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("response {}", id)))?;
        apply(row);
        Ok(())
    }
}

fn is_text_row_for(row: &Response, key: &ResponseKey) -> bool {
    row.input_method == InputMethod::Text
        && row.project_id == key.project_id
        && row.session_id == key.session_id
        && row.question_id == key.question_id
}

#[async_trait]
impl ResponseRepository for InMemoryResponseRepository {
    async fn insert(&self, response: &Response) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&response.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "response {} already exists",
                response.id
            )));
        }
        if response.input_method == InputMethod::Text {
            let key = response.key();
            if rows.values().any(|row| is_text_row_for(row, &key)) {
                return Err(RepositoryError::ConstraintViolation(
                    "text response already exists for this question".to_string(),
                ));
            }
        }
        rows.insert(response.id, response.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: ResponseId) -> Result<Option<Response>, RepositoryError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_text_response(
        &self,
        key: &ResponseKey,
    ) -> Result<Option<Response>, RepositoryError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|row| is_text_row_for(row, key))
            .cloned())
    }

    async fn update_text(
        &self,
        id: ResponseId,
        text: &str,
        language: Option<&str>,
        metadata: &Metadata,
        transcribed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.update(id, |row| {
            row.transcript = Some(text.to_string());
            row.language = language.map(str::to_string);
            row.metadata = metadata.clone();
            row.transcribed_at = Some(transcribed_at);
            row.status = ResponseStatus::Completed;
            row.error_message = None;
        })
        .await
    }

    async fn delete(&self, id: ResponseId) -> Result<(), RepositoryError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }

    async fn list_by_sessions(
        &self,
        project_id: ProjectId,
        session_ids: &[String],
    ) -> Result<Vec<Response>, RepositoryError> {
        Ok(self
            .all()
            .await
            .into_iter()
            .filter(|r| r.project_id == project_id && session_ids.contains(&r.session_id))
            .collect())
    }

    async fn assign_to_batch(
        &self,
        ids: &[ResponseId],
        batch_id: BatchId,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        for id in ids {
            if let Some(row) = rows.get_mut(id) {
                row.batch_id = Some(batch_id);
                row.status = ResponseStatus::Processing;
                row.error_message = None;
            }
        }
        Ok(())
    }

    async fn list_by_batch(&self, batch_id: BatchId) -> Result<Vec<Response>, RepositoryError> {
        Ok(self
            .all()
            .await
            .into_iter()
            .filter(|r| r.batch_id == Some(batch_id))
            .collect())
    }

    async fn begin_retranscription(&self, id: ResponseId) -> Result<(), RepositoryError> {
        self.update(id, |row| {
            row.previous_transcript = row.transcript.clone();
            row.status = ResponseStatus::Processing;
            row.error_message = None;
        })
        .await
    }

    async fn mark_processing(&self, id: ResponseId) -> Result<(), RepositoryError> {
        self.update(id, |row| row.status = ResponseStatus::Processing)
            .await
    }

    async fn mark_completed(
        &self,
        id: ResponseId,
        result: &TranscribedAudio,
        transcribed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.update(id, |row| {
            row.transcript = Some(result.text.clone());
            if result.language.is_some() {
                row.language = result.language.clone();
            }
            if result.duration_seconds.is_some() {
                row.duration_seconds = result.duration_seconds;
            }
            row.status = ResponseStatus::Completed;
            row.error_message = None;
            row.transcribed_at = Some(transcribed_at);
        })
        .await
    }

    async fn mark_failed(
        &self,
        id: ResponseId,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        self.update(id, |row| {
            row.status = ResponseStatus::Failed;
            row.error_message = Some(error_message.to_string());
        })
        .await
    }
}
