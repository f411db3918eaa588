use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, ResponseRepository};
use crate::domain::{
    AudioPointer, BatchId, Metadata, ProjectId, Response, ResponseId, ResponseKey,
    TranscribedAudio,
};

use super::super::pg_error::{corrupt, query_failed};

const RESPONSE_COLUMNS: &str = r#"
    id, project_id, session_id, question_id, input_method, audio_path, audio_size_bytes,
    duration_seconds, transcript, previous_transcript, language, metadata, status,
    error_message, batch_id, created_at, transcribed_at
"#;

#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: Uuid,
    project_id: Uuid,
    session_id: String,
    question_id: Option<String>,
    input_method: String,
    audio_path: String,
    audio_size_bytes: i64,
    duration_seconds: Option<i32>,
    transcript: Option<String>,
    previous_transcript: Option<String>,
    language: Option<String>,
    metadata: Json<Metadata>,
    status: String,
    error_message: Option<String>,
    batch_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    transcribed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ResponseRow> for Response {
    type Error = RepositoryError;

    fn try_from(r: ResponseRow) -> Result<Self, Self::Error> {
        Ok(Response {
            id: ResponseId::from_uuid(r.id),
            project_id: ProjectId::from_uuid(r.project_id),
            session_id: r.session_id,
            question_id: r.question_id,
            input_method: r
                .input_method
                .parse()
                .map_err(|e| corrupt("input_method", e))?,
            audio: AudioPointer::from_raw(&r.audio_path),
            audio_size_bytes: u64::try_from(r.audio_size_bytes)
                .map_err(|e| corrupt("audio_size_bytes", e))?,
            duration_seconds: r
                .duration_seconds
                .map(u32::try_from)
                .transpose()
                .map_err(|e| corrupt("duration_seconds", e))?,
            transcript: r.transcript,
            previous_transcript: r.previous_transcript,
            language: r.language,
            metadata: r.metadata.0,
            status: r.status.parse().map_err(|e| corrupt("status", e))?,
            error_message: r.error_message,
            batch_id: r.batch_id.map(BatchId::from_uuid),
            created_at: r.created_at,
            transcribed_at: r.transcribed_at,
        })
    }
}

fn into_responses(rows: Vec<ResponseRow>) -> Result<Vec<Response>, RepositoryError> {
    rows.into_iter().map(Response::try_from).collect()
}

fn expect_row(affected: u64, id: ResponseId) -> Result<(), RepositoryError> {
    if affected == 0 {
        return Err(RepositoryError::NotFound(format!("response {}", id)));
    }
    Ok(())
}

pub struct PgResponseRepository {
    pool: PgPool,
}

impl PgResponseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for PgResponseRepository {
    #[instrument(skip(self, response), fields(response_id = %response.id, status = %response.status))]
    async fn insert(&self, response: &Response) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO responses (
                id, project_id, session_id, question_id, input_method, audio_path,
                audio_size_bytes, duration_seconds, transcript, previous_transcript, language,
                metadata, status, error_message, batch_id, created_at, transcribed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(response.id.as_uuid())
        .bind(response.project_id.as_uuid())
        .bind(&response.session_id)
        .bind(&response.question_id)
        .bind(response.input_method.as_str())
        .bind(response.audio.as_str())
        .bind(response.audio_size_bytes as i64)
        .bind(response.duration_seconds.map(|d| d as i32))
        .bind(&response.transcript)
        .bind(&response.previous_transcript)
        .bind(&response.language)
        .bind(Json(&response.metadata))
        .bind(response.status.as_str())
        .bind(&response.error_message)
        .bind(response.batch_id.map(|id| id.as_uuid()))
        .bind(response.created_at)
        .bind(response.transcribed_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(response_id = %id))]
    async fn get_by_id(&self, id: ResponseId) -> Result<Option<Response>, RepositoryError> {
        let row: Option<ResponseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM responses WHERE id = $1",
            RESPONSE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Response::try_from).transpose()
    }

    #[instrument(skip(self, key), fields(project_id = %key.project_id, session_id = %key.session_id))]
    async fn find_text_response(
        &self,
        key: &ResponseKey,
    ) -> Result<Option<Response>, RepositoryError> {
        let row: Option<ResponseRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM responses
            WHERE project_id = $1
              AND session_id = $2
              AND COALESCE(question_id, '') = COALESCE($3, '')
              AND input_method = 'text'
            "#,
            RESPONSE_COLUMNS
        ))
        .bind(key.project_id.as_uuid())
        .bind(&key.session_id)
        .bind(&key.question_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Response::try_from).transpose()
    }

    #[instrument(skip(self, text, metadata), fields(response_id = %id, chars = text.chars().count()))]
    async fn update_text(
        &self,
        id: ResponseId,
        text: &str,
        language: Option<&str>,
        metadata: &Metadata,
        transcribed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE responses
            SET transcript = $2, language = $3, metadata = $4, transcribed_at = $5,
                status = 'completed', error_message = NULL
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(text)
        .bind(language)
        .bind(Json(metadata))
        .bind(transcribed_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        expect_row(result.rows_affected(), id)
    }

    #[instrument(skip(self), fields(response_id = %id))]
    async fn delete(&self, id: ResponseId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM responses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self, session_ids), fields(project_id = %project_id, sessions = session_ids.len()))]
    async fn list_by_sessions(
        &self,
        project_id: ProjectId,
        session_ids: &[String],
    ) -> Result<Vec<Response>, RepositoryError> {
        let rows: Vec<ResponseRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM responses
            WHERE project_id = $1 AND session_id = ANY($2)
            ORDER BY created_at
            "#,
            RESPONSE_COLUMNS
        ))
        .bind(project_id.as_uuid())
        .bind(session_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        into_responses(rows)
    }

    #[instrument(skip(self, ids), fields(batch_id = %batch_id, items = ids.len()))]
    async fn assign_to_batch(
        &self,
        ids: &[ResponseId],
        batch_id: BatchId,
    ) -> Result<(), RepositoryError> {
        let ids: Vec<Uuid> = ids.iter().map(ResponseId::as_uuid).collect();

        sqlx::query(
            r#"
            UPDATE responses
            SET batch_id = $2, status = 'processing', error_message = NULL
            WHERE id = ANY($1)
            "#,
        )
        .bind(&ids)
        .bind(batch_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        Ok(())
    }

    #[instrument(skip(self), fields(batch_id = %batch_id))]
    async fn list_by_batch(&self, batch_id: BatchId) -> Result<Vec<Response>, RepositoryError> {
        let rows: Vec<ResponseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM responses WHERE batch_id = $1 ORDER BY created_at",
            RESPONSE_COLUMNS
        ))
        .bind(batch_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        into_responses(rows)
    }

    #[instrument(skip(self), fields(response_id = %id))]
    async fn begin_retranscription(&self, id: ResponseId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE responses
            SET previous_transcript = transcript,
                status = 'processing', error_message = NULL
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        expect_row(result.rows_affected(), id)
    }

    #[instrument(skip(self), fields(response_id = %id))]
    async fn mark_processing(&self, id: ResponseId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE responses SET status = 'processing' WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;

        expect_row(result.rows_affected(), id)
    }

    #[instrument(skip(self, result), fields(response_id = %id, chars = result.text.chars().count()))]
    async fn mark_completed(
        &self,
        id: ResponseId,
        result: &TranscribedAudio,
        transcribed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let outcome = sqlx::query(
            r#"
            UPDATE responses
            SET transcript = $2, language = COALESCE($3, language),
                duration_seconds = COALESCE($4, duration_seconds),
                status = 'completed', error_message = NULL, transcribed_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(&result.text)
        .bind(&result.language)
        .bind(result.duration_seconds.map(|d| d as i32))
        .bind(transcribed_at)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        expect_row(outcome.rows_affected(), id)
    }

    #[instrument(skip(self, error_message), fields(response_id = %id))]
    async fn mark_failed(
        &self,
        id: ResponseId,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE responses SET status = 'failed', error_message = $2 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        expect_row(result.rows_affected(), id)
    }
}
