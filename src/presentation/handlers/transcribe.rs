use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;

use crate::application::services::IngestOutcome;
use crate::infrastructure::observability::transcript_preview;
use crate::presentation::state::AppState;

use super::audio_form::read_audio_submission;
use super::error::ApiError;
use super::widget_tenant::WidgetTenant;

#[derive(Serialize)]
pub struct AudioResponse {
    pub success: bool,
    pub recording_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<IngestOutcome> for AudioResponse {
    fn from(outcome: IngestOutcome) -> Self {
        Self {
            success: true,
            recording_id: outcome.response_id.to_string(),
            status: outcome.status.to_string(),
            transcription: outcome.transcript,
            error: outcome.message,
        }
    }
}

/// Transcribes a voice answer synchronously.
#[tracing::instrument(skip_all, fields(project_id = %tenant.project.id))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    WidgetTenant(tenant): WidgetTenant,
    multipart: Multipart,
) -> Result<Json<AudioResponse>, ApiError> {
    let submission = read_audio_submission(multipart).await?;
    let outcome = state.ingestion_service.ingest(&tenant, submission).await?;
    if let Some(text) = &outcome.transcript {
        tracing::debug!(transcript = %transcript_preview(text), "Returning transcript");
    }
    Ok(Json(outcome.into()))
}

/// Stores a voice answer for deferred transcription.
#[tracing::instrument(skip_all, fields(project_id = %tenant.project.id))]
pub async fn upload_handler(
    State(state): State<AppState>,
    WidgetTenant(tenant): WidgetTenant,
    multipart: Multipart,
) -> Result<Json<AudioResponse>, ApiError> {
    let submission = read_audio_submission(multipart).await?;
    let outcome = state.ingestion_service.stage(&tenant, submission).await?;
    Ok(Json(outcome.into()))
}
