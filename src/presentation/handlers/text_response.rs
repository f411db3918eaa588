use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::application::services::TextSubmission;
use crate::domain::Metadata;
use crate::infrastructure::observability::transcript_preview;
use crate::presentation::state::AppState;

use super::error::ApiError;
use super::widget_tenant::WidgetTenant;

#[derive(Deserialize)]
pub struct TextResponseRequest {
    pub session_id: String,
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Serialize)]
pub struct TextResponseBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_id: Option<String>,
    pub status: String,
    pub action: String,
}

#[tracing::instrument(skip_all, fields(project_id = %tenant.project.id))]
pub async fn text_response_handler(
    State(state): State<AppState>,
    WidgetTenant(tenant): WidgetTenant,
    payload: Result<Json<TextResponseRequest>, JsonRejection>,
) -> Result<Json<TextResponseBody>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    tracing::debug!(text = %transcript_preview(&request.text), "Processing text response");
    let outcome = state
        .text_response_service
        .upsert(
            &tenant,
            TextSubmission {
                session_id: request.session_id,
                question_id: request.question_id,
                text: request.text,
                language: request.language,
                metadata: request.metadata,
            },
        )
        .await?;

    Ok(Json(TextResponseBody {
        success: true,
        recording_id: outcome.response_id.map(|id| id.to_string()),
        status: outcome.status().to_string(),
        action: outcome.action.to_string(),
    }))
}
