use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::domain::{ProjectId, ResponseId};
use crate::presentation::state::AppState;

use super::batch::parse_id;
use super::error::ApiError;

#[derive(Serialize)]
pub struct RetranscribeResponse {
    pub success: bool,
    pub recording_id: String,
    pub status: String,
}

#[tracing::instrument(skip(state))]
pub async fn retranscribe_handler(
    State(state): State<AppState>,
    Path((project_id, response_id)): Path<(String, String)>,
) -> Result<Json<RetranscribeResponse>, ApiError> {
    let project_id = ProjectId::from_uuid(parse_id(&project_id, "project ID")?);
    let response_id = ResponseId::from_uuid(parse_id(&response_id, "recording ID")?);

    state
        .response_service
        .retranscribe(project_id, response_id)
        .await?;

    Ok(Json(RetranscribeResponse {
        success: true,
        recording_id: response_id.to_string(),
        status: "processing".to_string(),
    }))
}
