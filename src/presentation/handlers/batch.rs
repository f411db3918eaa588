use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::{BatchProgress, BatchQuote};
use crate::domain::{BatchId, ProjectId};
use crate::presentation::state::AppState;

use super::error::ApiError;

#[derive(Deserialize)]
pub struct BatchQuoteRequest {
    pub session_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct QuoteSummary {
    pub requested: usize,
    pub found: usize,
    pub not_found: usize,
    pub already_transcribed: usize,
    pub to_transcribe: usize,
}

#[derive(Serialize)]
pub struct BatchQuoteResponse {
    pub success: bool,
    pub batch_id: String,
    pub summary: QuoteSummary,
    pub not_found_session_ids: Vec<String>,
    pub estimated_duration_minutes: u64,
    pub estimated_cost_usd: f64,
    pub status: String,
}

impl From<BatchQuote> for BatchQuoteResponse {
    fn from(q: BatchQuote) -> Self {
        Self {
            success: true,
            batch_id: q.batch_id.to_string(),
            summary: QuoteSummary {
                requested: q.requested,
                found: q.found,
                not_found: q.not_found,
                already_transcribed: q.already_transcribed,
                to_transcribe: q.to_transcribe,
            },
            not_found_session_ids: q.not_found_session_ids,
            estimated_duration_minutes: q.estimated_duration_minutes,
            estimated_cost_usd: q.estimated_cost_usd,
            status: q.status.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct BatchProgressCounts {
    pub total: u32,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
}

#[derive(Serialize)]
pub struct FailedRecording {
    pub id: String,
    pub session_id: String,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct BatchStatusResponse {
    pub batch_id: String,
    pub status: String,
    pub progress: BatchProgressCounts,
    pub failed_recordings: Vec<FailedRecording>,
    pub estimated_cost_usd: f64,
    pub actual_cost_usd: Option<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<BatchProgress> for BatchStatusResponse {
    fn from(p: BatchProgress) -> Self {
        Self {
            batch_id: p.batch_id.to_string(),
            status: p.status.to_string(),
            progress: BatchProgressCounts {
                total: p.total,
                completed: p.completed,
                failed: p.failed,
                pending: p.pending,
            },
            failed_recordings: p
                .failed_items
                .into_iter()
                .map(|item| FailedRecording {
                    id: item.response_id.to_string(),
                    session_id: item.session_id,
                    error: item.error,
                })
                .collect(),
            estimated_cost_usd: p.estimated_cost_usd,
            actual_cost_usd: p.actual_cost_usd,
            started_at: p.started_at,
            estimated_completion: p.estimated_completion,
            completed_at: p.completed_at,
        }
    }
}

#[derive(Serialize)]
pub struct BatchConfirmResponse {
    pub success: bool,
    pub batch_id: String,
    pub status: String,
    pub recordings_queued: usize,
    pub estimated_completion: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct BatchCancelResponse {
    pub success: bool,
    pub batch_id: String,
    pub status: String,
}

pub(super) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {}: {}", what, raw)))
}

fn batch_path(project_id: &str, batch_id: &str) -> Result<(ProjectId, BatchId), ApiError> {
    Ok((
        ProjectId::from_uuid(parse_id(project_id, "project ID")?),
        BatchId::from_uuid(parse_id(batch_id, "batch ID")?),
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn batch_quote_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    payload: Result<Json<BatchQuoteRequest>, JsonRejection>,
) -> Result<Json<BatchQuoteResponse>, ApiError> {
    let project_id = ProjectId::from_uuid(parse_id(&project_id, "project ID")?);
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let tenant = state.tenants.resolve_project(project_id).await?;
    let quote = state
        .batch_service
        .quote(&tenant, request.session_ids)
        .await?;

    Ok(Json(quote.into()))
}

#[tracing::instrument(skip(state))]
pub async fn batch_status_handler(
    State(state): State<AppState>,
    Path((project_id, batch_id)): Path<(String, String)>,
) -> Result<Json<BatchStatusResponse>, ApiError> {
    let (project_id, batch_id) = batch_path(&project_id, &batch_id)?;
    let progress = state.batch_service.status(project_id, batch_id).await?;
    Ok(Json(progress.into()))
}

#[tracing::instrument(skip(state))]
pub async fn batch_confirm_handler(
    State(state): State<AppState>,
    Path((project_id, batch_id)): Path<(String, String)>,
) -> Result<Json<BatchConfirmResponse>, ApiError> {
    let (project_id, batch_id) = batch_path(&project_id, &batch_id)?;
    let confirmed = state.batch_service.confirm(project_id, batch_id).await?;

    Ok(Json(BatchConfirmResponse {
        success: true,
        batch_id: confirmed.batch_id.to_string(),
        status: confirmed.status.to_string(),
        recordings_queued: confirmed.queued,
        estimated_completion: confirmed.estimated_completion,
    }))
}

#[tracing::instrument(skip(state))]
pub async fn batch_cancel_handler(
    State(state): State<AppState>,
    Path((project_id, batch_id)): Path<(String, String)>,
) -> Result<Json<BatchCancelResponse>, ApiError> {
    let (project_id, batch_id) = batch_path(&project_id, &batch_id)?;
    let status = state.batch_service.cancel(project_id, batch_id).await?;

    Ok(Json(BatchCancelResponse {
        success: true,
        batch_id: batch_id.to_string(),
        status: status.to_string(),
    }))
}
