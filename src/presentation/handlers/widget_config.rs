use axum::Json;
use axum::extract::{Path, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::ServiceError;
use crate::presentation::state::AppState;

use super::error::ApiError;
use super::widget_tenant::request_origin;

const WIDGET_CONFIG_CACHE: &str = "public, max-age=300";

#[derive(Debug, Serialize)]
pub struct WidgetConfigResponse {
    pub max_duration: u32,
    pub language: Option<String>,
    pub show_branding: bool,
}

/// Plan limits the widget needs on load. Public, but domain-locked like the
/// submission routes.
#[tracing::instrument(skip_all)]
pub async fn widget_config_handler(
    State(state): State<AppState>,
    Path(project_key): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let tenant = state
        .tenants
        .resolve_widget(&project_key, request_origin(&headers))
        .await
        .map_err(|e| match e {
            ServiceError::InvalidProjectKey => {
                ApiError::new(StatusCode::NOT_FOUND, "Project not found")
            }
            other => other.into(),
        })?;

    let plan = tenant.quota.plan;
    tracing::debug!(
        project_id = %tenant.project.id,
        tier = %plan.tier,
        "Serving widget config"
    );

    Ok((
        [(CACHE_CONTROL, WIDGET_CONFIG_CACHE)],
        Json(WidgetConfigResponse {
            max_duration: plan.max_duration_secs,
            language: tenant.project.language,
            show_branding: plan.show_branding,
        }),
    ))
}
