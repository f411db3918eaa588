use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{ORIGIN, REFERER};
use axum::http::request::Parts;
use url::Url;

use crate::application::services::TenantContext;
use crate::presentation::state::AppState;

use super::error::ApiError;

pub const PROJECT_KEY_HEADER: &str = "x-project-key";

/// Tenant of a widget request, authenticated by the `x-project-key` header.
pub struct WidgetTenant(pub TenantContext);

/// The `Origin` header, else the origin of the `Referer`.
pub fn request_origin(headers: &HeaderMap) -> Option<String> {
    let origin = headers
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && *v != "null");
    if let Some(origin) = origin {
        return Some(origin.to_string());
    }

    headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .map(|url| url.origin().ascii_serialization())
        .filter(|origin| origin != "null")
}

impl FromRequestParts<AppState> for WidgetTenant {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(PROJECT_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Missing x-project-key header"))?;

        let tenant = state
            .tenants
            .resolve_widget(key, request_origin(&parts.headers))
            .await?;

        Ok(WidgetTenant(tenant))
    }
}
