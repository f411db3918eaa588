use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::ServiceError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Handler failure rendered as `{ "success": false, "error": ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::InvalidProjectKey => Self::unauthorized("Invalid project key"),
            ServiceError::Validation(message) => Self::bad_request(message),
            ServiceError::QuotaExceeded { used, limit } => ApiError {
                status: StatusCode::PAYMENT_REQUIRED,
                message: "Monthly response limit reached. Upgrade your plan to continue."
                    .to_string(),
                details: Some(json!({ "usage": used, "limit": limit })),
            },
            ServiceError::DomainUnauthorized(origin) => {
                tracing::warn!(origin = ?origin, "Request from unauthorized origin");
                Self::new(StatusCode::FORBIDDEN, "Domain not authorized for this project")
            }
            e @ ServiceError::PlanFeatureUnavailable(_) => {
                Self::new(StatusCode::FORBIDDEN, e.to_string())
            }
            ServiceError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            ServiceError::InvalidState(message) => Self::new(StatusCode::CONFLICT, message),
            e @ ServiceError::QueueUnavailable(_) => {
                tracing::warn!(error = %e, "Transcription queue rejected job");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Transcription queue is busy, try again shortly",
                )
            }
            e @ (ServiceError::Storage(_) | ServiceError::Repository(_)) => {
                tracing::error!(error = %e, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                success: false,
                error: self.message,
                details: self.details,
            }),
        )
            .into_response()
    }
}
