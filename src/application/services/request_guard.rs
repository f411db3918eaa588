use crate::domain::{Plan, Project, is_origin_allowed};

use super::ServiceError;

/// Rejects requests from origins outside the project's allow-list.
pub fn authorize_origin(project: &Project, origin: Option<&str>) -> Result<(), ServiceError> {
    if is_origin_allowed(origin, &project.allowed_domains) {
        Ok(())
    } else {
        tracing::warn!(
            project_id = %project.id,
            origin = origin.unwrap_or("<none>"),
            "Origin rejected by domain allow-list"
        );
        Err(ServiceError::DomainUnauthorized(origin.map(str::to_string)))
    }
}

/// Rejects a declared duration above the plan limit before any provider work.
pub fn check_duration(duration_seconds: Option<u32>, plan: &Plan) -> Result<(), ServiceError> {
    match duration_seconds {
        Some(seconds) if !plan.allows_duration(seconds) => Err(ServiceError::Validation(format!(
            "Audio too long. Maximum duration for your plan: {} seconds",
            plan.max_duration_secs
        ))),
        _ => Ok(()),
    }
}

pub fn validate_session_id(session_id: &str) -> Result<(), ServiceError> {
    let valid_chars = session_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
    if session_id.is_empty() || session_id.len() > 100 || !valid_chars {
        return Err(ServiceError::Validation(
            "session_id must be 1-100 characters of [a-zA-Z0-9_-.:]".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_question_id(question_id: Option<&str>) -> Result<(), ServiceError> {
    match question_id {
        Some(q) if q.chars().count() > 50 => Err(ServiceError::Validation(
            "question_id must be at most 50 characters".to_string(),
        )),
        _ => Ok(()),
    }
}

/// An explicit language must be supported by the provider and included in the plan.
pub fn validate_language(language: Option<&str>, plan: &Plan) -> Result<(), ServiceError> {
    let Some(code) = language else {
        return Ok(());
    };
    if !crate::domain::language::is_supported(code) {
        return Err(ServiceError::Validation(format!(
            "Unsupported language: {}",
            code
        )));
    }
    if !plan.allows_language(code) {
        return Err(ServiceError::Validation(format!(
            "Language {} is not available on the {} plan",
            code, plan.tier
        )));
    }
    Ok(())
}
