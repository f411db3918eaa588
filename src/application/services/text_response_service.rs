use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{RepositoryError, ResponseRepository};
use crate::domain::{Metadata, Response, ResponseId, ResponseKey, enrich_metadata};

use super::{
    QuotaResolver, ServiceError, TenantContext, validate_language, validate_question_id,
    validate_session_id,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAction {
    Created,
    Updated,
    Cleared,
    Noop,
}

impl TextAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAction::Created => "created",
            TextAction::Updated => "updated",
            TextAction::Cleared => "cleared",
            TextAction::Noop => "noop",
        }
    }
}

impl fmt::Display for TextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct TextSubmission {
    pub session_id: String,
    pub question_id: Option<String>,
    pub text: String,
    pub language: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextOutcome {
    pub action: TextAction,
    pub response_id: Option<ResponseId>,
}

impl TextOutcome {
    /// Row status reported back to the widget.
    pub fn status(&self) -> &'static str {
        match self.action {
            TextAction::Created | TextAction::Updated => "completed",
            TextAction::Cleared | TextAction::Noop => "cleared",
        }
    }
}

/// Create/update/clear for typed answers, one live row per (project, session, question).
pub struct TextResponseService {
    responses: Arc<dyn ResponseRepository>,
    quota: Arc<QuotaResolver>,
    max_text_chars: usize,
}

impl TextResponseService {
    pub fn new(
        responses: Arc<dyn ResponseRepository>,
        quota: Arc<QuotaResolver>,
        max_text_chars: usize,
    ) -> Self {
        Self {
            responses,
            quota,
            max_text_chars,
        }
    }

    #[tracing::instrument(
        skip(self, tenant, submission),
        fields(project_id = %tenant.project.id, session_id = %submission.session_id)
    )]
    pub async fn upsert(
        &self,
        tenant: &TenantContext,
        submission: TextSubmission,
    ) -> Result<TextOutcome, ServiceError> {
        validate_session_id(&submission.session_id)?;
        validate_question_id(submission.question_id.as_deref())?;
        validate_language(submission.language.as_deref(), tenant.quota.plan)?;

        let text = submission.text.trim();
        if text.chars().count() > self.max_text_chars {
            return Err(ServiceError::Validation(format!(
                "text must be at most {} characters",
                self.max_text_chars
            )));
        }

        let key = ResponseKey::new(
            tenant.project.id,
            submission.session_id.clone(),
            submission.question_id.clone().filter(|q| !q.is_empty()),
        );
        let existing = self.responses.find_text_response(&key).await?;

        if text.is_empty() {
            return match existing {
                Some(row) => {
                    self.responses.delete(row.id).await?;
                    tracing::info!(response_id = %row.id, "Text response cleared");
                    Ok(TextOutcome {
                        action: TextAction::Cleared,
                        response_id: Some(row.id),
                    })
                }
                None => Ok(TextOutcome {
                    action: TextAction::Noop,
                    response_id: None,
                }),
            };
        }

        let language = submission
            .language
            .clone()
            .or_else(|| tenant.project.language.clone());
        let metadata = enrich_metadata(submission.metadata, tenant.origin.as_deref());

        if let Some(row) = existing {
            return self.update(row.id, text, language.as_deref(), &metadata).await;
        }

        tenant.quota.ensure_available()?;

        let response = Response::typed(key.clone(), text.to_string(), language.clone(), metadata.clone());
        match self.responses.insert(&response).await {
            Ok(()) => {}
            Err(RepositoryError::ConstraintViolation(_)) => {
                // A concurrent save created the row first; fold this one into an update.
                let row = self
                    .responses
                    .find_text_response(&key)
                    .await?
                    .ok_or_else(|| ServiceError::InvalidState("text response vanished".to_string()))?;
                return self.update(row.id, text, language.as_deref(), &metadata).await;
            }
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = self.quota.record_completion(&tenant.quota).await {
            tracing::error!(error = %e, response_id = %response.id, "Failed to increment usage");
        }

        tracing::info!(response_id = %response.id, chars = text.chars().count(), "Text response created");

        Ok(TextOutcome {
            action: TextAction::Created,
            response_id: Some(response.id),
        })
    }

    async fn update(
        &self,
        id: ResponseId,
        text: &str,
        language: Option<&str>,
        metadata: &Metadata,
    ) -> Result<TextOutcome, ServiceError> {
        self.responses
            .update_text(id, text, language, metadata, Utc::now())
            .await?;
        tracing::debug!(response_id = %id, "Text response updated");
        Ok(TextOutcome {
            action: TextAction::Updated,
            response_id: Some(id),
        })
    }
}
