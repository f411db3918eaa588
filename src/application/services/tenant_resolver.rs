use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::ProjectRepository;
use crate::domain::{Project, ProjectId};

use super::{QuotaResolver, QuotaStatus, ServiceError, TtlCache, authorize_origin};

/// Everything a request handler needs to know about the calling tenant.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub project: Project,
    pub quota: QuotaStatus,
    /// Origin (or referer origin) of the embedding page.
    pub origin: Option<String>,
}

pub struct TenantResolver {
    projects: Arc<dyn ProjectRepository>,
    quota: Arc<QuotaResolver>,
    by_public_key: TtlCache<String, Project>,
}

impl TenantResolver {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        quota: Arc<QuotaResolver>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            projects,
            quota,
            by_public_key: TtlCache::new(cache_ttl),
        }
    }

    /// Resolves a widget request: project key lookup, domain lock, quota.
    #[tracing::instrument(skip(self, public_key))]
    pub async fn resolve_widget(
        &self,
        public_key: &str,
        origin: Option<String>,
    ) -> Result<TenantContext, ServiceError> {
        let key = public_key.to_string();
        let project = self
            .by_public_key
            .get_or_refresh(&key, || self.projects.find_by_public_key(public_key))
            .await?
            .ok_or(ServiceError::InvalidProjectKey)?;

        authorize_origin(&project, origin.as_deref())?;

        let quota = self.quota.resolve(project.owner_id).await?;

        Ok(TenantContext {
            project,
            quota,
            origin,
        })
    }

    /// Resolves a dashboard request addressed by project id.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_project(&self, project_id: ProjectId) -> Result<TenantContext, ServiceError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

        let quota = self.quota.resolve(project.owner_id).await?;

        Ok(TenantContext {
            project,
            quota,
            origin: None,
        })
    }
}
