use async_trait::async_trait;

use crate::domain::{Project, ProjectId};

use super::RepositoryError;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_public_key(&self, public_key: &str)
        -> Result<Option<Project>, RepositoryError>;

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;
}
