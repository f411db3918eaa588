use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{ProjectRepository, RepositoryError};
use crate::domain::{Project, ProjectId};

/// Projects keyed by their public widget key.
#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: RwLock<HashMap<String, Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, public_key: impl Into<String>, project: Project) {
        self.projects
            .write()
            .await
            .insert(public_key.into(), project);
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn find_by_public_key(
        &self,
        public_key: &str,
    ) -> Result<Option<Project>, RepositoryError> {
        Ok(self.projects.read().await.get(public_key).cloned())
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        Ok(self
            .projects
            .read()
            .await
            .values()
            .find(|p| p.id == id)
            .cloned())
    }
}
