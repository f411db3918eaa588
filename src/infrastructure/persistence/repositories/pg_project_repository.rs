use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{ProjectRepository, RepositoryError};
use crate::domain::{Project, ProjectId, TranscriptionMode, UserId};

use super::super::pg_error::{corrupt, query_failed};

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    owner_id: Uuid,
    language: Option<String>,
    transcription_mode: String,
    allowed_domains: Vec<String>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = RepositoryError;

    fn try_from(r: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: ProjectId::from_uuid(r.id),
            owner_id: UserId::from_uuid(r.owner_id),
            language: r.language,
            transcription_mode: r
                .transcription_mode
                .parse::<TranscriptionMode>()
                .map_err(|e| corrupt("transcription_mode", e))?,
            allowed_domains: r.allowed_domains,
        })
    }
}

pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    #[instrument(skip(self, public_key))]
    async fn find_by_public_key(
        &self,
        public_key: &str,
    ) -> Result<Option<Project>, RepositoryError> {
        let row: Option<ProjectRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, language, transcription_mode, allowed_domains
            FROM projects
            WHERE public_key = $1
            "#,
        )
        .bind(public_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Project::try_from).transpose()
    }

    #[instrument(skip(self), fields(project_id = %id))]
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let row: Option<ProjectRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, language, transcription_mode, allowed_domains
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Project::try_from).transpose()
    }
}
