use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Asset, Document, Project, Scenario};
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing a project.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
}

/// A project plus counts of everything hanging off it.
#[derive(Debug, Clone)]
pub struct ProjectOverview {
    pub project: Project,
    pub scenario_count: i64,
    pub asset_count: i64,
    pub document_count: i64,
}

pub struct ProjectService {
    pool: PgPool,
}

impl ProjectService {
    pub const TABLE: &'static str = "projects";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Project> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    /// One page of projects plus the unfiltered total, fetched concurrently.
    pub async fn list(&self, page: &PageParams) -> Result<(Vec<Project>, i64), DatabaseError> {
        let filter = ListFilter::new();
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    /// Count-based existence check used by child controllers to verify the
    /// project_id foreign key before writing.
    pub async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().exists(id).await
    }

    pub async fn insert(&self, draft: &ProjectDraft) -> Result<Project, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, name, description)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn update(&self, id: Uuid, draft: &ProjectDraft) -> Result<Option<Project>, DatabaseError> {
        let project = sqlx::query_as::<_, Project>(
            "UPDATE projects
             SET name = $2, description = $3, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    /// Hard delete; child rows go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }

    /// Project detail with child counts. The three counts are independent
    /// queries and run concurrently.
    pub async fn overview(&self, id: Uuid) -> Result<Option<ProjectOverview>, DatabaseError> {
        let Some(project) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let by_project = ListFilter::new().eq("project_id", id)?;
        let scenarios = Repository::<Scenario>::new(super::scenario_service::ScenarioService::TABLE, self.pool.clone());
        let assets = Repository::<Asset>::new(super::asset_service::AssetService::TABLE, self.pool.clone());
        let documents = Repository::<Document>::new(super::document_service::DocumentService::TABLE, self.pool.clone());

        let (scenario_count, asset_count, document_count) = futures::try_join!(
            scenarios.count(&by_project),
            assets.count(&by_project),
            documents.count(&by_project)
        )?;

        Ok(Some(ProjectOverview {
            project,
            scenario_count,
            asset_count,
            document_count,
        }))
    }
}
