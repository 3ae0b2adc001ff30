use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Scenario;
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing a test scenario.
#[derive(Debug, Clone)]
pub struct ScenarioDraft {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub steps: String,
    pub expected_result: Option<String>,
}

pub struct ScenarioService {
    pool: PgPool,
}

impl ScenarioService {
    pub const TABLE: &'static str = "scenarios";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Scenario> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    /// One page of scenarios, optionally scoped to a project.
    pub async fn list(
        &self,
        project_id: Option<Uuid>,
        page: &PageParams,
    ) -> Result<(Vec<Scenario>, i64), DatabaseError> {
        let filter = ListFilter::new().maybe("project_id", project_id)?;
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Scenario>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    pub async fn insert(&self, draft: &ScenarioDraft) -> Result<Scenario, DatabaseError> {
        let scenario = sqlx::query_as::<_, Scenario>(
            "INSERT INTO scenarios (id, project_id, title, description, steps, expected_result)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(draft.project_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.steps)
        .bind(&draft.expected_result)
        .fetch_one(&self.pool)
        .await?;

        Ok(scenario)
    }

    pub async fn update(&self, id: Uuid, draft: &ScenarioDraft) -> Result<Option<Scenario>, DatabaseError> {
        let scenario = sqlx::query_as::<_, Scenario>(
            "UPDATE scenarios
             SET project_id = $2, title = $3, description = $4, steps = $5,
                 expected_result = $6, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(draft.project_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.steps)
        .bind(&draft.expected_result)
        .fetch_optional(&self.pool)
        .await?;

        Ok(scenario)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }
}
