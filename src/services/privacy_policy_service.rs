use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::PrivacyPolicy;
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing a privacy-policy revision.
#[derive(Debug, Clone)]
pub struct PrivacyPolicyDraft {
    pub version: i32,
    pub content: String,
}

pub struct PrivacyPolicyService {
    pool: PgPool,
}

impl PrivacyPolicyService {
    pub const TABLE: &'static str = "privacy_policies";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<PrivacyPolicy> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    pub async fn list(&self, page: &PageParams) -> Result<(Vec<PrivacyPolicy>, i64), DatabaseError> {
        let filter = ListFilter::new();
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PrivacyPolicy>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    /// The revision with the highest version number, if any exist.
    pub async fn current(&self) -> Result<Option<PrivacyPolicy>, DatabaseError> {
        let policy = sqlx::query_as::<_, PrivacyPolicy>(
            "SELECT * FROM privacy_policies ORDER BY version DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(policy)
    }

    pub async fn version_taken(&self, version: i32, exclude_id: Option<Uuid>) -> Result<bool, DatabaseError> {
        let row: (i64,) = match exclude_id {
            Some(id) => {
                sqlx::query_as("SELECT COUNT(*) FROM privacy_policies WHERE version = $1 AND id <> $2")
                    .bind(version)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM privacy_policies WHERE version = $1")
                    .bind(version)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(row.0 > 0)
    }

    pub async fn insert(&self, draft: &PrivacyPolicyDraft) -> Result<PrivacyPolicy, DatabaseError> {
        let policy = sqlx::query_as::<_, PrivacyPolicy>(
            "INSERT INTO privacy_policies (id, version, content)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(draft.version)
        .bind(&draft.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(policy)
    }

    pub async fn update(
        &self,
        id: Uuid,
        draft: &PrivacyPolicyDraft,
    ) -> Result<Option<PrivacyPolicy>, DatabaseError> {
        let policy = sqlx::query_as::<_, PrivacyPolicy>(
            "UPDATE privacy_policies
             SET version = $2, content = $3, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(draft.version)
        .bind(&draft.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(policy)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }
}
