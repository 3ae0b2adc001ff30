use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Terms;
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing a terms-of-service revision.
#[derive(Debug, Clone)]
pub struct TermsDraft {
    pub version: i32,
    pub content: String,
}

pub struct TermsService {
    pool: PgPool,
}

impl TermsService {
    pub const TABLE: &'static str = "terms";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Terms> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    pub async fn list(&self, page: &PageParams) -> Result<(Vec<Terms>, i64), DatabaseError> {
        let filter = ListFilter::new();
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Terms>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    /// The revision with the highest version number, if any exist.
    pub async fn current(&self) -> Result<Option<Terms>, DatabaseError> {
        let terms = sqlx::query_as::<_, Terms>("SELECT * FROM terms ORDER BY version DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(terms)
    }

    /// Count-based check so a duplicate version surfaces as a 409 before
    /// insert. `exclude_id` lets an update keep its own version number.
    pub async fn version_taken(&self, version: i32, exclude_id: Option<Uuid>) -> Result<bool, DatabaseError> {
        let row: (i64,) = match exclude_id {
            Some(id) => {
                sqlx::query_as("SELECT COUNT(*) FROM terms WHERE version = $1 AND id <> $2")
                    .bind(version)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM terms WHERE version = $1")
                    .bind(version)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(row.0 > 0)
    }

    pub async fn insert(&self, draft: &TermsDraft) -> Result<Terms, DatabaseError> {
        let terms = sqlx::query_as::<_, Terms>(
            "INSERT INTO terms (id, version, content)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(draft.version)
        .bind(&draft.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(terms)
    }

    pub async fn update(&self, id: Uuid, draft: &TermsDraft) -> Result<Option<Terms>, DatabaseError> {
        let terms = sqlx::query_as::<_, Terms>(
            "UPDATE terms
             SET version = $2, content = $3, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(draft.version)
        .bind(&draft.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(terms)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }
}
