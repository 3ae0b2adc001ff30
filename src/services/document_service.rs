use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Document;
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing a document.
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
}

pub struct DocumentService {
    pool: PgPool,
}

impl DocumentService {
    pub const TABLE: &'static str = "documents";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Document> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    pub async fn list(
        &self,
        project_id: Option<Uuid>,
        page: &PageParams,
    ) -> Result<(Vec<Document>, i64), DatabaseError> {
        let filter = ListFilter::new().maybe("project_id", project_id)?;
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    pub async fn insert(&self, draft: &DocumentDraft) -> Result<Document, DatabaseError> {
        let document = sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, project_id, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(draft.project_id)
        .bind(&draft.title)
        .bind(&draft.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn update(&self, id: Uuid, draft: &DocumentDraft) -> Result<Option<Document>, DatabaseError> {
        let document = sqlx::query_as::<_, Document>(
            "UPDATE documents
             SET project_id = $2, title = $3, content = $4, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(draft.project_id)
        .bind(&draft.title)
        .bind(&draft.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }
}
