use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Page;
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing a content page.
#[derive(Debug, Clone)]
pub struct PageDraft {
    pub slug: String,
    pub title: String,
    pub content: String,
}

pub struct PageService {
    pool: PgPool,
}

impl PageService {
    pub const TABLE: &'static str = "pages";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Page> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    pub async fn list(&self, page: &PageParams) -> Result<(Vec<Page>, i64), DatabaseError> {
        let filter = ListFilter::new();
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, DatabaseError> {
        let page = sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(page)
    }

    /// Count-based check so slug conflicts surface as a 409 before insert,
    /// not as a raw unique-violation. `exclude_id` lets an update keep its
    /// own slug.
    pub async fn slug_taken(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, DatabaseError> {
        let row: (i64,) = match exclude_id {
            Some(id) => {
                sqlx::query_as("SELECT COUNT(*) FROM pages WHERE slug = $1 AND id <> $2")
                    .bind(slug)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM pages WHERE slug = $1")
                    .bind(slug)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(row.0 > 0)
    }

    pub async fn insert(&self, draft: &PageDraft) -> Result<Page, DatabaseError> {
        let page = sqlx::query_as::<_, Page>(
            "INSERT INTO pages (id, slug, title, content)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.slug)
        .bind(&draft.title)
        .bind(&draft.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(page)
    }

    pub async fn update(&self, id: Uuid, draft: &PageDraft) -> Result<Option<Page>, DatabaseError> {
        let page = sqlx::query_as::<_, Page>(
            "UPDATE pages
             SET slug = $2, title = $3, content = $4, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&draft.slug)
        .bind(&draft.title)
        .bind(&draft.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }
}
