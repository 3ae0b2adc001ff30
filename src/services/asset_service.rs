use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Asset;
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing an asset record.
#[derive(Debug, Clone)]
pub struct AssetDraft {
    pub project_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
}

pub struct AssetService {
    pool: PgPool,
}

impl AssetService {
    pub const TABLE: &'static str = "assets";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Asset> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    pub async fn list(
        &self,
        project_id: Option<Uuid>,
        page: &PageParams,
    ) -> Result<(Vec<Asset>, i64), DatabaseError> {
        let filter = ListFilter::new().maybe("project_id", project_id)?;
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Asset>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    pub async fn insert(&self, draft: &AssetDraft) -> Result<Asset, DatabaseError> {
        let asset = sqlx::query_as::<_, Asset>(
            "INSERT INTO assets (id, project_id, file_name, url, content_type, size_bytes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(draft.project_id)
        .bind(&draft.file_name)
        .bind(&draft.url)
        .bind(&draft.content_type)
        .bind(draft.size_bytes)
        .fetch_one(&self.pool)
        .await?;

        Ok(asset)
    }

    pub async fn update(&self, id: Uuid, draft: &AssetDraft) -> Result<Option<Asset>, DatabaseError> {
        let asset = sqlx::query_as::<_, Asset>(
            "UPDATE assets
             SET project_id = $2, file_name = $3, url = $4, content_type = $5,
                 size_bytes = $6, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(draft.project_id)
        .bind(&draft.file_name)
        .bind(&draft.url)
        .bind(&draft.content_type)
        .bind(draft.size_bytes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asset)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }
}
