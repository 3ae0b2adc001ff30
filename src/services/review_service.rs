use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Review;
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing a customer review.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub author: String,
    pub rating: i32,
    pub content: String,
}

pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub const TABLE: &'static str = "reviews";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Review> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    /// One page of reviews, optionally narrowed to a single star rating.
    pub async fn list(
        &self,
        rating: Option<i32>,
        page: &PageParams,
    ) -> Result<(Vec<Review>, i64), DatabaseError> {
        let filter = ListFilter::new().maybe("rating", rating)?;
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    pub async fn insert(&self, draft: &ReviewDraft) -> Result<Review, DatabaseError> {
        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (id, author, rating, content)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.author)
        .bind(draft.rating)
        .bind(&draft.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn update(&self, id: Uuid, draft: &ReviewDraft) -> Result<Option<Review>, DatabaseError> {
        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews
             SET author = $2, rating = $3, content = $4, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&draft.author)
        .bind(draft.rating)
        .bind(&draft.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }
}
