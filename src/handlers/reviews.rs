// Customer review CRUD controller: /api/reviews, list filterable by rating.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Review;
use crate::database::pagination::PageParams;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ReviewDraft, ReviewService};

use super::shared::{map_all, require_json, FieldErrors, PagedData};

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub rating: Option<i32>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Request body for both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct ReviewPayload {
    pub author: String,
    pub rating: i32,
    pub content: String,
}

impl ReviewPayload {
    fn validate(self) -> Result<ReviewDraft, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("author", &self.author);
        errors.cap_chars("author", &self.author, 200);

        if !(1..=5).contains(&self.rating) {
            errors.push("rating", "rating must be between 1 and 5");
        }
        errors.require_text("content", &self.content);
        errors.finish()?;

        Ok(ReviewDraft {
            author: self.author,
            rating: self.rating,
            content: self.content,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewDto {
    pub id: Uuid,
    pub author: String,
    pub rating: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            author: review.author,
            rating: review.rating,
            content: review.content,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

async fn service() -> Result<ReviewService, ApiError> {
    Ok(ReviewService::new(DatabaseManager::pool().await?))
}

fn review_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("review {} not found", id))
}

/// GET /api/reviews?rating=...
pub async fn list(Query(query): Query<ReviewListQuery>) -> ApiResult<PagedData<ReviewDto>> {
    if let Some(rating) = query.rating {
        if !(1..=5).contains(&rating) {
            return Err(ApiError::bad_request("rating filter must be between 1 and 5"));
        }
    }

    let params = PageParams::clamped(query.page, query.page_size);
    let (reviews, total) = service().await?.list(query.rating, &params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(reviews), total, &params)))
}

/// GET /api/reviews/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<ReviewDto> {
    let review = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| review_not_found(id))?;

    Ok(ApiResponse::success(review.into()))
}

/// POST /api/reviews
pub async fn add(payload: Result<Json<ReviewPayload>, JsonRejection>) -> ApiResult<ReviewDto> {
    let draft = require_json(payload)?.validate()?;
    let review = service().await?.insert(&draft).await?;
    Ok(ApiResponse::created(review.into()))
}

/// PUT /api/reviews/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
) -> ApiResult<ReviewDto> {
    let draft = require_json(payload)?.validate()?;
    let review = service()
        .await?
        .update(id, &draft)
        .await?
        .ok_or_else(|| review_not_found(id))?;

    Ok(ApiResponse::success(review.into()))
}

/// DELETE /api/reviews/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(review_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/reviews", get(list).post(add))
        .route("/api/reviews/:id", get(find).put(update).delete(remove))
}
