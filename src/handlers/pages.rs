// Marketing/content page CRUD controller: /api/pages, addressable by id or slug.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Page;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PageDraft, PageService};

use super::shared::{map_all, require_json, FieldErrors, PageQuery, PagedData};

/// Request body for both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct PagePayload {
    pub slug: String,
    pub title: String,
    pub content: String,
}

impl PagePayload {
    fn validate(self) -> Result<PageDraft, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("slug", &self.slug);
        errors.cap_chars("slug", &self.slug, 120);
        if !is_valid_slug(&self.slug) {
            errors.push("slug", "slug may only contain lowercase letters, digits, and hyphens");
        }

        errors.require_text("title", &self.title);
        errors.cap_chars("title", &self.title, 200);
        errors.require_text("content", &self.content);
        errors.finish()?;

        Ok(PageDraft {
            slug: self.slug,
            title: self.title,
            content: self.content,
        })
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[derive(Debug, Serialize)]
pub struct PageDto {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Page> for PageDto {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            slug: page.slug,
            title: page.title,
            content: page.content,
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

async fn service() -> Result<PageService, ApiError> {
    Ok(PageService::new(DatabaseManager::pool().await?))
}

fn page_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("page {} not found", id))
}

fn slug_conflict(slug: &str) -> ApiError {
    ApiError::conflict(format!("A page with slug '{}' already exists", slug))
}

/// GET /api/pages
pub async fn list(Query(query): Query<PageQuery>) -> ApiResult<PagedData<PageDto>> {
    let params = query.clamped();
    let (pages, total) = service().await?.list(&params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(pages), total, &params)))
}

/// GET /api/pages/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<PageDto> {
    let page = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| page_not_found(id))?;

    Ok(ApiResponse::success(page.into()))
}

/// GET /api/pages/slug/:slug
pub async fn find_by_slug(Path(slug): Path<String>) -> ApiResult<PageDto> {
    let page = service()
        .await?
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("page with slug '{}' not found", slug)))?;

    Ok(ApiResponse::success(page.into()))
}

/// POST /api/pages
pub async fn add(payload: Result<Json<PagePayload>, JsonRejection>) -> ApiResult<PageDto> {
    let draft = require_json(payload)?.validate()?;

    let service = service().await?;
    if service.slug_taken(&draft.slug, None).await? {
        return Err(slug_conflict(&draft.slug));
    }

    let page = service.insert(&draft).await?;
    Ok(ApiResponse::created(page.into()))
}

/// PUT /api/pages/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<PagePayload>, JsonRejection>,
) -> ApiResult<PageDto> {
    let draft = require_json(payload)?.validate()?;

    let service = service().await?;
    if service.slug_taken(&draft.slug, Some(id)).await? {
        return Err(slug_conflict(&draft.slug));
    }

    let page = service
        .update(id, &draft)
        .await?
        .ok_or_else(|| page_not_found(id))?;

    Ok(ApiResponse::success(page.into()))
}

/// DELETE /api/pages/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(page_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/pages", get(list).post(add))
        .route("/api/pages/:id", get(find).put(update).delete(remove))
        .route("/api/pages/slug/:slug", get(find_by_slug))
}
