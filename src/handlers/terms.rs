// Terms-of-service CRUD controller: /api/terms, versioned, with a
// /current route for the revision clients should display.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Terms;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{TermsDraft, TermsService};

use super::shared::{map_all, require_json, FieldErrors, PageQuery, PagedData};

/// Request body for both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct TermsPayload {
    pub version: i32,
    pub content: String,
}

impl TermsPayload {
    fn validate(self) -> Result<TermsDraft, ApiError> {
        let mut errors = FieldErrors::new();
        if self.version < 1 {
            errors.push("version", "version must be at least 1");
        }
        errors.require_text("content", &self.content);
        errors.finish()?;

        Ok(TermsDraft {
            version: self.version,
            content: self.content,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TermsDto {
    pub id: Uuid,
    pub version: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Terms> for TermsDto {
    fn from(terms: Terms) -> Self {
        Self {
            id: terms.id,
            version: terms.version,
            content: terms.content,
            created_at: terms.created_at,
            updated_at: terms.updated_at,
        }
    }
}

async fn service() -> Result<TermsService, ApiError> {
    Ok(TermsService::new(DatabaseManager::pool().await?))
}

fn terms_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("terms {} not found", id))
}

fn version_conflict(version: i32) -> ApiError {
    ApiError::conflict(format!("Terms of service version {} already exists", version))
}

/// GET /api/terms
pub async fn list(Query(query): Query<PageQuery>) -> ApiResult<PagedData<TermsDto>> {
    let params = query.clamped();
    let (terms, total) = service().await?.list(&params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(terms), total, &params)))
}

/// GET /api/terms/current
pub async fn current() -> ApiResult<TermsDto> {
    let terms = service()
        .await?
        .current()
        .await?
        .ok_or_else(|| ApiError::not_found("no terms of service published"))?;

    Ok(ApiResponse::success(terms.into()))
}

/// GET /api/terms/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<TermsDto> {
    let terms = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| terms_not_found(id))?;

    Ok(ApiResponse::success(terms.into()))
}

/// POST /api/terms
pub async fn add(payload: Result<Json<TermsPayload>, JsonRejection>) -> ApiResult<TermsDto> {
    let draft = require_json(payload)?.validate()?;

    let service = service().await?;
    if service.version_taken(draft.version, None).await? {
        return Err(version_conflict(draft.version));
    }

    let terms = service.insert(&draft).await?;
    Ok(ApiResponse::created(terms.into()))
}

/// PUT /api/terms/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<TermsPayload>, JsonRejection>,
) -> ApiResult<TermsDto> {
    let draft = require_json(payload)?.validate()?;

    let service = service().await?;
    if service.version_taken(draft.version, Some(id)).await? {
        return Err(version_conflict(draft.version));
    }

    let terms = service
        .update(id, &draft)
        .await?
        .ok_or_else(|| terms_not_found(id))?;

    Ok(ApiResponse::success(terms.into()))
}

/// DELETE /api/terms/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(terms_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    // Static /current is registered alongside /:id; the router prefers the
    // static segment.
    Router::new()
        .route("/api/terms", get(list).post(add))
        .route("/api/terms/current", get(current))
        .route("/api/terms/:id", get(find).put(update).delete(remove))
}
