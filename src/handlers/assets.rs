// Uploaded asset CRUD controller: /api/assets, list filterable by project.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Asset;
use crate::database::pagination::PageParams;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AssetDraft, AssetService};

use super::shared::{ensure_project_exists, map_all, require_json, FieldErrors, PagedData};

#[derive(Debug, Deserialize)]
pub struct AssetListQuery {
    pub project_id: Option<Uuid>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Request body for both create and full-replace update. The asset body is
/// metadata only; the file itself lives at `url`.
#[derive(Debug, Deserialize)]
pub struct AssetPayload {
    pub project_id: Uuid,
    pub file_name: String,
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<i64>,
}

impl AssetPayload {
    fn validate(self) -> Result<AssetDraft, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("file_name", &self.file_name);
        errors.cap_chars("file_name", &self.file_name, 200);

        errors.require_text("url", &self.url);
        errors.cap_chars("url", &self.url, 2048);
        if !self.url.trim().is_empty() && url::Url::parse(&self.url).is_err() {
            errors.push("url", "url must be a valid URL");
        }

        if let Some(size) = self.size_bytes {
            if size < 0 {
                errors.push("size_bytes", "size_bytes must not be negative");
            }
        }
        errors.finish()?;

        Ok(AssetDraft {
            project_id: self.project_id,
            file_name: self.file_name,
            url: self.url,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AssetDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Asset> for AssetDto {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            project_id: asset.project_id,
            file_name: asset.file_name,
            url: asset.url,
            content_type: asset.content_type,
            size_bytes: asset.size_bytes,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        }
    }
}

async fn service() -> Result<AssetService, ApiError> {
    Ok(AssetService::new(DatabaseManager::pool().await?))
}

fn asset_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("asset {} not found", id))
}

/// GET /api/assets?project_id=...
pub async fn list(Query(query): Query<AssetListQuery>) -> ApiResult<PagedData<AssetDto>> {
    let params = PageParams::clamped(query.page, query.page_size);
    let (assets, total) = service().await?.list(query.project_id, &params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(assets), total, &params)))
}

/// GET /api/assets/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<AssetDto> {
    let asset = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| asset_not_found(id))?;

    Ok(ApiResponse::success(asset.into()))
}

/// POST /api/assets
pub async fn add(payload: Result<Json<AssetPayload>, JsonRejection>) -> ApiResult<AssetDto> {
    let draft = require_json(payload)?.validate()?;
    ensure_project_exists(draft.project_id).await?;

    let asset = service().await?.insert(&draft).await?;
    Ok(ApiResponse::created(asset.into()))
}

/// PUT /api/assets/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<AssetPayload>, JsonRejection>,
) -> ApiResult<AssetDto> {
    let draft = require_json(payload)?.validate()?;
    ensure_project_exists(draft.project_id).await?;

    let asset = service()
        .await?
        .update(id, &draft)
        .await?
        .ok_or_else(|| asset_not_found(id))?;

    Ok(ApiResponse::success(asset.into()))
}

/// DELETE /api/assets/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(asset_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/assets", get(list).post(add))
        .route("/api/assets/:id", get(find).put(update).delete(remove))
}
