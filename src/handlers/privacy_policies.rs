// Privacy policy CRUD controller: versioned like terms, with /current.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::PrivacyPolicy;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PrivacyPolicyDraft, PrivacyPolicyService};

use super::shared::{map_all, require_json, FieldErrors, PageQuery, PagedData};

/// Request body for both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct PrivacyPolicyPayload {
    pub version: i32,
    pub content: String,
}

impl PrivacyPolicyPayload {
    fn validate(self) -> Result<PrivacyPolicyDraft, ApiError> {
        let mut errors = FieldErrors::new();
        if self.version < 1 {
            errors.push("version", "version must be at least 1");
        }
        errors.require_text("content", &self.content);
        errors.finish()?;

        Ok(PrivacyPolicyDraft {
            version: self.version,
            content: self.content,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PrivacyPolicyDto {
    pub id: Uuid,
    pub version: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PrivacyPolicy> for PrivacyPolicyDto {
    fn from(policy: PrivacyPolicy) -> Self {
        Self {
            id: policy.id,
            version: policy.version,
            content: policy.content,
            created_at: policy.created_at,
            updated_at: policy.updated_at,
        }
    }
}

async fn service() -> Result<PrivacyPolicyService, ApiError> {
    Ok(PrivacyPolicyService::new(DatabaseManager::pool().await?))
}

fn policy_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("privacy policy {} not found", id))
}

fn version_conflict(version: i32) -> ApiError {
    ApiError::conflict(format!("Privacy policy version {} already exists", version))
}

/// GET /api/privacy-policies
pub async fn list(Query(query): Query<PageQuery>) -> ApiResult<PagedData<PrivacyPolicyDto>> {
    let params = query.clamped();
    let (policies, total) = service().await?.list(&params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(policies), total, &params)))
}

/// GET /api/privacy-policies/current
pub async fn current() -> ApiResult<PrivacyPolicyDto> {
    let policy = service()
        .await?
        .current()
        .await?
        .ok_or_else(|| ApiError::not_found("no privacy policy published"))?;

    Ok(ApiResponse::success(policy.into()))
}

/// GET /api/privacy-policies/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<PrivacyPolicyDto> {
    let policy = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| policy_not_found(id))?;

    Ok(ApiResponse::success(policy.into()))
}

/// POST /api/privacy-policies
pub async fn add(
    payload: Result<Json<PrivacyPolicyPayload>, JsonRejection>,
) -> ApiResult<PrivacyPolicyDto> {
    let draft = require_json(payload)?.validate()?;

    let service = service().await?;
    if service.version_taken(draft.version, None).await? {
        return Err(version_conflict(draft.version));
    }

    let policy = service.insert(&draft).await?;
    Ok(ApiResponse::created(policy.into()))
}

/// PUT /api/privacy-policies/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<PrivacyPolicyPayload>, JsonRejection>,
) -> ApiResult<PrivacyPolicyDto> {
    let draft = require_json(payload)?.validate()?;

    let service = service().await?;
    if service.version_taken(draft.version, Some(id)).await? {
        return Err(version_conflict(draft.version));
    }

    let policy = service
        .update(id, &draft)
        .await?
        .ok_or_else(|| policy_not_found(id))?;

    Ok(ApiResponse::success(policy.into()))
}

/// DELETE /api/privacy-policies/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(policy_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/privacy-policies", get(list).post(add))
        .route("/api/privacy-policies/current", get(current))
        .route("/api/privacy-policies/:id", get(find).put(update).delete(remove))
}
