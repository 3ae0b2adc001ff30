// Project document CRUD controller: /api/documents, list filterable by project.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Document;
use crate::database::pagination::PageParams;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{DocumentDraft, DocumentService};

use super::shared::{ensure_project_exists, map_all, require_json, FieldErrors, PagedData};

#[derive(Debug, Deserialize)]
pub struct DocumentListQuery {
    pub project_id: Option<Uuid>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Request body for both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct DocumentPayload {
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
}

impl DocumentPayload {
    fn validate(self) -> Result<DocumentDraft, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("title", &self.title);
        errors.cap_chars("title", &self.title, 200);
        errors.require_text("content", &self.content);
        errors.finish()?;

        Ok(DocumentDraft {
            project_id: self.project_id,
            title: self.title,
            content: self.content,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentDto {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            project_id: document.project_id,
            title: document.title,
            content: document.content,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

async fn service() -> Result<DocumentService, ApiError> {
    Ok(DocumentService::new(DatabaseManager::pool().await?))
}

fn document_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("document {} not found", id))
}

/// GET /api/documents?project_id=...
pub async fn list(Query(query): Query<DocumentListQuery>) -> ApiResult<PagedData<DocumentDto>> {
    let params = PageParams::clamped(query.page, query.page_size);
    let (documents, total) = service().await?.list(query.project_id, &params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(documents), total, &params)))
}

/// GET /api/documents/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<DocumentDto> {
    let document = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| document_not_found(id))?;

    Ok(ApiResponse::success(document.into()))
}

/// POST /api/documents
pub async fn add(payload: Result<Json<DocumentPayload>, JsonRejection>) -> ApiResult<DocumentDto> {
    let draft = require_json(payload)?.validate()?;
    ensure_project_exists(draft.project_id).await?;

    let document = service().await?.insert(&draft).await?;
    Ok(ApiResponse::created(document.into()))
}

/// PUT /api/documents/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<DocumentPayload>, JsonRejection>,
) -> ApiResult<DocumentDto> {
    let draft = require_json(payload)?.validate()?;
    ensure_project_exists(draft.project_id).await?;

    let document = service()
        .await?
        .update(id, &draft)
        .await?
        .ok_or_else(|| document_not_found(id))?;

    Ok(ApiResponse::success(document.into()))
}

/// DELETE /api/documents/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(document_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/documents", get(list).post(add))
        .route("/api/documents/:id", get(find).put(update).delete(remove))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_is_rejected() {
        let payload = DocumentPayload {
            project_id: Uuid::new_v4(),
            title: "Release notes".to_string(),
            content: "\n\t ".to_string(),
        };

        let body = payload.validate().unwrap_err().to_json();
        assert_eq!(body["field_errors"]["content"], "content is required");
    }
}
