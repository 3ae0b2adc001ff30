// Project CRUD controller: DTOs, validation, and the /api/projects routes.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Project;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ProjectDraft, ProjectOverview, ProjectService};

use super::shared::{map_all, require_json, FieldErrors, PageQuery, PagedData};

/// Request body for both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct ProjectPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectPayload {
    fn validate(self) -> Result<ProjectDraft, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name);
        errors.cap_chars("name", &self.name, 200);
        errors.finish()?;

        Ok(ProjectDraft {
            name: self.name,
            description: self.description,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectDto {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Project detail plus counts of its scenarios, assets, and documents.
#[derive(Debug, Serialize)]
pub struct ProjectOverviewDto {
    #[serde(flatten)]
    pub project: ProjectDto,
    pub scenario_count: i64,
    pub asset_count: i64,
    pub document_count: i64,
}

impl From<ProjectOverview> for ProjectOverviewDto {
    fn from(overview: ProjectOverview) -> Self {
        Self {
            project: overview.project.into(),
            scenario_count: overview.scenario_count,
            asset_count: overview.asset_count,
            document_count: overview.document_count,
        }
    }
}

async fn service() -> Result<ProjectService, ApiError> {
    Ok(ProjectService::new(DatabaseManager::pool().await?))
}

fn project_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("project {} not found", id))
}

/// GET /api/projects
pub async fn list(Query(query): Query<PageQuery>) -> ApiResult<PagedData<ProjectDto>> {
    let params = query.clamped();
    let (projects, total) = service().await?.list(&params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(projects), total, &params)))
}

/// GET /api/projects/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<ProjectDto> {
    let project = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    Ok(ApiResponse::success(project.into()))
}

/// GET /api/projects/:id/overview
pub async fn overview(Path(id): Path<Uuid>) -> ApiResult<ProjectOverviewDto> {
    let overview = service()
        .await?
        .overview(id)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    Ok(ApiResponse::success(overview.into()))
}

/// POST /api/projects
pub async fn add(payload: Result<Json<ProjectPayload>, JsonRejection>) -> ApiResult<ProjectDto> {
    let draft = require_json(payload)?.validate()?;
    let project = service().await?.insert(&draft).await?;
    Ok(ApiResponse::created(project.into()))
}

/// PUT /api/projects/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> ApiResult<ProjectDto> {
    let draft = require_json(payload)?.validate()?;
    let project = service()
        .await?
        .update(id, &draft)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    Ok(ApiResponse::success(project.into()))
}

/// DELETE /api/projects/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(project_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/projects", get(list).post(add))
        .route("/api/projects/:id", get(find).put(update).delete(remove))
        .route("/api/projects/:id/overview", get(overview))
}
