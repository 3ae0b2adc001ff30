// Test scenario CRUD controller: /api/scenarios, list filterable by project.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Scenario;
use crate::database::pagination::PageParams;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ScenarioDraft, ScenarioService};

use super::shared::{ensure_project_exists, map_all, require_json, FieldErrors, PagedData};

#[derive(Debug, Deserialize)]
pub struct ScenarioListQuery {
    pub project_id: Option<Uuid>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Request body for both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct ScenarioPayload {
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub steps: String,
    #[serde(default)]
    pub expected_result: Option<String>,
}

impl ScenarioPayload {
    fn validate(self) -> Result<ScenarioDraft, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("title", &self.title);
        errors.cap_chars("title", &self.title, 200);
        errors.require_text("steps", &self.steps);
        errors.finish()?;

        Ok(ScenarioDraft {
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            steps: self.steps,
            expected_result: self.expected_result,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ScenarioDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub steps: String,
    pub expected_result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Scenario> for ScenarioDto {
    fn from(scenario: Scenario) -> Self {
        Self {
            id: scenario.id,
            project_id: scenario.project_id,
            title: scenario.title,
            description: scenario.description,
            steps: scenario.steps,
            expected_result: scenario.expected_result,
            created_at: scenario.created_at,
            updated_at: scenario.updated_at,
        }
    }
}

async fn service() -> Result<ScenarioService, ApiError> {
    Ok(ScenarioService::new(DatabaseManager::pool().await?))
}

fn scenario_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("scenario {} not found", id))
}

/// GET /api/scenarios?project_id=...
pub async fn list(Query(query): Query<ScenarioListQuery>) -> ApiResult<PagedData<ScenarioDto>> {
    let params = PageParams::clamped(query.page, query.page_size);
    let (scenarios, total) = service().await?.list(query.project_id, &params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(scenarios), total, &params)))
}

/// GET /api/scenarios/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<ScenarioDto> {
    let scenario = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| scenario_not_found(id))?;

    Ok(ApiResponse::success(scenario.into()))
}

/// POST /api/scenarios
pub async fn add(payload: Result<Json<ScenarioPayload>, JsonRejection>) -> ApiResult<ScenarioDto> {
    let draft = require_json(payload)?.validate()?;
    ensure_project_exists(draft.project_id).await?;

    let scenario = service().await?.insert(&draft).await?;
    Ok(ApiResponse::created(scenario.into()))
}

/// PUT /api/scenarios/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<ScenarioPayload>, JsonRejection>,
) -> ApiResult<ScenarioDto> {
    let draft = require_json(payload)?.validate()?;
    ensure_project_exists(draft.project_id).await?;

    let scenario = service()
        .await?
        .update(id, &draft)
        .await?
        .ok_or_else(|| scenario_not_found(id))?;

    Ok(ApiResponse::success(scenario.into()))
}

/// DELETE /api/scenarios/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(scenario_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/scenarios", get(list).post(add))
        .route("/api/scenarios/:id", get(find).put(update).delete(remove))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ScenarioPayload {
        ScenarioPayload {
            project_id: Uuid::new_v4(),
            title: "Guest checkout".to_string(),
            description: None,
            steps: "1. Add item\n2. Check out as guest".to_string(),
            expected_result: Some("Order confirmation shown".to_string()),
        }
    }

    #[test]
    fn valid_payload_becomes_draft() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn empty_steps_are_rejected() {
        let mut p = payload();
        p.steps = String::new();

        let err = p.validate().unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["steps"], "steps is required");
    }

    #[test]
    fn multiple_failures_are_reported_together() {
        let mut p = payload();
        p.title = String::new();
        p.steps = " ".to_string();

        let body = p.validate().unwrap_err().to_json();
        assert!(body["field_errors"]["title"].is_string());
        assert!(body["field_errors"]["steps"].is_string());
    }
}
