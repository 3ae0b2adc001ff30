// Subscription plan CRUD controller: /api/plans.
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Plan;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PlanDraft, PlanService};

use super::shared::{map_all, require_json, FieldErrors, PageQuery, PagedData};

const BILLING_PERIODS: [&str; 2] = ["month", "year"];

/// Request body for both create and full-replace update.
#[derive(Debug, Deserialize)]
pub struct PlanPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub billing_period: String,
    pub max_projects: i32,
}

impl PlanPayload {
    fn validate(self) -> Result<PlanDraft, ApiError> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name);
        errors.cap_chars("name", &self.name, 200);

        if self.price < Decimal::ZERO {
            errors.push("price", "price must not be negative");
        }
        if !BILLING_PERIODS.contains(&self.billing_period.as_str()) {
            errors.push("billing_period", "billing_period must be one of: month, year");
        }
        if self.max_projects < 1 {
            errors.push("max_projects", "max_projects must be at least 1");
        }
        errors.finish()?;

        Ok(PlanDraft {
            name: self.name,
            description: self.description,
            price: self.price,
            billing_period: self.billing_period,
            max_projects: self.max_projects,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PlanDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub billing_period: String,
    pub max_projects: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Plan> for PlanDto {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            description: plan.description,
            price: plan.price,
            billing_period: plan.billing_period,
            max_projects: plan.max_projects,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

async fn service() -> Result<PlanService, ApiError> {
    Ok(PlanService::new(DatabaseManager::pool().await?))
}

fn plan_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("plan {} not found", id))
}

/// GET /api/plans
pub async fn list(Query(query): Query<PageQuery>) -> ApiResult<PagedData<PlanDto>> {
    let params = query.clamped();
    let (plans, total) = service().await?.list(&params).await?;
    Ok(ApiResponse::success(PagedData::new(map_all(plans), total, &params)))
}

/// GET /api/plans/:id
pub async fn find(Path(id): Path<Uuid>) -> ApiResult<PlanDto> {
    let plan = service()
        .await?
        .find_by_id(id)
        .await?
        .ok_or_else(|| plan_not_found(id))?;

    Ok(ApiResponse::success(plan.into()))
}

/// POST /api/plans
pub async fn add(payload: Result<Json<PlanPayload>, JsonRejection>) -> ApiResult<PlanDto> {
    let draft = require_json(payload)?.validate()?;
    let plan = service().await?.insert(&draft).await?;
    Ok(ApiResponse::created(plan.into()))
}

/// PUT /api/plans/:id
pub async fn update(
    Path(id): Path<Uuid>,
    payload: Result<Json<PlanPayload>, JsonRejection>,
) -> ApiResult<PlanDto> {
    let draft = require_json(payload)?.validate()?;
    let plan = service()
        .await?
        .update(id, &draft)
        .await?
        .ok_or_else(|| plan_not_found(id))?;

    Ok(ApiResponse::success(plan.into()))
}

/// DELETE /api/plans/:id
pub async fn remove(Path(id): Path<Uuid>) -> ApiResult<()> {
    if !service().await?.delete(id).await? {
        return Err(plan_not_found(id));
    }
    Ok(ApiResponse::no_content())
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/plans", get(list).post(add))
        .route("/api/plans/:id", get(find).put(update).delete(remove))
}
