use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Plan;
use crate::database::pagination::PageParams;
use crate::database::{ListFilter, Repository};

/// Field set for creating or fully replacing a subscription plan.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub billing_period: String,
    pub max_projects: i32,
}

pub struct PlanService {
    pool: PgPool,
}

impl PlanService {
    pub const TABLE: &'static str = "plans";

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> Repository<Plan> {
        Repository::new(Self::TABLE, self.pool.clone())
    }

    pub async fn list(&self, page: &PageParams) -> Result<(Vec<Plan>, i64), DatabaseError> {
        let filter = ListFilter::new();
        let repo = self.repo();
        let (items, total) = futures::try_join!(repo.find_page(&filter, page), repo.count(&filter))?;
        Ok((items, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Plan>, DatabaseError> {
        self.repo().find_by_id(id).await
    }

    pub async fn insert(&self, draft: &PlanDraft) -> Result<Plan, DatabaseError> {
        let plan = sqlx::query_as::<_, Plan>(
            "INSERT INTO plans (id, name, description, price, billing_period, max_projects)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.billing_period)
        .bind(draft.max_projects)
        .fetch_one(&self.pool)
        .await?;

        Ok(plan)
    }

    pub async fn update(&self, id: Uuid, draft: &PlanDraft) -> Result<Option<Plan>, DatabaseError> {
        let plan = sqlx::query_as::<_, Plan>(
            "UPDATE plans
             SET name = $2, description = $3, price = $4, billing_period = $5,
                 max_projects = $6, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.billing_period)
        .bind(draft.max_projects)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.repo().delete_by_id(id).await
    }
}
