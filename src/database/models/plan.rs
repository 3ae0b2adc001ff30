use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A subscription plan. `billing_period` is "month" or "year", enforced at
/// the DTO layer and by a database check constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub billing_period: String,
    pub max_projects: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
