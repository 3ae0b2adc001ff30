use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One version of the terms of service. The highest version is the one
/// currently in force.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Terms {
    pub id: Uuid,
    pub version: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
