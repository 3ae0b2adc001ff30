use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One version of the privacy policy; mirrors [`crate::database::models::Terms`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PrivacyPolicy {
    pub id: Uuid,
    pub version: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
