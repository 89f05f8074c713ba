use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the users table (aggregate counters only).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserStats {
    pub id: Uuid,
    pub username: String,
    pub points: i64,
    pub coins: i64,
    pub current_streak: i32,
    pub total_correct: i32,
    pub total_predictions: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
