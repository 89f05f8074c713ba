use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Outcome of a synchronization attempt, stored with its wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    #[serde(rename = "sucesso")]
    Success,
    #[serde(rename = "erro")]
    Error,
    #[serde(rename = "sem_dados")]
    NoData,
}

impl SyncOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::Success => "sucesso",
            SyncOutcome::Error => "erro",
            SyncOutcome::NoData => "sem_dados",
        }
    }

    /// An empty fetch still counts as a successful sync for TTL purposes.
    pub fn is_success(&self) -> bool {
        !matches!(self, SyncOutcome::Error)
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database row for the sync_records table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncRecord {
    pub id: Uuid,
    pub date_key: String,
    pub last_sync_at: DateTime<Utc>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub fixtures_found: i32,
    pub status: String,
    pub error_detail: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
