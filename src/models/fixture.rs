use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Score;

/// Lifecycle of a fixture in the local catalog. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Open,
    Closed,
}

impl FixtureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureStatus::Open => "open",
            FixtureStatus::Closed => "closed",
        }
    }
}

/// Database row for the fixtures table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Fixture {
    pub id: Uuid,
    pub external_code: String,
    pub home_team: String,
    pub home_crest: Option<String>,
    pub away_team: String,
    pub away_crest: Option<String>,
    pub kickoff_at: DateTime<Utc>,
    pub competition: String,
    pub provider_status: String,
    pub status: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub round_id: Option<Uuid>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Fixture {
    pub fn is_closed(&self) -> bool {
        self.status == FixtureStatus::Closed.as_str()
    }

    pub fn result(&self) -> Option<Score> {
        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Some(Score::new(home, away)),
            _ => None,
        }
    }
}

/// A fixture normalized from a provider payload, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFixture {
    pub external_code: String,
    pub home_team: String,
    pub home_crest: Option<String>,
    pub away_team: String,
    pub away_crest: Option<String>,
    pub kickoff_at: DateTime<Utc>,
    pub competition: String,
    pub provider_status: String,
}
