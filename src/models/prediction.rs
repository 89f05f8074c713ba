use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Score;

/// Explicit settlement flag for a prediction, so a settled miss is never
/// mistaken for a prediction that has not been processed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementState {
    Unsettled,
    SettledZero,
    SettledPositive,
}

impl SettlementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementState::Unsettled => "unsettled",
            SettlementState::SettledZero => "settled_zero",
            SettlementState::SettledPositive => "settled_positive",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "unsettled" => Some(SettlementState::Unsettled),
            "settled_zero" => Some(SettlementState::SettledZero),
            "settled_positive" => Some(SettlementState::SettledPositive),
            _ => None,
        }
    }
}

/// Database row for the predictions table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub fixture_id: Uuid,
    pub home_goals: i32,
    pub away_goals: i32,
    pub exact_match: bool,
    pub outcome_match: bool,
    pub points: i32,
    pub coins: i32,
    pub settlement: String,
    pub settled_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Prediction {
    pub fn score(&self) -> Score {
        Score::new(self.home_goals, self.away_goals)
    }

    pub fn settlement_state(&self) -> SettlementState {
        SettlementState::from_db_str(&self.settlement).unwrap_or(SettlementState::Unsettled)
    }

    pub fn is_settled(&self) -> bool {
        self.settlement_state() != SettlementState::Unsettled
    }
}
