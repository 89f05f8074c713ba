use serde::{Deserialize, Serialize};

use crate::models::Score;

/// How a prediction compares with the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionOutcome {
    /// Both legs of the score match.
    Exact,
    /// Win/draw/loss direction matches but the score differs.
    CorrectOutcome,
    Miss,
}

impl PredictionOutcome {
    pub fn is_correct(&self) -> bool {
        !matches!(self, PredictionOutcome::Miss)
    }
}

/// Classify a predicted score against the final score.
pub fn classify(predicted: Score, actual: Score) -> PredictionOutcome {
    if predicted == actual {
        PredictionOutcome::Exact
    } else if predicted.direction() == actual.direction() {
        PredictionOutcome::CorrectOutcome
    } else {
        PredictionOutcome::Miss
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub points: i32,
    pub coins: i32,
}

/// Two-tier reward table: exact > correct outcome > miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    pub exact_points: i32,
    pub exact_coins: i32,
    pub outcome_points: i32,
    pub outcome_coins: i32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            exact_points: 10,
            exact_coins: 20,
            outcome_points: 3,
            outcome_coins: 5,
        }
    }
}

impl RewardTable {
    pub fn reward_for(&self, outcome: PredictionOutcome) -> Reward {
        match outcome {
            PredictionOutcome::Exact => Reward {
                points: self.exact_points,
                coins: self.exact_coins,
            },
            PredictionOutcome::CorrectOutcome => Reward {
                points: self.outcome_points,
                coins: self.outcome_coins,
            },
            PredictionOutcome::Miss => Reward { points: 0, coins: 0 },
        }
    }
}
