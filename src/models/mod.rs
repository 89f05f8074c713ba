pub mod fixture;
pub mod prediction;
pub mod sync_record;
pub mod user;

pub use fixture::{Fixture, FixtureStatus, NewFixture};
pub use prediction::{Prediction, SettlementState};
pub use sync_record::{SyncOutcome, SyncRecord};
pub use user::UserStats;

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Score - a home/away goal pair
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: i32,
    pub away: i32,
}

impl Score {
    pub fn new(home: i32, away: i32) -> Self {
        Self { home, away }
    }

    /// Direction of the result: 1 home win, 0 draw, -1 away win.
    pub fn direction(&self) -> i32 {
        (self.home - self.away).signum()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}
