use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{NewFixture, Score};

// ---------------------------------------------------------------------------
// Matches (GET /matches, /matches/{id}, /competitions/{code}/matches)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiTeam {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub crest: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiCompetitionRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiGoals {
    #[serde(default)]
    pub home: Option<i32>,
    #[serde(default)]
    pub away: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiScore {
    #[serde(default, rename = "fullTime")]
    pub full_time: Option<ApiGoals>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiMatch {
    pub id: i64,
    #[serde(default, rename = "homeTeam")]
    pub home_team: ApiTeam,
    #[serde(default, rename = "awayTeam")]
    pub away_team: ApiTeam,
    #[serde(rename = "utcDate")]
    pub utc_date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub competition: Option<ApiCompetitionRef>,
    #[serde(default)]
    pub score: Option<ApiScore>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResultSet {
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<ApiMatch>,
    #[serde(default, rename = "resultSet")]
    pub result_set: Option<ResultSet>,
}

// ---------------------------------------------------------------------------
// Competitions (GET /competitions)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiArea {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiCompetition {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub area: Option<ApiArea>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CompetitionsResponse {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub competitions: Vec<ApiCompetition>,
}

// ---------------------------------------------------------------------------
// Ingestion boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("match {id}: invalid utcDate {value:?}")]
    InvalidKickoff { id: i64, value: String },
}

impl ApiMatch {
    pub fn external_code(&self) -> String {
        self.id.to_string()
    }

    pub fn home_name(&self) -> &str {
        self.home_team.name.as_deref().unwrap_or("")
    }

    pub fn away_name(&self) -> &str {
        self.away_team.name.as_deref().unwrap_or("")
    }

    pub fn competition_name(&self) -> &str {
        self.competition
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("")
    }

    pub fn status_str(&self) -> &str {
        self.status.as_deref().unwrap_or("SCHEDULED")
    }

    /// Full-time score, only when both legs are reported.
    pub fn final_score(&self) -> Option<Score> {
        let ft = self.score.as_ref()?.full_time.as_ref()?;
        Some(Score::new(ft.home?, ft.away?))
    }

    pub fn kickoff(&self) -> Result<DateTime<Utc>, PayloadError> {
        DateTime::parse_from_rfc3339(&self.utc_date)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| PayloadError::InvalidKickoff {
                id: self.id,
                value: self.utc_date.clone(),
            })
    }

    /// Bind the loosely-typed payload to an internal fixture. Missing team
    /// names are carried as empty strings and rejected by the store.
    pub fn to_new_fixture(&self) -> Result<NewFixture, PayloadError> {
        Ok(NewFixture {
            external_code: self.external_code(),
            home_team: self.home_name().trim().to_string(),
            home_crest: self.home_team.crest.clone(),
            away_team: self.away_name().trim().to_string(),
            away_crest: self.away_team.crest.clone(),
            kickoff_at: self.kickoff()?,
            competition: self.competition_name().to_string(),
            provider_status: self.status_str().to_string(),
        })
    }
}
