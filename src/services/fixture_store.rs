use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use sqlx::PgPool;
use std::fmt;

use crate::db::fixture_repo;
use crate::models::NewFixture;

/// How far back a new fixture's kickoff may lie.
pub const PLAUSIBLE_PAST_DAYS: i64 = 30;
/// How far ahead a new fixture's kickoff may lie.
pub const PLAUSIBLE_FUTURE_DAYS: i64 = 90;

const SENTINEL_CODES: &[&str] = &["0", "-1", "999999", "test", "mock"];

/// Why a fixture was refused at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    SentinelCode(String),
    KickoffOutOfWindow(DateTime<Utc>),
    MissingTeamName,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::SentinelCode(code) => write!(f, "sentinel external code {code:?}"),
            RejectReason::KickoffOutOfWindow(at) => write!(f, "kickoff {at} outside plausible window"),
            RejectReason::MissingTeamName => f.write_str("missing team name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Rejected(RejectReason),
}

fn is_sentinel_code(code: &str) -> bool {
    let code = code.trim().to_lowercase();
    if code.is_empty() || SENTINEL_CODES.contains(&code.as_str()) || code.starts_with("test_") {
        return true;
    }
    matches!(code.parse::<i64>(), Ok(n) if n <= 0)
}

/// Plausibility check applied before a fixture is first persisted.
pub fn is_plausible(fixture: &NewFixture, now: DateTime<Utc>) -> Result<(), RejectReason> {
    if is_sentinel_code(&fixture.external_code) {
        return Err(RejectReason::SentinelCode(fixture.external_code.clone()));
    }

    let earliest = now - Duration::days(PLAUSIBLE_PAST_DAYS);
    let latest = now + Duration::days(PLAUSIBLE_FUTURE_DAYS);
    if fixture.kickoff_at < earliest || fixture.kickoff_at > latest {
        return Err(RejectReason::KickoffOutOfWindow(fixture.kickoff_at));
    }

    if fixture.home_team.trim().is_empty() || fixture.away_team.trim().is_empty() {
        return Err(RejectReason::MissingTeamName);
    }

    Ok(())
}

/// Persist a fixture keyed on its external code. Existing fixtures only have
/// kickoff, provider status and competition merged; new ones must pass
/// `is_plausible`.
pub async fn upsert(pool: &PgPool, fixture: &NewFixture, now: DateTime<Utc>) -> anyhow::Result<UpsertOutcome> {
    if let Some(existing) = fixture_repo::get_by_external_code(pool, &fixture.external_code).await? {
        let competition = if fixture.competition.is_empty() {
            existing.competition.as_str()
        } else {
            fixture.competition.as_str()
        };

        fixture_repo::update_mutable_fields(
            pool,
            existing.id,
            fixture.kickoff_at,
            &fixture.provider_status,
            competition,
        )
        .await?;

        counter!("fixtures_upserted_total", "op" => "update").increment(1);
        return Ok(UpsertOutcome::Updated);
    }

    if let Err(reason) = is_plausible(fixture, now) {
        counter!("fixtures_rejected_total").increment(1);
        tracing::debug!(
            external_code = %fixture.external_code,
            reason = %reason,
            "Fixture rejected"
        );
        return Ok(UpsertOutcome::Rejected(reason));
    }

    match fixture_repo::insert_fixture(pool, fixture).await? {
        Some(_) => {
            counter!("fixtures_upserted_total", "op" => "insert").increment(1);
            Ok(UpsertOutcome::Inserted)
        }
        // Another run inserted the same code between our lookup and insert.
        None => Ok(UpsertOutcome::Updated),
    }
}
