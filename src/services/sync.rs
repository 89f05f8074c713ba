use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use metrics::counter;
use serde::Serialize;
use sqlx::PgPool;

use crate::db::{fixture_repo, sync_repo};
use crate::football::{translate, FixtureSource, StatusDetail};
use crate::models::{Fixture, SyncOutcome, SyncRecord};
use crate::services::fixture_store::{self, UpsertOutcome};

/// Default freshness window for a synchronized date.
pub const DEFAULT_SYNC_TTL_HOURS: i64 = 12;

/// Widest range, in days, a caller may sync or list at once.
pub const MAX_RANGE_DAYS: u32 = 90;

const UNNAMED_COMPETITION: &str = "Other";

/// Result of a forced sync, returned to callers as-is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub message: String,
    pub total_fixtures: i32,
    pub status: SyncOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncTally {
    pub inserted: i32,
    pub updated: i32,
    pub rejected: i32,
}

impl SyncTally {
    pub fn persisted(&self) -> i32 {
        self.inserted + self.updated
    }
}

/// Key under which a sync of `days_forward` days from `date` is recorded.
/// Single days use the bare date; longer ranges carry a span tag.
pub fn date_key(date: NaiveDate, days_forward: u32) -> String {
    if days_forward <= 1 {
        date.format("%Y-%m-%d").to_string()
    } else {
        format!("{}+{}d", date.format("%Y-%m-%d"), days_forward)
    }
}

/// True when there is no record or the last success is at least `ttl` old.
pub fn is_stale(record: Option<&SyncRecord>, ttl: Duration, now: DateTime<Utc>) -> bool {
    match record.and_then(|r| r.last_success_at) {
        Some(last_success) => now - last_success >= ttl,
        None => true,
    }
}

/// Whether `date_key` is due for a refetch.
pub async fn needs_refresh(
    pool: &PgPool,
    date_key: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let record = sync_repo::get_sync_record(pool, date_key).await?;
    Ok(is_stale(record.as_ref(), ttl, now))
}

async fn sync_range(
    pool: &PgPool,
    source: &dyn FixtureSource,
    date: NaiveDate,
    days_forward: u32,
) -> anyhow::Result<SyncTally> {
    let fetch = source.fetch_range(date, days_forward).await?;
    let now = Utc::now();
    let mut tally = SyncTally::default();

    for api_match in &fetch.fixtures {
        let fixture = match api_match.to_new_fixture() {
            Ok(f) => f,
            Err(e) => {
                counter!("fixtures_rejected_total").increment(1);
                tracing::debug!(error = %e, "Dropping malformed provider match");
                tally.rejected += 1;
                continue;
            }
        };

        match fixture_store::upsert(pool, &fixture, now).await? {
            UpsertOutcome::Inserted => tally.inserted += 1,
            UpsertOutcome::Updated => tally.updated += 1,
            UpsertOutcome::Rejected(_) => tally.rejected += 1,
        }
    }

    tracing::info!(
        %date,
        days_forward,
        windows = fetch.windows_requested,
        windows_failed = fetch.windows_failed,
        raw = fetch.raw_count,
        fallback = fetch.used_fallback,
        inserted = tally.inserted,
        updated = tally.updated,
        rejected = tally.rejected,
        "Fixture sync finished"
    );

    Ok(tally)
}

/// Fetch and persist fixtures for a range regardless of freshness, and record
/// the attempt. Never fails: every error becomes an `erro` result.
pub async fn force_sync(
    pool: &PgPool,
    source: &dyn FixtureSource,
    date: NaiveDate,
    days_forward: u32,
) -> SyncResult {
    let key = date_key(date, days_forward);
    counter!("sync_runs_total").increment(1);

    let (result, error_detail) = match sync_range(pool, source, date, days_forward).await {
        Ok(tally) if tally.persisted() > 0 => (
            SyncResult {
                message: format!("Synchronized {} fixtures for {key}", tally.persisted()),
                total_fixtures: tally.persisted(),
                status: SyncOutcome::Success,
            },
            None,
        ),
        Ok(_) => (
            SyncResult {
                message: format!("No fixtures found for {key}"),
                total_fixtures: 0,
                status: SyncOutcome::NoData,
            },
            None,
        ),
        Err(e) => {
            tracing::error!(error = %e, date_key = %key, "Fixture sync failed");
            (
                SyncResult {
                    message: format!("Sync failed for {key}: {e}"),
                    total_fixtures: 0,
                    status: SyncOutcome::Error,
                },
                Some(e.to_string()),
            )
        }
    };

    if let Err(e) = sync_repo::record_sync(
        pool,
        &key,
        Utc::now(),
        result.status,
        result.total_fixtures,
        error_detail.as_deref(),
    )
    .await
    {
        tracing::error!(error = %e, date_key = %key, "Failed to record sync attempt");
    }

    result
}

/// Scheduled entry point: sync only when the range is stale.
pub async fn sync_if_stale(
    pool: &PgPool,
    source: &dyn FixtureSource,
    date: NaiveDate,
    days_forward: u32,
    ttl: Duration,
) -> Option<SyncResult> {
    let key = date_key(date, days_forward);
    match needs_refresh(pool, &key, ttl, Utc::now()).await {
        Ok(false) => {
            tracing::debug!(date_key = %key, "Fixtures still fresh, skipping sync");
            None
        }
        Ok(true) => Some(force_sync(pool, source, date, days_forward).await),
        Err(e) => {
            tracing::error!(error = %e, date_key = %key, "Failed to read sync record");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Grouped read view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureView {
    #[serde(flatten)]
    pub fixture: Fixture,
    pub status_detail: StatusDetail,
}

impl From<Fixture> for FixtureView {
    fn from(fixture: Fixture) -> Self {
        let status_detail = translate(&fixture.provider_status);
        Self {
            fixture,
            status_detail,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitionGroup {
    pub fixtures: Vec<FixtureView>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitionEntry {
    pub name: String,
    pub fixtures: Vec<FixtureView>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedFixtures {
    pub total_competitions: usize,
    pub total_fixtures: usize,
    pub competitions: Vec<CompetitionEntry>,
    pub period: Period,
}

/// Group fixtures by competition name, keeping input order within a group.
pub fn group_by_competition(fixtures: Vec<Fixture>) -> BTreeMap<String, CompetitionGroup> {
    let mut groups: BTreeMap<String, CompetitionGroup> = BTreeMap::new();

    for fixture in fixtures {
        let name = if fixture.competition.trim().is_empty() {
            UNNAMED_COMPETITION.to_string()
        } else {
            fixture.competition.clone()
        };

        let group = groups.entry(name).or_insert_with(|| CompetitionGroup {
            fixtures: Vec::new(),
            count: 0,
        });
        group.fixtures.push(fixture.into());
        group.count += 1;
    }

    groups
}

/// Bounds of `[date, date + days_forward)` as kickoff instants plus the last
/// calendar day of the range. `None` when the range leaves the calendar.
pub fn range_bounds(
    date: NaiveDate,
    days_forward: u32,
) -> Option<(DateTime<Utc>, DateTime<Utc>, NaiveDate)> {
    let days = days_forward.max(1) as i64;
    let from = date.and_time(NaiveTime::MIN).and_utc();
    let to = from.checked_add_signed(Duration::days(days))?;
    let last_day = date.checked_add_signed(Duration::days(days - 1))?;
    Some((from, to, last_day))
}

/// Stored fixtures kicking off in `[date, date + days_forward)`, grouped by
/// competition.
pub async fn list_by_date_grouped(
    pool: &PgPool,
    date: NaiveDate,
    days_forward: u32,
) -> anyhow::Result<GroupedFixtures> {
    let (from, to, last_day) = range_bounds(date, days_forward)
        .ok_or_else(|| anyhow::anyhow!("date range {date} + {days_forward} days is out of bounds"))?;

    let fixtures = fixture_repo::get_fixtures_between(pool, from, to).await?;
    let total_fixtures = fixtures.len();

    let competitions: Vec<CompetitionEntry> = group_by_competition(fixtures)
        .into_iter()
        .map(|(name, group)| CompetitionEntry {
            name,
            fixtures: group.fixtures,
            count: group.count,
        })
        .collect();

    Ok(GroupedFixtures {
        total_competitions: competitions.len(),
        total_fixtures,
        competitions,
        period: Period {
            from: date,
            to: last_day,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_record(last_success_at: Option<DateTime<Utc>>) -> SyncRecord {
        SyncRecord {
            id: Uuid::new_v4(),
            date_key: "2026-10-19".into(),
            last_sync_at: Utc::now(),
            last_success_at,
            fixtures_found: 4,
            status: "sucesso".into(),
            error_detail: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn make_fixture(code: &str, competition: &str) -> Fixture {
        Fixture {
            id: Uuid::new_v4(),
            external_code: code.into(),
            home_team: "Home".into(),
            home_crest: None,
            away_team: "Away".into(),
            away_crest: None,
            kickoff_at: Utc::now(),
            competition: competition.into(),
            provider_status: "TIMED".into(),
            status: "open".into(),
            home_goals: None,
            away_goals: None,
            round_id: None,
            closed_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_stale_without_record() {
        assert!(is_stale(None, Duration::hours(12), Utc::now()));
    }

    #[test]
    fn test_fresh_then_stale_after_ttl() {
        let now = Utc::now();
        let record = make_record(Some(now));
        let ttl = Duration::hours(DEFAULT_SYNC_TTL_HOURS);

        assert!(!is_stale(Some(&record), ttl, now));
        assert!(!is_stale(Some(&record), ttl, now + Duration::hours(11)));
        assert!(is_stale(Some(&record), ttl, now + Duration::hours(12)));
    }

    #[test]
    fn test_failed_only_record_is_stale() {
        let record = make_record(None);
        assert!(is_stale(Some(&record), Duration::hours(12), Utc::now()));
    }

    #[test]
    fn test_date_key() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(date_key(date, 1), "2026-10-19");
        assert_eq!(date_key(date, 0), "2026-10-19");
        assert_eq!(date_key(date, 7), "2026-10-19+7d");
    }

    #[test]
    fn test_group_by_competition() {
        let groups = group_by_competition(vec![
            make_fixture("1", "Premier League"),
            make_fixture("2", "Campeonato Brasileiro Série A"),
            make_fixture("3", "Premier League"),
            make_fixture("4", ""),
        ]);

        assert_eq!(groups.len(), 3);
        let pl = &groups["Premier League"];
        assert_eq!(pl.count, 2);
        assert_eq!(pl.fixtures[0].fixture.external_code, "1");
        assert_eq!(pl.fixtures[1].fixture.external_code, "3");
        assert_eq!(groups["Other"].count, 1);
    }

    #[test]
    fn test_range_bounds() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let (from, to, last_day) = range_bounds(date, 3).unwrap();
        assert_eq!(to - from, Duration::days(3));
        assert_eq!(last_day, NaiveDate::from_ymd_opt(2026, 10, 21).unwrap());

        let (_, _, single) = range_bounds(date, 0).unwrap();
        assert_eq!(single, date);
    }

    #[test]
    fn test_range_bounds_out_of_calendar() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(range_bounds(date, 4_000_000_000).is_none());
    }
}
