use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use scorecast::football::types::{ApiCompetitionRef, ApiGoals, ApiScore, ApiTeam};
use scorecast::football::{
    ApiMatch, CompetitionsResponse, FixtureSource, ProviderError, RangeFetch,
};
use scorecast::models::{NewFixture, UserStats};

/// Connect to the test database and run all migrations. Returns `None` when
/// `TEST_DATABASE_URL` is not set so database tests can be skipped locally.
#[allow(dead_code)]
pub async fn setup_test_db() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set - skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    scorecast::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// A provider code unlikely to collide with other tests sharing the database.
#[allow(dead_code)]
pub fn unique_code() -> String {
    (Uuid::new_v4().as_u128() % 900_000_000 + 100_000_000).to_string()
}

#[allow(dead_code)]
pub fn make_api_match(code: &str, kickoff: DateTime<Utc>, status: &str, score: Option<(i32, i32)>) -> ApiMatch {
    ApiMatch {
        id: code.parse().expect("numeric code"),
        home_team: ApiTeam {
            id: None,
            name: Some("CR Flamengo".into()),
            crest: Some("https://crests.example/flamengo.png".into()),
        },
        away_team: ApiTeam {
            id: None,
            name: Some("SE Palmeiras".into()),
            crest: None,
        },
        utc_date: kickoff.to_rfc3339(),
        status: Some(status.into()),
        competition: Some(ApiCompetitionRef {
            name: Some("Campeonato Brasileiro Série A".into()),
            code: Some("BSA".into()),
        }),
        score: Some(ApiScore {
            full_time: Some(ApiGoals {
                home: score.map(|s| s.0),
                away: score.map(|s| s.1),
            }),
        }),
    }
}

#[allow(dead_code)]
pub fn make_new_fixture(code: &str, kickoff: DateTime<Utc>, competition: &str) -> NewFixture {
    NewFixture {
        external_code: code.into(),
        home_team: "CR Flamengo".into(),
        home_crest: None,
        away_team: "SE Palmeiras".into(),
        away_crest: None,
        kickoff_at: kickoff,
        competition: competition.into(),
        provider_status: "TIMED".into(),
    }
}

/// Seed a user with zeroed counters.
#[allow(dead_code)]
pub async fn seed_user(pool: &PgPool) -> UserStats {
    sqlx::query_as::<_, UserStats>(
        "INSERT INTO users (username) VALUES ($1) RETURNING *",
    )
    .bind(format!("user_{}", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .expect("Failed to seed user")
}

#[allow(dead_code)]
pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

/// In-memory fixture source. Serves its matches for any range.
#[derive(Default)]
pub struct StubSource {
    pub matches: Mutex<Vec<ApiMatch>>,
    pub fail: bool,
    pub range_calls: AtomicUsize,
    pub pauses: AtomicUsize,
    pub fetched_codes: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubSource {
    pub fn with_matches(matches: Vec<ApiMatch>) -> Self {
        Self {
            matches: Mutex::new(matches),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn set_matches(&self, matches: Vec<ApiMatch>) {
        *self.matches.lock().unwrap() = matches;
    }

    pub fn range_calls(&self) -> usize {
        self.range_calls.load(Ordering::SeqCst)
    }

    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }

    /// Codes requested one by one through `fetch_match`, in call order.
    pub fn fetched_codes(&self) -> Vec<String> {
        self.fetched_codes.lock().unwrap().clone()
    }
}

#[async_trait]
impl FixtureSource for StubSource {
    async fn fetch_range(&self, _start: NaiveDate, _days_forward: u32) -> Result<RangeFetch, ProviderError> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Upstream { status: 503 });
        }

        let fixtures = self.matches.lock().unwrap().clone();
        Ok(RangeFetch {
            raw_count: fixtures.len(),
            fixtures,
            windows_requested: 1,
            windows_failed: 0,
            used_fallback: false,
        })
    }

    async fn fetch_match(&self, external_code: &str) -> Result<ApiMatch, ProviderError> {
        self.fetched_codes.lock().unwrap().push(external_code.to_string());
        if self.fail {
            return Err(ProviderError::Upstream { status: 503 });
        }
        self.matches
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.external_code() == external_code)
            .cloned()
            .ok_or_else(|| ProviderError::ClientRejected {
                status: 404,
                body: "not found".into(),
            })
    }

    async fn competitions(&self) -> Result<CompetitionsResponse, ProviderError> {
        Ok(CompetitionsResponse::default())
    }

    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}
