use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Fixture, NewFixture, Score};

/// Fetch a fixture by its provider code.
pub async fn get_by_external_code(
    pool: &PgPool,
    external_code: &str,
) -> anyhow::Result<Option<Fixture>> {
    let row = sqlx::query_as::<_, Fixture>("SELECT * FROM fixtures WHERE external_code = $1")
        .bind(external_code)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Insert a new open fixture. A concurrent insert of the same code is a
/// no-op and returns `None`.
pub async fn insert_fixture(pool: &PgPool, fixture: &NewFixture) -> anyhow::Result<Option<Fixture>> {
    let row = sqlx::query_as::<_, Fixture>(
        r#"
        INSERT INTO fixtures (external_code, home_team, home_crest, away_team, away_crest,
                              kickoff_at, competition, provider_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (external_code) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(&fixture.external_code)
    .bind(&fixture.home_team)
    .bind(&fixture.home_crest)
    .bind(&fixture.away_team)
    .bind(&fixture.away_crest)
    .bind(fixture.kickoff_at)
    .bind(&fixture.competition)
    .bind(&fixture.provider_status)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Merge the fields that may legitimately change after creation.
pub async fn update_mutable_fields(
    pool: &PgPool,
    id: Uuid,
    kickoff_at: DateTime<Utc>,
    provider_status: &str,
    competition: &str,
) -> anyhow::Result<Fixture> {
    let row = sqlx::query_as::<_, Fixture>(
        r#"
        UPDATE fixtures
        SET kickoff_at = $2, provider_status = $3, competition = $4, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(kickoff_at)
    .bind(provider_status)
    .bind(competition)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fixtures whose kickoff has passed but which are not closed yet.
pub async fn get_pending_fixtures(pool: &PgPool, now: DateTime<Utc>) -> anyhow::Result<Vec<Fixture>> {
    let rows = sqlx::query_as::<_, Fixture>(
        "SELECT * FROM fixtures WHERE kickoff_at < $1 AND status <> 'closed' ORDER BY kickoff_at",
    )
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Closed fixtures that still have unsettled predictions.
pub async fn get_closed_with_unsettled_predictions(pool: &PgPool) -> anyhow::Result<Vec<Fixture>> {
    let rows = sqlx::query_as::<_, Fixture>(
        r#"
        SELECT f.* FROM fixtures f
        WHERE f.status = 'closed'
          AND EXISTS (
              SELECT 1 FROM predictions p
              WHERE p.fixture_id = f.id AND p.settlement = 'unsettled'
          )
        ORDER BY f.kickoff_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Close a fixture with its final result. Only an open fixture transitions;
/// returns `None` when it was already closed.
pub async fn close_fixture(
    pool: &PgPool,
    id: Uuid,
    result: Score,
    provider_status: &str,
) -> anyhow::Result<Option<Fixture>> {
    let row = sqlx::query_as::<_, Fixture>(
        r#"
        UPDATE fixtures
        SET status = 'closed', home_goals = $2, away_goals = $3, provider_status = $4,
            closed_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND status = 'open'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(result.home)
    .bind(result.away)
    .bind(provider_status)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fixtures kicking off in `[from, to)`, ordered by kickoff.
pub async fn get_fixtures_between(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> anyhow::Result<Vec<Fixture>> {
    let rows = sqlx::query_as::<_, Fixture>(
        "SELECT * FROM fixtures WHERE kickoff_at >= $1 AND kickoff_at < $2 ORDER BY kickoff_at",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn count_by_external_code(pool: &PgPool, external_code: &str) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fixtures WHERE external_code = $1")
        .bind(external_code)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
