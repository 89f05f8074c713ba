use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Prediction, Score, SettlementState};

/// Create a prediction. A second prediction for the same (user, fixture)
/// leaves the first one in place and returns it.
pub async fn create_prediction(
    pool: &PgPool,
    user_id: Uuid,
    fixture_id: Uuid,
    score: Score,
) -> anyhow::Result<Prediction> {
    let inserted = sqlx::query_as::<_, Prediction>(
        r#"
        INSERT INTO predictions (user_id, fixture_id, home_goals, away_goals)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, fixture_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(fixture_id)
    .bind(score.home)
    .bind(score.away)
    .fetch_optional(pool)
    .await?;

    if let Some(p) = inserted {
        return Ok(p);
    }

    let existing = sqlx::query_as::<_, Prediction>(
        "SELECT * FROM predictions WHERE user_id = $1 AND fixture_id = $2",
    )
    .bind(user_id)
    .bind(fixture_id)
    .fetch_one(pool)
    .await?;

    Ok(existing)
}

/// All predictions attached to a fixture.
pub async fn get_predictions_for_fixture(
    pool: &PgPool,
    fixture_id: Uuid,
) -> anyhow::Result<Vec<Prediction>> {
    let rows = sqlx::query_as::<_, Prediction>(
        "SELECT * FROM predictions WHERE fixture_id = $1 ORDER BY created_at",
    )
    .bind(fixture_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_prediction(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Prediction>> {
    let row = sqlx::query_as::<_, Prediction>("SELECT * FROM predictions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Record the settlement of a prediction. Only an unsettled row transitions;
/// returns `false` when another run already settled it.
pub async fn mark_settled<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    state: SettlementState,
    exact_match: bool,
    outcome_match: bool,
    points: i32,
    coins: i32,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE predictions
        SET settlement = $2, exact_match = $3, outcome_match = $4,
            points = $5, coins = $6, settled_at = NOW()
        WHERE id = $1 AND settlement = 'unsettled'
        "#,
    )
    .bind(id)
    .bind(state.as_str())
    .bind(exact_match)
    .bind(outcome_match)
    .bind(points)
    .bind(coins)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() == 1)
}
