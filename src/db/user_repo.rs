use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::UserStats;

pub async fn get_user(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<UserStats>> {
    let row = sqlx::query_as::<_, UserStats>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Credit a correct prediction: points, coins, streak, correct and total
/// counters move together in one statement.
pub async fn apply_reward<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    points: i32,
    coins: i32,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET points = points + $2,
            coins = coins + $3,
            current_streak = current_streak + 1,
            total_correct = total_correct + 1,
            total_predictions = total_predictions + 1,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(points as i64)
    .bind(coins as i64)
    .execute(executor)
    .await?;

    Ok(())
}

/// Record a missed prediction: the streak resets, the total still counts.
pub async fn record_miss<'e>(executor: impl PgExecutor<'e>, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET current_streak = 0,
            total_predictions = total_predictions + 1,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(())
}
