use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::{SyncOutcome, SyncRecord};

pub async fn get_sync_record(pool: &PgPool, date_key: &str) -> anyhow::Result<Option<SyncRecord>> {
    let row = sqlx::query_as::<_, SyncRecord>("SELECT * FROM sync_records WHERE date_key = $1")
        .bind(date_key)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Upsert the outcome of a sync attempt. `last_success_at` only moves on
/// successful outcomes, so a failure never extends the freshness window.
pub async fn record_sync(
    pool: &PgPool,
    date_key: &str,
    at: DateTime<Utc>,
    outcome: SyncOutcome,
    fixtures_found: i32,
    error_detail: Option<&str>,
) -> anyhow::Result<SyncRecord> {
    let success_at = outcome.is_success().then_some(at);

    let row = sqlx::query_as::<_, SyncRecord>(
        r#"
        INSERT INTO sync_records (date_key, last_sync_at, last_success_at, fixtures_found, status, error_detail)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (date_key) DO UPDATE
        SET last_sync_at = EXCLUDED.last_sync_at,
            last_success_at = COALESCE(EXCLUDED.last_success_at, sync_records.last_success_at),
            fixtures_found = EXCLUDED.fixtures_found,
            status = EXCLUDED.status,
            error_detail = EXCLUDED.error_detail,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(date_key)
    .bind(at)
    .bind(success_at)
    .bind(fixtures_found)
    .bind(outcome.as_str())
    .bind(error_detail)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
