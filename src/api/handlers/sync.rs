use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::sync_repo;
use crate::errors::AppError;
use crate::models::SyncRecord;
use crate::services::sync::{self, SyncResult};
use crate::AppState;

use super::{parse_date, parse_days, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub days: Option<u32>,
}

/// POST /api/sync/:date - Force a fixture sync for a date (or `?days=N` range).
/// Always answers with a structured result; failures show up as `status: "erro"`.
pub async fn force(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<SyncResult>, AppError> {
    let date = parse_date(&date)?;
    let days = parse_days(q.days)?;

    tracing::info!(%date, days, "Manual sync requested");
    let result = sync::force_sync(&state.db, state.source.as_ref(), date, days).await;

    Ok(Json(result))
}

#[derive(Serialize)]
pub struct SyncStatus {
    pub date_key: String,
    pub needs_refresh: bool,
    pub record: Option<SyncRecord>,
}

/// GET /api/sync/:date - Last sync record and whether a refetch is due.
pub async fn status(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<ApiResponse<SyncStatus>>, AppError> {
    let date = parse_date(&date)?;
    let date_key = sync::date_key(date, parse_days(q.days)?);

    let record = sync_repo::get_sync_record(&state.db, &date_key).await?;
    let needs_refresh = sync::is_stale(record.as_ref(), state.config.sync_ttl(), Utc::now());

    Ok(Json(ApiResponse::ok(SyncStatus {
        date_key,
        needs_refresh,
        record,
    })))
}
