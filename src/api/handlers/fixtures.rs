use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppError;
use crate::football::ApiCompetition;
use crate::services::sync::{self, GroupedFixtures};
use crate::AppState;

use super::{parse_date, parse_days, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct GroupedQuery {
    pub date: Option<String>,
    pub days: Option<u32>,
}

/// GET /api/fixtures?date=YYYY-MM-DD&days=N - Stored fixtures grouped by competition.
pub async fn grouped(
    State(state): State<AppState>,
    Query(q): Query<GroupedQuery>,
) -> Result<Json<GroupedFixtures>, AppError> {
    let date = match q.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let days = parse_days(q.days)?;

    let grouped = sync::list_by_date_grouped(&state.db, date, days).await?;
    Ok(Json(grouped))
}

/// GET /api/competitions - Competitions available from the provider.
pub async fn competitions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ApiCompetition>>>, AppError> {
    let resp = state.source.competitions().await?;
    Ok(Json(ApiResponse::ok(resp.competitions)))
}
