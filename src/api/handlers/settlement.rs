use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::errors::AppError;
use crate::services::settlement::{self, SettlementReport};
use crate::AppState;

use super::ApiResponse;

/// POST /api/settlement/run - Run the settlement pass now. Same routine as
/// the scheduled tick.
pub async fn run(State(state): State<AppState>) -> Result<Json<ApiResponse<SettlementReport>>, AppError> {
    tracing::info!("Manual settlement requested");
    let report = settlement::run_settlement(
        &state.db,
        state.source.as_ref(),
        &state.config.rewards,
        Utc::now(),
    )
    .await?;

    Ok(Json(ApiResponse::ok(report)))
}
