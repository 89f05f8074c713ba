use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{fixture_repo, prediction_repo, user_repo};
use crate::errors::AppError;
use crate::football::translate;
use crate::models::{Prediction, Score};
use crate::AppState;

use super::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct CreatePrediction {
    pub user_id: Uuid,
    pub fixture_code: String,
    pub home: i32,
    pub away: i32,
}

/// POST /api/predictions - Record a user's guess for an open fixture.
/// Re-submitting for the same fixture returns the first prediction.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreatePrediction>,
) -> Result<Json<ApiResponse<Prediction>>, AppError> {
    if body.home < 0 || body.away < 0 {
        return Err(AppError::BadRequest("goals cannot be negative".into()));
    }

    let fixture = fixture_repo::get_by_external_code(&state.db, &body.fixture_code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("fixture {}", body.fixture_code)))?;

    if user_repo::get_user(&state.db, body.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("user {}", body.user_id)));
    }

    let detail = translate(&fixture.provider_status);
    if fixture.is_closed() || !detail.accepts_predictions || fixture.kickoff_at <= Utc::now() {
        return Err(AppError::BadRequest(format!(
            "fixture {} is not accepting predictions ({})",
            fixture.external_code, detail.localized_status
        )));
    }

    let prediction = prediction_repo::create_prediction(
        &state.db,
        body.user_id,
        fixture.id,
        Score::new(body.home, body.away),
    )
    .await?;

    Ok(Json(ApiResponse::ok(prediction)))
}
