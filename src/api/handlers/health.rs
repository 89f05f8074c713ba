use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

/// GET /health - Database reachability plus the scheduling setup.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    let body = json!({
        "status": if db_ok { "healthy" } else { "unhealthy" },
        "db": if db_ok { "connected" } else { "disconnected" },
        "scheduler_enabled": state.config.scheduler_enabled,
        "provider_key_configured": state.config.football_api_key.is_some(),
    });

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}
