pub mod fixtures;
pub mod health;
pub mod metrics;
pub mod predictions;
pub mod settlement;
pub mod sync;

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;
use crate::services::sync::MAX_RANGE_DAYS;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Parse a `YYYY-MM-DD` path or query value.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date {raw:?}, expected YYYY-MM-DD")))
}

/// Validate an optional `days` query value. Missing means a single day.
pub(crate) fn parse_days(days: Option<u32>) -> Result<u32, AppError> {
    match days {
        None => Ok(1),
        Some(d) if d > MAX_RANGE_DAYS => Err(AppError::BadRequest(format!(
            "days must be at most {MAX_RANGE_DAYS}, got {d}"
        ))),
        Some(d) => Ok(d),
    }
}
