pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod football;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::football::FixtureSource;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub source: Arc<dyn FixtureSource>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
