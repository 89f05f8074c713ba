use std::env;
use std::str::FromStr;

use crate::football::client::FOOTBALL_API_BASE;
use crate::services::scoring::RewardTable;
use crate::services::sync::MAX_RANGE_DAYS;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Bearer token for the `/api` routes; auth is disabled when unset.
    pub api_token: Option<String>,

    // Sports-data provider
    pub football_api_key: Option<String>,
    pub football_api_base_url: String,
    pub provider_request_pause_ms: u64,
    pub provider_timeout_secs: u64,

    // Synchronization
    pub sync_ttl_hours: i64,
    pub sync_interval_secs: u64,
    pub sync_days_forward: u32,

    // Settlement
    pub settlement_interval_secs: u64,
    pub scheduler_enabled: bool,
    pub rewards: RewardTable,
}

/// Read an env var and parse it, falling back to `default` when unset or
/// unparseable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = RewardTable::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),

            football_api_key: env::var("FOOTBALL_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            football_api_base_url: env::var("FOOTBALL_API_BASE_URL")
                .unwrap_or_else(|_| FOOTBALL_API_BASE.into()),
            provider_request_pause_ms: env_or("PROVIDER_REQUEST_PAUSE_MS", 1_000),
            provider_timeout_secs: env_or("PROVIDER_TIMEOUT_SECS", 20),

            sync_ttl_hours: env_or("SYNC_TTL_HOURS", 12),
            sync_interval_secs: env_or("SYNC_INTERVAL_SECS", 3_600),
            sync_days_forward: env_or("SYNC_DAYS_FORWARD", 10u32).min(MAX_RANGE_DAYS),

            settlement_interval_secs: env_or("SETTLEMENT_INTERVAL_SECS", 7_200),
            scheduler_enabled: env_or("SCHEDULER_ENABLED", true),
            rewards: RewardTable {
                exact_points: env_or("REWARD_EXACT_POINTS", defaults.exact_points),
                exact_coins: env_or("REWARD_EXACT_COINS", defaults.exact_coins),
                outcome_points: env_or("REWARD_OUTCOME_POINTS", defaults.outcome_points),
                outcome_coins: env_or("REWARD_OUTCOME_COINS", defaults.outcome_coins),
            },
        })
    }

    /// Minimal configuration for tests and local tooling.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".into(),
            port: 0,
            api_token: None,
            football_api_key: None,
            football_api_base_url: FOOTBALL_API_BASE.into(),
            provider_request_pause_ms: 0,
            provider_timeout_secs: 5,
            sync_ttl_hours: 12,
            sync_interval_secs: 3_600,
            sync_days_forward: 10,
            settlement_interval_secs: 7_200,
            scheduler_enabled: false,
            rewards: RewardTable::default(),
        }
    }

    pub fn sync_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.sync_ttl_hours)
    }
}
