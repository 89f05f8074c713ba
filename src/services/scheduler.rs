use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::football::FixtureSource;
use crate::services::scoring::RewardTable;
use crate::services::{settlement, sync};

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub sync_interval_secs: u64,
    pub settlement_interval_secs: u64,
    pub sync_days_forward: u32,
    pub sync_ttl: ChronoDuration,
    pub rewards: RewardTable,
}

/// Drive both the fixture sync and the settlement engine from one task.
/// Each tick runs the same routine the manual endpoints call; a failed run
/// is logged and retried on its next tick.
pub async fn run_scheduler(pool: PgPool, source: Arc<dyn FixtureSource>, config: SchedulerConfig) {
    let mut sync_ticker = interval(Duration::from_secs(config.sync_interval_secs.max(1)));
    let mut settlement_ticker = interval(Duration::from_secs(config.settlement_interval_secs.max(1)));
    sync_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    settlement_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        sync_interval_secs = config.sync_interval_secs,
        settlement_interval_secs = config.settlement_interval_secs,
        days_forward = config.sync_days_forward,
        "Scheduler started"
    );

    loop {
        tokio::select! {
            _ = sync_ticker.tick() => {
                let today = Utc::now().date_naive();
                if let Some(result) = sync::sync_if_stale(
                    &pool,
                    source.as_ref(),
                    today,
                    config.sync_days_forward,
                    config.sync_ttl,
                )
                .await
                {
                    tracing::info!(
                        status = %result.status,
                        total = result.total_fixtures,
                        "Scheduled sync: {}",
                        result.message
                    );
                }
            }
            _ = settlement_ticker.tick() => {
                match settlement::run_settlement(&pool, source.as_ref(), &config.rewards, Utc::now()).await {
                    Ok(report) => tracing::debug!(?report, "Scheduled settlement complete"),
                    Err(e) => tracing::error!(error = %e, "Scheduled settlement failed"),
                }
            }
        }
    }
}
