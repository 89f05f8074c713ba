use std::sync::Arc;

use tokio::time::Duration;

use scorecast::api::router::create_router;
use scorecast::config::AppConfig;
use scorecast::football::{FixtureSource, FootballDataClient};
use scorecast::services::scheduler::{run_scheduler, SchedulerConfig};
use scorecast::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = metrics::init_metrics()?;

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    if config.football_api_key.is_none() {
        tracing::warn!("FOOTBALL_API_KEY is not set - provider requests will be unauthenticated");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.provider_timeout_secs))
        .build()?;
    let source: Arc<dyn FixtureSource> = Arc::new(FootballDataClient::new(
        http,
        config.football_api_base_url.clone(),
        config.football_api_key.clone(),
        Duration::from_millis(config.provider_request_pause_ms),
    ));

    // --- Scheduled sync + settlement ---
    if config.scheduler_enabled {
        let scheduler_config = SchedulerConfig {
            sync_interval_secs: config.sync_interval_secs,
            settlement_interval_secs: config.settlement_interval_secs,
            sync_days_forward: config.sync_days_forward,
            sync_ttl: config.sync_ttl(),
            rewards: config.rewards,
        };
        let scheduler_pool = pool.clone();
        let scheduler_source = source.clone();
        tokio::spawn(async move {
            run_scheduler(scheduler_pool, scheduler_source, scheduler_config).await;
        });
    } else {
        tracing::info!("Scheduler disabled (SCHEDULER_ENABLED=false)");
    }

    let state = AppState {
        db: pool,
        config,
        source,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}
