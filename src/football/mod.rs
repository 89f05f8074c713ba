pub mod client;
pub mod relevance;
pub mod status;
pub mod types;
pub mod window;

pub use client::{FootballDataClient, ProviderError, RangeFetch};
pub use status::{translate, ProviderStatus, StatusDetail};
pub use types::{ApiCompetition, ApiMatch, CompetitionsResponse, MatchesResponse};

use async_trait::async_trait;
use chrono::NaiveDate;

/// Anything that can supply fixtures for the sync orchestrator and the
/// settlement engine.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Relevant fixtures for `[start, start + days_forward)`.
    async fn fetch_range(
        &self,
        start: NaiveDate,
        days_forward: u32,
    ) -> Result<RangeFetch, ProviderError>;

    /// A single fixture by its external code.
    async fn fetch_match(&self, external_code: &str) -> Result<ApiMatch, ProviderError>;

    /// Competitions the provider exposes.
    async fn competitions(&self) -> Result<CompetitionsResponse, ProviderError>;

    /// Wait out the inter-request pause before the next call.
    async fn pause(&self) {}
}
