use async_trait::async_trait;
use chrono::NaiveDate;
use metrics::counter;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::{sleep, Duration};

use super::relevance::{is_relevant, FALLBACK_COMPETITION_CODES};
use super::types::{ApiMatch, CompetitionsResponse, MatchesResponse};
use super::window::{sub_windows, SubWindow, MAX_SPAN_DAYS};
use super::FixtureSource;

pub const FOOTBALL_API_BASE: &str = "https://api.football-data.org/v4";

const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected request ({status}): {body}")]
    ClientRejected { status: u16, body: String },

    #[error("provider unavailable ({status})")]
    Upstream { status: u16 },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid match code: {0}")]
    InvalidCode(String),
}

impl ProviderError {
    /// 4xx-class failures: the request itself is wrong and retrying it
    /// unchanged will not help.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProviderError::ClientRejected { .. } | ProviderError::InvalidCode(_)
        )
    }
}

/// Result of a chunked range fetch.
#[derive(Debug, Clone, Default)]
pub struct RangeFetch {
    /// Relevant fixtures across every successful sub-window (or the
    /// fallback competitions when nothing relevant was found).
    pub fixtures: Vec<ApiMatch>,
    pub windows_requested: usize,
    pub windows_failed: usize,
    /// Fixtures returned by the provider before relevance filtering.
    pub raw_count: usize,
    pub used_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct FootballDataClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    request_pause: Duration,
}

impl FootballDataClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        request_pause: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            request_pause,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        counter!("provider_requests_total").increment(1);

        let mut req = self.http.get(&url).query(query);
        if let Some(key) = &self.api_key {
            req = req.header(AUTH_HEADER, key);
        }

        let resp = req.send().await.inspect_err(|_| {
            counter!("provider_request_failures_total").increment(1);
        })?;

        let status = resp.status();
        if status.is_client_error() {
            counter!("provider_request_failures_total").increment(1);
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::ClientRejected {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            counter!("provider_request_failures_total").increment(1);
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch every match in an inclusive date range. The provider rejects
    /// spans wider than ten days.
    pub async fn get_matches(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<MatchesResponse, ProviderError> {
        self.get_json(
            "/matches",
            &[
                ("dateFrom", date_from.format("%Y-%m-%d").to_string()),
                ("dateTo", date_to.format("%Y-%m-%d").to_string()),
            ],
        )
        .await
    }

    /// Fetch a single match by provider id.
    pub async fn get_match(&self, id: i64) -> Result<ApiMatch, ProviderError> {
        self.get_json(&format!("/matches/{id}"), &[]).await
    }

    /// List the competitions available to the configured API key.
    pub async fn get_competitions(&self) -> Result<CompetitionsResponse, ProviderError> {
        self.get_json("/competitions", &[]).await
    }

    /// Fetch one competition's matches in an inclusive date range.
    pub async fn get_competition_matches(
        &self,
        code: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<MatchesResponse, ProviderError> {
        self.get_json(
            &format!("/competitions/{code}/matches"),
            &[
                ("dateFrom", date_from.format("%Y-%m-%d").to_string()),
                ("dateTo", date_to.format("%Y-%m-%d").to_string()),
            ],
        )
        .await
    }

    /// Fetch relevant fixtures for `[start, start + days_forward)` in
    /// sequential sub-windows, pausing between requests.
    ///
    /// Failed sub-windows are logged and skipped. The call only fails when
    /// every sub-window failed and at least one failure was an upstream
    /// (non-4xx) error.
    pub async fn fetch_range(
        &self,
        start: NaiveDate,
        days_forward: u32,
    ) -> Result<RangeFetch, ProviderError> {
        let windows = sub_windows(start, days_forward, MAX_SPAN_DAYS);
        let mut out = RangeFetch {
            windows_requested: windows.len(),
            ..Default::default()
        };
        let mut last_upstream_error: Option<ProviderError> = None;

        for (i, window) in windows.iter().enumerate() {
            if i > 0 {
                sleep(self.request_pause).await;
            }

            match self.get_matches(window.from, window.to).await {
                Ok(resp) => {
                    let raw = resp.matches.len();
                    out.raw_count += raw;
                    let before = out.fixtures.len();
                    out.fixtures
                        .extend(resp.matches.into_iter().filter(is_relevant));
                    tracing::debug!(
                        from = %window.from,
                        to = %window.to,
                        raw,
                        relevant = out.fixtures.len() - before,
                        "Fetched sub-window"
                    );
                }
                Err(e) if e.is_client_error() => {
                    out.windows_failed += 1;
                    tracing::warn!(
                        error = %e,
                        from = %window.from,
                        to = %window.to,
                        "Provider rejected sub-window - skipping"
                    );
                }
                Err(e) => {
                    out.windows_failed += 1;
                    tracing::error!(
                        error = %e,
                        from = %window.from,
                        to = %window.to,
                        "Sub-window fetch failed - continuing with next window"
                    );
                    last_upstream_error = Some(e);
                }
            }
        }

        if out.windows_failed == out.windows_requested {
            if let Some(e) = last_upstream_error {
                return Err(e);
            }
        }

        if out.fixtures.is_empty() {
            out.used_fallback = true;
            self.fetch_fallback(&windows, &mut out).await;
        }

        Ok(out)
    }

    async fn fetch_fallback(&self, windows: &[SubWindow], out: &mut RangeFetch) {
        tracing::info!(
            codes = ?FALLBACK_COMPETITION_CODES,
            "No relevant fixtures in range, querying domestic competitions"
        );

        for code in FALLBACK_COMPETITION_CODES {
            for window in windows {
                sleep(self.request_pause).await;
                match self
                    .get_competition_matches(code, window.from, window.to)
                    .await
                {
                    Ok(resp) => {
                        out.raw_count += resp.matches.len();
                        out.fixtures.extend(resp.matches);
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            code,
                            from = %window.from,
                            to = %window.to,
                            "Fallback competition fetch failed"
                        );
                    }
                }
            }
        }
    }
}

#[async_trait]
impl FixtureSource for FootballDataClient {
    async fn fetch_range(
        &self,
        start: NaiveDate,
        days_forward: u32,
    ) -> Result<RangeFetch, ProviderError> {
        FootballDataClient::fetch_range(self, start, days_forward).await
    }

    async fn fetch_match(&self, external_code: &str) -> Result<ApiMatch, ProviderError> {
        let id: i64 = external_code
            .parse()
            .map_err(|_| ProviderError::InvalidCode(external_code.to_string()))?;
        self.get_match(id).await
    }

    async fn competitions(&self) -> Result<CompetitionsResponse, ProviderError> {
        self.get_competitions().await
    }

    async fn pause(&self) {
        sleep(self.request_pause).await;
    }
}
