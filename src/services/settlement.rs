use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use sqlx::PgPool;

use crate::db::{fixture_repo, prediction_repo, user_repo};
use crate::football::{translate, ApiMatch, FixtureSource};
use crate::models::{Fixture, Prediction, Score, SettlementState};
use crate::services::scoring::{classify, PredictionOutcome, RewardTable};

/// Tallies from one settlement pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettlementReport {
    pub pending_fixtures: usize,
    pub fixtures_closed: usize,
    pub fixtures_skipped: usize,
    pub predictions_settled: usize,
    pub exact_matches: usize,
    pub outcome_matches: usize,
    pub misses: usize,
    pub failures: usize,
}

impl SettlementReport {
    fn record(&mut self, outcome: PredictionOutcome) {
        self.predictions_settled += 1;
        match outcome {
            PredictionOutcome::Exact => self.exact_matches += 1,
            PredictionOutcome::CorrectOutcome => self.outcome_matches += 1,
            PredictionOutcome::Miss => self.misses += 1,
        }
    }
}

/// First day of the month containing `today`.
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// First day of the month before the one starting at `from`. Pending
/// fixtures older than this are no longer looked up individually.
pub fn straggler_cutoff(from: NaiveDate) -> NaiveDate {
    from.pred_opt().map(month_start).unwrap_or(from)
}

/// Final score of a provider match, if the provider considers it finished
/// and reports both legs.
pub fn finished_score(api_match: &ApiMatch) -> Option<Score> {
    if !translate(api_match.status_str()).is_finished {
        return None;
    }
    api_match.final_score()
}

/// Fetch finished results from the start of the month through today, keyed
/// by external code. A failed fetch yields an empty lookup; the next tick
/// retries.
async fn finished_results(
    source: &dyn FixtureSource,
    from: NaiveDate,
    today: NaiveDate,
) -> HashMap<String, ApiMatch> {
    let days = ((today - from).num_days() + 1).max(1) as u32;

    match source.fetch_range(from, days).await {
        Ok(fetch) => fetch
            .fixtures
            .into_iter()
            .filter(|m| translate(m.status_str()).is_finished)
            .map(|m| (m.external_code(), m))
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, %from, %today, "Failed to fetch finished results");
            HashMap::new()
        }
    }
}

/// Settle one prediction against a final score. The settlement flag and the
/// user counters commit together. Returns `None` when the prediction was
/// already settled, by this or a concurrent run.
pub async fn settle_prediction(
    pool: &PgPool,
    prediction: &Prediction,
    result: Score,
    rewards: &RewardTable,
) -> anyhow::Result<Option<PredictionOutcome>> {
    if prediction.is_settled() {
        return Ok(None);
    }

    let outcome = classify(prediction.score(), result);
    let reward = rewards.reward_for(outcome);
    let state = if reward.points > 0 {
        SettlementState::SettledPositive
    } else {
        SettlementState::SettledZero
    };

    let mut tx = pool.begin().await?;

    let transitioned = prediction_repo::mark_settled(
        &mut *tx,
        prediction.id,
        state,
        outcome == PredictionOutcome::Exact,
        outcome.is_correct(),
        reward.points,
        reward.coins,
    )
    .await?;

    if !transitioned {
        tx.rollback().await?;
        return Ok(None);
    }

    if outcome.is_correct() {
        user_repo::apply_reward(&mut *tx, prediction.user_id, reward.points, reward.coins).await?;
    } else {
        user_repo::record_miss(&mut *tx, prediction.user_id).await?;
    }

    tx.commit().await?;

    counter!("predictions_settled_total").increment(1);
    tracing::debug!(
        prediction_id = %prediction.id,
        user_id = %prediction.user_id,
        outcome = ?outcome,
        points = reward.points,
        coins = reward.coins,
        "Prediction settled"
    );

    Ok(Some(outcome))
}

/// Settle every unsettled prediction of a closed fixture. Failures are
/// logged per prediction and do not stop the rest.
async fn settle_fixture_predictions(
    pool: &PgPool,
    fixture: &Fixture,
    result: Score,
    rewards: &RewardTable,
    report: &mut SettlementReport,
) {
    let predictions = match prediction_repo::get_predictions_for_fixture(pool, fixture.id).await {
        Ok(p) => p,
        Err(e) => {
            counter!("settlement_failures_total").increment(1);
            report.failures += 1;
            tracing::error!(error = %e, fixture_id = %fixture.id, "Failed to load predictions");
            return;
        }
    };

    for prediction in &predictions {
        match settle_prediction(pool, prediction, result, rewards).await {
            Ok(Some(outcome)) => report.record(outcome),
            Ok(None) => {}
            Err(e) => {
                counter!("settlement_failures_total").increment(1);
                report.failures += 1;
                tracing::error!(
                    error = %e,
                    prediction_id = %prediction.id,
                    fixture_id = %fixture.id,
                    "Failed to settle prediction"
                );
            }
        }
    }
}

/// One settlement pass: close pending fixtures whose results are final and
/// settle their predictions. Safe to run repeatedly or concurrently.
pub async fn run_settlement(
    pool: &PgPool,
    source: &dyn FixtureSource,
    rewards: &RewardTable,
    now: DateTime<Utc>,
) -> anyhow::Result<SettlementReport> {
    let started = std::time::Instant::now();
    let mut report = SettlementReport::default();

    let pending = fixture_repo::get_pending_fixtures(pool, now).await?;
    report.pending_fixtures = pending.len();

    let today = now.date_naive();
    let from = month_start(today);
    let lookup = if pending.iter().any(|f| f.kickoff_at.date_naive() >= from) {
        finished_results(source, from, today).await
    } else {
        HashMap::new()
    };

    let cutoff = straggler_cutoff(from);
    let mut closed_now: HashSet<uuid::Uuid> = HashSet::new();

    for fixture in &pending {
        let kickoff_day = fixture.kickoff_at.date_naive();
        if kickoff_day < cutoff {
            tracing::debug!(
                external_code = %fixture.external_code,
                kickoff = %fixture.kickoff_at,
                "Pending fixture too old to look up, skipping"
            );
            report.fixtures_skipped += 1;
            continue;
        }

        // Fixtures from before this month are outside the bulk window.
        let api_match = if kickoff_day < from {
            source.pause().await;
            match source.fetch_match(&fixture.external_code).await {
                Ok(m) => Some(m),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        external_code = %fixture.external_code,
                        "Failed to fetch straggler fixture - will retry next run"
                    );
                    None
                }
            }
        } else {
            lookup.get(&fixture.external_code).cloned()
        };

        let Some(api_match) = api_match else {
            report.fixtures_skipped += 1;
            continue;
        };

        let Some(result) = finished_score(&api_match) else {
            if translate(api_match.status_str()).is_finished {
                tracing::warn!(
                    external_code = %fixture.external_code,
                    status = api_match.status_str(),
                    "Finished fixture has no full-time score"
                );
            }
            report.fixtures_skipped += 1;
            continue;
        };

        let closed = match fixture_repo::close_fixture(pool, fixture.id, result, api_match.status_str()).await {
            Ok(Some(f)) => f,
            Ok(None) => {
                tracing::debug!(external_code = %fixture.external_code, "Fixture already closed");
                report.fixtures_skipped += 1;
                continue;
            }
            Err(e) => {
                counter!("settlement_failures_total").increment(1);
                report.failures += 1;
                tracing::error!(
                    error = %e,
                    external_code = %fixture.external_code,
                    "Failed to close fixture"
                );
                continue;
            }
        };

        counter!("fixtures_closed_total").increment(1);
        report.fixtures_closed += 1;
        closed_now.insert(closed.id);
        tracing::info!(
            external_code = %closed.external_code,
            home = %closed.home_team,
            away = %closed.away_team,
            result = %result,
            "Fixture closed"
        );

        settle_fixture_predictions(pool, &closed, result, rewards, &mut report).await;
    }

    // Closed fixtures left with unsettled predictions by an earlier partial failure.
    match fixture_repo::get_closed_with_unsettled_predictions(pool).await {
        Ok(leftovers) => {
            for fixture in leftovers.iter().filter(|f| !closed_now.contains(&f.id)) {
                if let Some(result) = fixture.result() {
                    settle_fixture_predictions(pool, fixture, result, rewards, &mut report).await;
                }
            }
        }
        Err(e) => {
            report.failures += 1;
            tracing::error!(error = %e, "Failed to load closed fixtures with unsettled predictions");
        }
    }

    histogram!("settlement_run_seconds").record(started.elapsed().as_secs_f64());
    tracing::info!(
        pending = report.pending_fixtures,
        closed = report.fixtures_closed,
        skipped = report.fixtures_skipped,
        settled = report.predictions_settled,
        failures = report.failures,
        "Settlement run finished"
    );

    Ok(report)
}
