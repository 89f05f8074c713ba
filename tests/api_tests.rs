mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use common::StubSource;
use scorecast::api::router::create_router;
use scorecast::config::AppConfig;
use scorecast::football::FixtureSource;
use scorecast::AppState;

fn build_state(pool: sqlx::PgPool, source: Arc<dyn FixtureSource>, api_token: Option<&str>) -> AppState {
    let mut config = AppConfig::for_database(
        std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
    );
    config.api_token = api_token.map(String::from);

    // Only one global recorder may exist per process; tests render from an
    // unattached one.
    let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

    AppState {
        db: pool,
        config,
        source,
        metrics_handle,
    }
}

async fn build_test_app(source: StubSource) -> Option<(axum::Router, sqlx::PgPool)> {
    let pool = common::setup_test_db().await?;
    let router = create_router(build_state(pool.clone(), Arc::new(source), None));
    Some((router, pool))
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let Some((app, _pool)) = build_test_app(StubSource::default()).await else { return };

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["scheduler_enabled"], false);
}

#[tokio::test]
async fn test_force_sync_returns_structured_result() {
    let date = Utc::now().date_naive() + Duration::days(3);
    let kickoff = date.and_hms_opt(20, 0, 0).unwrap().and_utc();
    let source = StubSource::with_matches(vec![common::make_api_match(
        &common::unique_code(),
        kickoff,
        "SCHEDULED",
        None,
    )]);
    let Some((app, _pool)) = build_test_app(source).await else { return };

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/sync/{}", date.format("%Y-%m-%d")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "sucesso");
    assert_eq!(json["totalFixtures"], 1);
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_force_sync_reports_provider_failure_in_body() {
    let date = Utc::now().date_naive() + Duration::days(4);
    let Some((app, _pool)) = build_test_app(StubSource::failing()).await else { return };

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/sync/{}?days=2", date.format("%Y-%m-%d")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "erro");
    assert_eq!(json["totalFixtures"], 0);
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let Some((app, _pool)) = build_test_app(StubSource::default()).await else { return };

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/sync/19-10-2026")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_oversized_day_range_is_rejected() {
    let source = Arc::new(StubSource::default());
    let Some(pool) = common::setup_test_db().await else { return };
    let app = create_router(build_state(pool, source.clone(), None));

    for (method, uri) in [
        ("POST", "/api/sync/2026-10-19?days=100000"),
        ("GET", "/api/sync/2026-10-19?days=91"),
        ("GET", "/api/fixtures?date=2026-10-19&days=4000000000"),
    ] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
    }

    // Nothing reached the provider.
    assert_eq!(source.range_calls(), 0);
}

#[tokio::test]
async fn test_grouped_fixtures_shape() {
    let Some((app, _pool)) = build_test_app(StubSource::default()).await else { return };

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/fixtures?date=2026-10-19&days=3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert!(json["totalCompetitions"].is_number());
    assert!(json["totalFixtures"].is_number());
    assert!(json["competitions"].is_array());
    assert_eq!(json["period"]["from"], "2026-10-19");
    assert_eq!(json["period"]["to"], "2026-10-21");
}

#[tokio::test]
async fn test_sync_status_after_force() {
    let date = Utc::now().date_naive() + Duration::days(6);
    let Some((app, _pool)) = build_test_app(StubSource::default()).await else { return };
    let uri = format!("/api/sync/{}", date.format("%Y-%m-%d"));

    let resp = app
        .clone()
        .oneshot(Request::builder().method("POST").uri(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["needs_refresh"], false);
    assert_eq!(json["data"]["record"]["status"], "sem_dados");
}

#[tokio::test]
async fn test_manual_settlement_run() {
    let Some((app, _pool)) = build_test_app(StubSource::default()).await else { return };

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/settlement/run")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["predictions_settled"].is_number());
}

#[tokio::test]
async fn test_create_prediction_for_open_fixture() {
    let Some(pool) = common::setup_test_db().await else { return };
    let code = common::unique_code();
    let fixture = common::make_new_fixture(&code, Utc::now() + Duration::days(2), "Campeonato Brasileiro Série A");
    scorecast::services::fixture_store::upsert(&pool, &fixture, Utc::now())
        .await
        .unwrap();
    let user = common::seed_user(&pool).await;

    let app = create_router(build_state(pool.clone(), Arc::new(StubSource::default()), None));
    let body = serde_json::json!({
        "user_id": user.id,
        "fixture_code": code,
        "home": 2,
        "away": 1,
    });

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predictions")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["home_goals"], 2);
    assert_eq!(json["data"]["settlement"], "unsettled");

    let bad = serde_json::json!({
        "user_id": user.id,
        "fixture_code": code,
        "home": -1,
        "away": 0,
    });
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predictions")
                .header("content-type", "application/json")
                .body(Body::from(bad.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_token_is_enforced() {
    let Some(pool) = common::setup_test_db().await else { return };
    let app = create_router(build_state(pool, Arc::new(StubSource::default()), Some("secret")));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/fixtures")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/fixtures")
                .header("authorization", "Bearer secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Public routes stay open.
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let Some((app, _pool)) = build_test_app(StubSource::default()).await else { return };

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8(body.to_vec()).is_ok());
}
