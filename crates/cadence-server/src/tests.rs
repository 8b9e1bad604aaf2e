//! Router tests against the generated dataset.

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use cadence_jira::JiraConfig;
use cadence_mock::MockSource;
use serde_json::Value;
use tower::ServiceExt as _;

use crate::{AnySource, AppState, DataSourceKind, ServerConfig, router};

fn mock_state() -> AppState<MockSource> {
  AppState::new(MockSource::default(), ServerConfig::default())
}

async fn get(state: AppState<impl cadence_core::source::DeliverySource + 'static>, uri: &str) -> Response {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn body_text(resp: Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
  let resp = get(mock_state(), uri).await;
  let status = resp.status();
  let body = body_text(resp).await;
  (status, serde_json::from_str(&body).unwrap())
}

fn len(value: &Value) -> usize { value.as_array().map(Vec::len).unwrap_or(0) }

// ── Collections ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_programs_with_labels() {
  let (status, body) = get_json("/api/programs").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(len(&body), 6);
  assert_eq!(body[0]["id"], "PRG-001");
  assert_eq!(body[0]["status"], "On Track");
  assert_eq!(body[0]["start_date"], "2025-04-01");
}

#[tokio::test]
async fn filters_programs_by_status_list() {
  let (status, body) = get_json("/api/programs?status=At%20Risk,Off%20Track").await;
  assert_eq!(status, StatusCode::OK);
  let ids: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["id"].as_str().unwrap()).collect();
  assert_eq!(ids, vec!["PRG-003", "PRG-005"]);
}

#[tokio::test]
async fn single_program_or_404() {
  let (status, body) = get_json("/api/programs/PRG-006").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["percent_complete"], 100.0);

  let (status, body) = get_json("/api/programs/PRG-404").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("PRG-404"));
}

#[tokio::test]
async fn milestone_filters_combine() {
  let (_, all) = get_json("/api/milestones").await;
  assert!(len(&all) > 30);

  let (status, body) =
    get_json("/api/milestones?program_id=PRG-001&quarter=Q2%202026&key_only=true").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(len(&body), 1);
  assert_eq!(body[0]["name"], "Production Tier-1 migration");
  assert_eq!(body[0]["quarter"], "Q2 2026");
}

#[tokio::test]
async fn malformed_quarter_is_400() {
  let (status, body) = get_json("/api/milestones?quarter=Q7%202025").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_severity_is_400() {
  let (status, _) = get_json("/api/risks?severity=Severe").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn open_risks_and_escalations() {
  let (_, risks) = get_json("/api/risks?open_only=true").await;
  assert_eq!(len(&risks), 10);
  assert!(risks.as_array().unwrap().iter().all(|r| r["is_open"] == true));

  let (_, escalations) = get_json("/api/escalations?open_only=true").await;
  assert_eq!(len(&escalations), 3);
  let (_, escalations) = get_json("/api/escalations?program_id=PRG-003").await;
  assert_eq!(len(&escalations), 2);
}

#[tokio::test]
async fn metrics_and_snapshots() {
  let (_, metrics) = get_json("/api/metrics?program_id=PRG-002").await;
  assert_eq!(len(&metrics), 34);

  let (_, snapshots) = get_json("/api/snapshots").await;
  assert_eq!(len(&snapshots), 34);
  assert_eq!(snapshots[0]["week_start"], "2025-07-07");
  assert_eq!(snapshots[0]["programs_on_track"], 3);
}

// ── Aggregates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn predictability_buckets_add_up() {
  let (status, body) = get_json("/api/milestones/predictability").await;
  assert_eq!(status, StatusCode::OK);
  for q in body["quarters"].as_array().unwrap() {
    assert_eq!(
      q["on_time"].as_u64().unwrap() + q["late"].as_u64().unwrap(),
      q["total"].as_u64().unwrap()
    );
  }
  assert_eq!(body["quarters"][0]["quarter"], "Q1 2025");
}

#[tokio::test]
async fn heatmap_counts_open_risks() {
  let (_, body) = get_json("/api/risks/heatmap").await;
  let total: u64 = body["cells"]
    .as_array()
    .unwrap()
    .iter()
    .flat_map(|row| row.as_array().unwrap().iter().map(|c| c.as_u64().unwrap()))
    .sum();
  assert_eq!(total, 10);
  assert_eq!(body["severities"][3], "Critical");

  let (_, by_severity) = get_json("/api/risks/by-severity").await;
  assert_eq!(by_severity[0]["severity"], "Medium");
}

#[tokio::test]
async fn metric_trends_cover_every_week() {
  for uri in ["/api/metrics/velocity", "/api/metrics/dora", "/api/metrics/defects"] {
    let (status, body) = get_json(uri).await;
    assert_eq!(status, StatusCode::OK, "{uri}");
    assert_eq!(len(&body), 34, "{uri}");
  }
  let (status, _) = get_json("/api/metrics/velocity?program_id=PRG-999").await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, latest) = get_json("/api/metrics/latest").await;
  assert!(latest["week_start"].is_string());
}

#[tokio::test]
async fn upcoming_respects_limit() {
  let (_, body) = get_json("/api/milestones/upcoming?limit=3").await;
  assert_eq!(len(&body), 3);
  assert!(body[0]["due_in"].is_string());
  assert_eq!(body[0]["is_key_milestone"], true);
}

#[tokio::test]
async fn summary_reports_portfolio() {
  let (status, body) = get_json("/api/summary").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data_source"], "mock");
  assert_eq!(body["portfolio"]["total_programs"], 6);
  assert_eq!(body["portfolio"]["open_escalations"], 3);
  assert_eq!(len(&body["attention"]), 2);
  assert_eq!(len(&body["upcoming"]), 5);
}

#[tokio::test]
async fn export_is_sectioned_csv() {
  let resp = get(mock_state(), "/api/export.csv").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
  assert!(content_type.starts_with("text/csv"));
  let csv = body_text(resp).await;
  assert!(csv.starts_with("=== Programs ===\nname,status,percent_complete,department,owner\n"));
  assert!(csv.contains("Cloud Platform Migration,On Track,72,Cloud Engineering,Priya Sharma\n"));
  assert!(csv.contains("\n=== Open Escalations ===\n"));
}

// ── Filtered aggregates ─────────────────────────────────────────────────────

fn heatmap_total(body: &Value) -> u64 {
  body["cells"]
    .as_array()
    .unwrap()
    .iter()
    .flat_map(|row| row.as_array().unwrap().iter().map(|c| c.as_u64().unwrap()))
    .sum()
}

#[tokio::test]
async fn risk_aggregates_follow_filters() {
  let (_, all) = get_json("/api/risks/heatmap").await;
  let (_, closed_only) = get_json("/api/risks/heatmap?program_id=PRG-006").await;
  let (_, zero_trust) = get_json("/api/risks/heatmap?program_id=PRG-003").await;
  assert_eq!(heatmap_total(&all), 10);
  assert_eq!(heatmap_total(&closed_only), 0);
  assert_eq!(heatmap_total(&zero_trust), 3);

  let (status, body) = get_json("/api/risks/by-severity?program_id=PRG-003&severity=High").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(len(&body), 1);
  assert_eq!(body[0]["severity"], "High");
  assert_eq!(body[0]["count"], 2);
}

#[tokio::test]
async fn risk_summary_scopes_escalations_to_programs() {
  let (_, all) = get_json("/api/risks/summary").await;
  assert_eq!(all["open_risks"], 10);
  assert_eq!(all["open_escalations"], 3);

  let (status, body) = get_json("/api/risks/summary?program_id=PRG-003").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["open_risks"], 3);
  assert_eq!(body["critical"], 1);
  assert_eq!(body["high"], 2);
  assert_eq!(body["open_escalations"], 1);

  let (_, body) = get_json("/api/risks/summary?program_id=PRG-003&severity=Critical").await;
  assert_eq!(body["open_risks"], 1);
  assert_eq!(body["open_escalations"], 1);
}

#[tokio::test]
async fn metric_aggregates_follow_program_filter() {
  let (_, all) = get_json("/api/metrics/dora").await;
  let (_, observability) = get_json("/api/metrics/dora?program_id=PRG-002").await;
  assert_eq!(len(&observability), 34);
  assert_ne!(all, observability);

  let (_, all) = get_json("/api/metrics/defects").await;
  let (_, observability) = get_json("/api/metrics/defects?program_id=PRG-002").await;
  assert_ne!(all, observability);

  let (_, all) = get_json("/api/metrics/latest").await;
  let (_, observability) = get_json("/api/metrics/latest?program_id=PRG-002").await;
  assert_eq!(all["week_start"], observability["week_start"]);
  assert!(
    observability["total_velocity"].as_f64().unwrap() < all["total_velocity"].as_f64().unwrap()
  );

  let (_, none) = get_json("/api/metrics/latest?program_id=PRG-404").await;
  assert!(none.is_null());
}

#[tokio::test]
async fn program_summary_over_selection() {
  let (status, all) = get_json("/api/programs/summary").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(all["portfolio"]["total_programs"], 6);
  assert_eq!(all["portfolio"]["open_risks"], 10);
  assert_eq!(len(&all["attention"]), 2);

  let (_, on_track) = get_json("/api/programs/summary?status=On%20Track").await;
  assert_eq!(on_track["portfolio"]["total_programs"], 3);
  assert_eq!(on_track["portfolio"]["status"]["on_track"], 3);
  assert_eq!(on_track["portfolio"]["status"]["at_risk"], 0);
  assert_eq!(on_track["portfolio"]["open_risks"], 4);
  assert_eq!(on_track["portfolio"]["open_escalations"], 0);
  assert_eq!(len(&on_track["attention"]), 0);
}

// ── Query errors ────────────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_query_values_get_json_errors() {
  for uri in [
    "/api/milestones?key_only=1",
    "/api/risks?open_only=maybe",
    "/api/milestones/upcoming?limit=x",
  ] {
    let resp = get(mock_state(), uri).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert!(body["error"].is_string(), "{uri}");
  }
}

// ── Live source ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn unconfigured_jira_is_503() {
  let config = ServerConfig {
    data_source: DataSourceKind::Jira,
    jira: JiraConfig { server: Some("https://jira.local".into()), ..Default::default() },
    ..Default::default()
  };
  let source = AnySource::from_config(&config);
  assert!(source.check().is_err());

  let resp = get(AppState::new(source, config), "/api/programs").await;
  assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
  let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
  let message = body["error"].as_str().unwrap();
  assert!(message.contains("jira.email"), "{message}");
  assert!(message.contains("jira.api_token"), "{message}");
  assert!(!message.contains("jira.server"), "{message}");
}

#[tokio::test]
async fn any_source_serves_mock_data() {
  let config = ServerConfig { seed: 7, ..Default::default() };
  let source = AnySource::from_config(&config);
  assert_eq!(source.kind(), DataSourceKind::Mock);
  let resp = get(AppState::new(source, config), "/api/milestones").await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[test]
fn config_defaults_and_rejects_unknown_source() {
  let config: ServerConfig = serde_json::from_str("{}").unwrap();
  assert_eq!(config.data_source, DataSourceKind::Mock);
  assert_eq!(config.cache_ttl_secs, 1800);
  assert_eq!(config.seed, 42);

  let err = serde_json::from_str::<ServerConfig>(r#"{ "data_source": "csv" }"#);
  assert!(err.is_err());
}
