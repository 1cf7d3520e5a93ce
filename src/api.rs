//! HTTP surface of the dashboard: index page, health check and the
//! baseline/intervention comparison endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::config::DashboardConfig;
use crate::error::SirdError;
use crate::io::debug_log::write_sird_debug_log;
use crate::model::scenario::{Compartment, Comparison};

pub const DEFAULT_REDUCTION: f64 = 0.5;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(cfg: DashboardConfig) -> Self {
        Self { cfg: Arc::new(cfg) }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SimulateRequest {
    pub reduction: Option<f64>,
    pub stride: Option<usize>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/simulate", get(simulate_query).post(simulate_json))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

async fn index() -> Html<String> {
    let series = serde_json::to_string(&Compartment::ALL).unwrap_or_else(|_| "[]".to_string());
    Html(INDEX_HTML.replace("__SERIES__", &series))
}

async fn simulate_query(
    State(st): State<AppState>,
    req: Result<Query<SimulateRequest>, QueryRejection>,
) -> Response {
    match req {
        Ok(Query(req)) => simulate(st, req).await,
        Err(e) => bad_request(e.body_text()),
    }
}

async fn simulate_json(
    State(st): State<AppState>,
    req: Result<Json<SimulateRequest>, JsonRejection>,
) -> Response {
    match req {
        Ok(Json(req)) => simulate(st, req).await,
        Err(e) => bad_request(e.body_text()),
    }
}

async fn simulate(st: AppState, req: SimulateRequest) -> Response {
    // Two integrations of up to a few thousand steps; keep them off the async workers.
    let join = tokio::task::spawn_blocking(move || simulate_sync(&st.cfg, req));

    match join.await {
        Ok(result) => simulation_response(result),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"return_code": 2, "error": format!("join error: {e}")})),
        )
            .into_response(),
    }
}

/// Maps a comparison result to the response body the page expects.
pub fn simulation_response(result: Result<Comparison, SirdError>) -> Response {
    match result {
        Ok(cmp) => (StatusCode::OK, Json(cmp)).into_response(),
        Err(e) => {
            tracing::warn!("rejected simulation request: {e}");
            bad_request(e.to_string())
        }
    }
}

fn bad_request(error: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"return_code": 1, "error": error})),
    )
        .into_response()
}

pub fn simulate_sync(cfg: &DashboardConfig, req: SimulateRequest) -> Result<Comparison, SirdError> {
    let reduction = req.reduction.unwrap_or(DEFAULT_REDUCTION);
    let stride = req.stride.unwrap_or(1);

    let cmp = cfg.scenario.compare(reduction)?;

    if let Some(dir) = &cfg.debug_log_dir {
        let run_id = format!("{:.2}-{}", reduction, now_millis());
        match write_sird_debug_log(dir, &run_id, &cfg.scenario, &cmp) {
            Ok(path) => tracing::debug!("wrote debug log {:?}", path),
            Err(e) => tracing::warn!("debug log failed: {e:#}"),
        }
    }

    cmp.thinned(stride)
}

fn now_millis() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

const INDEX_HTML: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>SIRD - impact of control measures</title>
<style>
  body { font-family: sans-serif; margin: 0 auto; width: 90%; }
  h1, #stats { text-align: center; }
  #controls { width: 80%; margin: 0 auto; padding: 20px; }
  #reduction { width: 100%; }
  canvas { width: 100%; height: 600px; }
  .legend span { display: inline-block; margin: 0 12px; }
</style>
</head>
<body>
<h1>SIRD - impact of control measures</h1>
<div id="controls">
  <label for="reduction">Transmission rate (&beta;) reduction: <b id="pct">50%</b></label>
  <input id="reduction" type="range" min="0" max="1" step="0.1" value="0.5">
</div>
<canvas id="chart" width="1200" height="600"></canvas>
<div class="legend" id="legend"></div>
<div id="stats"></div>
<script>
const SERIES = __SERIES__;
const canvas = document.getElementById("chart");
const ctx = canvas.getContext("2d");

function draw(data) {
  const pad = 50, w = canvas.width - 2 * pad, h = canvas.height - 2 * pad;
  const t = data.baseline.time, tEnd = t[t.length - 1] || 1;
  ctx.clearRect(0, 0, canvas.width, canvas.height);
  ctx.strokeStyle = "#888";
  ctx.strokeRect(pad, pad, w, h);
  ctx.fillStyle = "#000";
  ctx.fillText("Days", pad + w / 2, canvas.height - 10);
  ctx.fillText("Population fraction", 5, pad - 10);
  for (const [traj, dash] of [[data.baseline, []], [data.intervention, [8, 6]]]) {
    for (const s of SERIES) {
      const ys = traj[s.key];
      ctx.beginPath();
      ctx.setLineDash(dash);
      ctx.strokeStyle = s.color;
      ys.forEach((y, j) => {
        const px = pad + w * traj.time[j] / tEnd, py = pad + h * (1 - y);
        j === 0 ? ctx.moveTo(px, py) : ctx.lineTo(px, py);
      });
      ctx.stroke();
    }
  }
  ctx.setLineDash([]);
}

function stats(s) {
  const pct = s.r0_reduction_pct === null ? "n/a" : s.r0_reduction_pct.toFixed(1) + "%";
  document.getElementById("stats").innerHTML =
    "<h3>R0 without intervention: " + s.r0_baseline.toFixed(2) + "</h3>" +
    "<h3>R0 with intervention: " + s.r0_intervention.toFixed(2) + "</h3>" +
    "<h3>R0 reduction: " + pct + "</h3>";
}

async function update() {
  const r = document.getElementById("reduction").value;
  document.getElementById("pct").textContent = Math.round(r * 100) + "%";
  const resp = await fetch("/simulate?stride=10&reduction=" + r);
  const data = await resp.json();
  if (!resp.ok) {
    document.getElementById("stats").textContent = data.error;
    return;
  }
  draw(data);
  stats(data.stats);
}

document.getElementById("legend").innerHTML = SERIES.map(s =>
  '<span style="color:' + s.color + '">' + s.label + ' (solid: without, dashed: with intervention)</span>').join("");
document.getElementById("reduction").addEventListener("input", update);
update();
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn state() -> AppState {
        AppState::new(DashboardConfig::default())
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn default_request_uses_half_reduction() {
        let cmp = simulate_sync(&DashboardConfig::default(), SimulateRequest::default()).unwrap();
        assert_eq!(cmp.reduction, 0.5);
        assert_eq!(cmp.baseline.len(), 9000);
        assert!((cmp.stats.r0_reduction_pct.unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn stride_thins_both_series() {
        let req = SimulateRequest { reduction: Some(0.2), stride: Some(10) };
        let cmp = simulate_sync(&DashboardConfig::default(), req).unwrap();
        assert_eq!(cmp.baseline.len(), 901);
        assert_eq!(cmp.intervention.len(), 901);
        assert_eq!(cmp.baseline.time()[900], 90.0);
    }

    #[test]
    fn writes_debug_log_when_configured() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = DashboardConfig {
            debug_log_dir: Some(tmp.path().to_path_buf()),
            ..DashboardConfig::default()
        };
        simulate_sync(&cfg, SimulateRequest::default()).unwrap();
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn ok_response_carries_comparison() {
        let req = SimulateRequest { reduction: Some(1.0), stride: Some(1000) };
        let resp = simulation_response(simulate_sync(&DashboardConfig::default(), req));
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v["reduction"], 1.0);
        assert_eq!(v["stats"]["r0_intervention"], 0.0);
        assert_eq!(v["baseline"]["S"][0], 0.99);
    }

    #[tokio::test]
    async fn zero_stride_is_bad_request() {
        let req = SimulateRequest { reduction: None, stride: Some(0) };
        let resp = simulation_response(simulate_sync(&DashboardConfig::default(), req));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = body_json(resp).await;
        assert_eq!(v["return_code"], 1);
        assert!(v["error"].as_str().unwrap().contains("stride"));
    }

    #[tokio::test]
    async fn out_of_range_reduction_is_bad_request() {
        let resp = simulate(state(), SimulateRequest { reduction: Some(1.5), stride: None }).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = body_json(resp).await;
        assert_eq!(v["return_code"], 1);
        assert!(v["error"].as_str().unwrap().contains("reduction"));
    }

    #[tokio::test]
    async fn unparsable_query_gets_json_error_body() {
        let uri: Uri = "/simulate?reduction=abc".parse().unwrap();
        let query = Query::<SimulateRequest>::try_from_uri(&uri);
        assert!(query.is_err());
        let resp = simulate_query(State(state()), query).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = body_json(resp).await;
        assert_eq!(v["return_code"], 1);
        assert!(v["error"].is_string());
    }

    #[tokio::test]
    async fn query_with_stride_is_served() {
        let uri: Uri = "/simulate?reduction=0.3&stride=100".parse().unwrap();
        let query = Query::<SimulateRequest>::try_from_uri(&uri);
        let resp = simulate_query(State(state()), query).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v["intervention"]["time"].as_array().unwrap().len(), 91);
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let v = body_json(healthz().await.into_response()).await;
        assert_eq!(v, json!({"ok": true}));
    }

    #[tokio::test]
    async fn index_embeds_compartment_series() {
        let Html(page) = index().await;
        assert!(!page.contains("__SERIES__"));
        assert!(page.contains(r#""key":"I""#));
        assert!(page.contains("rgba(0,0,255,0.8)"));
        assert!(page.contains("strokeStyle = \"#888\""));
    }
}
