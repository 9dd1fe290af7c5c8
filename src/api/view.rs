use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::{
    metrics,
    models::DashboardState,
    series::{series, SeriesPoint},
    summary::{llm_log_rows, DashboardSummary, LlmLogRow},
    DashboardError, Result,
};

/// Read-only access to the poller's latest state.
#[derive(Clone)]
pub struct ViewState {
    pub dashboard: watch::Receiver<DashboardState>,
}

pub fn view_router(state: ViewState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/summary", get(get_summary))
        .route("/api/series/:metric_name", get(get_series))
        .route("/api/llm-logs", get(get_llm_logs))
        .route("/metrics", get(get_prometheus_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "dashboard" }))
}

async fn get_snapshot(State(state): State<ViewState>) -> Json<DashboardState> {
    let snapshot = state.dashboard.borrow().clone();
    Json(snapshot)
}

async fn get_summary(State(state): State<ViewState>) -> Json<DashboardSummary> {
    let summary = DashboardSummary::from_snapshot(&state.dashboard.borrow().snapshot);
    Json(summary)
}

async fn get_series(
    State(state): State<ViewState>,
    Path(metric_name): Path<String>,
) -> Json<Vec<SeriesPoint>> {
    debug!("Building series: {}", metric_name);
    let points: Vec<SeriesPoint> =
        series(&state.dashboard.borrow().snapshot.metrics, &metric_name).collect();
    Json(points)
}

async fn get_llm_logs(State(state): State<ViewState>) -> Json<Vec<LlmLogRow>> {
    let rows = llm_log_rows(&state.dashboard.borrow().snapshot);
    Json(rows)
}

async fn get_prometheus_metrics() -> Result<impl IntoResponse> {
    let body = metrics::gather_text()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

/// Serves the view routes on `addr` until `shutdown` resolves.
pub async fn start_view_server<F>(addr: &str, state: ViewState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = view_router(state);
    info!("Starting dashboard view server on {}", addr);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        DashboardError::Internal(format!("Failed to bind to address: {}", e))
    })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| DashboardError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
