//! Axum route handlers for the Charts API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::charts::keywords::KeywordTable;
use crate::charts::metrics::{extract_metrics, MetricsAggregate};
use crate::charts::series::{generate_all_charts, ChartBundle, ChartSpec};
use crate::charts::svg::render_vector;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChartsRequest {
    pub updates: String,
    /// Fixes the timeline jitter. Omit for a fresh draw per request.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MetricsRequest {
    pub updates: String,
}

/// Builds the chart bundle, seeding the timeline RNG when asked to.
pub fn build_chart_bundle(keywords: &KeywordTable, updates: &str, seed: Option<u64>) -> ChartBundle {
    match seed {
        Some(seed) => generate_all_charts(updates, keywords, &mut StdRng::seed_from_u64(seed)),
        None => generate_all_charts(updates, keywords, &mut rand::thread_rng()),
    }
}

/// POST /api/v1/charts
///
/// Progress, category and timeline charts plus raw metrics for one work update.
pub async fn handle_generate_charts(
    State(state): State<AppState>,
    Json(request): Json<ChartsRequest>,
) -> Json<ChartBundle> {
    Json(build_chart_bundle(
        &state.keywords,
        &request.updates,
        request.seed,
    ))
}

/// POST /api/v1/charts/metrics
pub async fn handle_extract_metrics(
    State(state): State<AppState>,
    Json(request): Json<MetricsRequest>,
) -> Json<MetricsAggregate> {
    Json(extract_metrics(&request.updates, &state.keywords))
}

/// POST /api/v1/charts/svg
///
/// Static SVG for a chart spec. Unrenderable specs come back as a placeholder, never an error.
pub async fn handle_render_svg(Json(spec): Json<ChartSpec>) -> Response {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_vector(&spec),
    )
        .into_response()
}
