//! Chart series generation — derives chart specifications from extracted metrics.
//!
//! The same `ChartSpec` feeds the interactive dashboard widget (as JSON) and the
//! static vector renderer used for document export.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::keywords::KeywordTable;
use crate::charts::metrics::{extract_metrics, CategoryCounts, MetricsAggregate};
use crate::charts::palette::ColorScheme;

// ────────────────────────────────────────────────────────────────────────────
// Chart data model
// ────────────────────────────────────────────────────────────────────────────

/// Chart kinds understood by the dashboard widget.
///
/// `Progress` and `Timeline` exist only on the interactive side; the vector
/// renderer rejects them. Any other name lands in `Unknown`, which the
/// renderer rejects the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
    Progress,
    Timeline,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color: None,
        }
    }

    pub fn colored(label: impl Into<String>, value: f64, color: &str) -> Self {
        Self {
            label: label.into(),
            value,
            color: Some(color.to_string()),
        }
    }
}

/// A chart specification. Never mutated after construction.
///
/// Accepts the dashboard's `type`/`data` field names on input. A missing kind,
/// title or series deserialises to a spec that renders as a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(default, alias = "type")]
    pub kind: ChartKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "data")]
    pub series: Vec<SeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub show_legend: bool,
    #[serde(default)]
    pub show_values: bool,
}

impl ChartSpec {
    /// Fill colour for series index `i`: the point's own colour, then the
    /// spec palette, then the default scheme (cycled).
    pub fn color_for(&self, i: usize) -> &str {
        self.series
            .get(i)
            .and_then(|p| p.color.as_deref())
            .or_else(|| self.colors.as_ref().and_then(|c| c.get(i)).map(String::as_str))
            .unwrap_or_else(|| ColorScheme::Default.cycle(i))
    }

    /// Stroke colour for single-series charts (lines).
    pub fn primary_color(&self) -> &str {
        self.colors
            .as_ref()
            .and_then(|c| c.first())
            .map(String::as_str)
            .unwrap_or(TIMELINE_COLOR)
    }

    pub fn max_value(&self) -> f64 {
        self.series.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    pub fn total_value(&self) -> f64 {
        self.series.iter().map(|p| p.value).sum()
    }
}

/// Every chart derived from one work update, plus the raw metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBundle {
    pub progress: ChartSpec,
    pub category: ChartSpec,
    pub timeline: ChartSpec,
    pub metrics: MetricsAggregate,
}

// ────────────────────────────────────────────────────────────────────────────
// Generators
// ────────────────────────────────────────────────────────────────────────────

const COMPLETED_COLOR: &str = "#10B981";
const IN_PROGRESS_COLOR: &str = "#F59E0B";
const PENDING_COLOR: &str = "#6B7280";
const TIMELINE_COLOR: &str = "#3B82F6";

pub const WEEKDAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

/// Doughnut of the three status counts, always exactly three slices in the
/// order Completed, In Progress, Pending. Raw counts, no normalisation.
pub fn status_distribution_chart(metrics: &MetricsAggregate) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        title: "Progress Overview".to_string(),
        series: vec![
            SeriesPoint::colored("Completed", metrics.tasks_completed as f64, COMPLETED_COLOR),
            SeriesPoint::colored(
                "In Progress",
                metrics.tasks_in_progress as f64,
                IN_PROGRESS_COLOR,
            ),
            SeriesPoint::colored("Pending", metrics.tasks_pending as f64, PENDING_COLOR),
        ],
        colors: None,
        show_legend: true,
        show_values: true,
    }
}

/// Bar chart of non-zero categories in enumeration order.
///
/// With no categorised items at all this returns a single `Tasks = 1`
/// placeholder bar so the chart is always renderable. That bar is not data.
pub fn category_distribution_chart(categories: &CategoryCounts) -> ChartSpec {
    let mut series: Vec<SeriesPoint> = categories
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| SeriesPoint::new(capitalize(category.as_str()), count as f64))
        .collect();

    if series.is_empty() {
        debug!("No categorised items; using placeholder category series");
        series.push(SeriesPoint::new("Tasks", 1.0));
    }

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Work Distribution by Category".to_string(),
        series,
        colors: Some(ColorScheme::Gradient.to_vec()),
        show_legend: false,
        show_values: true,
    }
}

/// Simulated Mon–Fri line chart.
///
/// Each day is `floor(total / 5 * (0.8 + r * 0.4))` with a fresh draw `r` in
/// `[0, 1)`, i.e. an even split jittered by ±20%. Not idempotent: the output
/// depends on `rng`. Pass a seeded generator for reproducible values.
pub fn weekly_timeline_chart<R: Rng + ?Sized>(total_tasks: u32, rng: &mut R) -> ChartSpec {
    let daily_share = total_tasks as f64 / WEEKDAYS.len() as f64;
    let series = WEEKDAYS
        .iter()
        .map(|day| {
            let jitter = 0.8 + rng.gen::<f64>() * 0.4;
            SeriesPoint::new(*day, (daily_share * jitter).floor())
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Line,
        title: "Tasks Completed This Week".to_string(),
        series,
        colors: Some(vec![TIMELINE_COLOR.to_string()]),
        show_legend: false,
        show_values: false,
    }
}

/// Extracts metrics once and derives all three charts from them.
pub fn generate_all_charts<R: Rng + ?Sized>(
    text: &str,
    keywords: &KeywordTable,
    rng: &mut R,
) -> ChartBundle {
    let metrics = extract_metrics(text, keywords);

    ChartBundle {
        progress: status_distribution_chart(&metrics),
        category: category_distribution_chart(&metrics.categories),
        timeline: weekly_timeline_chart(metrics.total_tasks(), rng),
        metrics,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
