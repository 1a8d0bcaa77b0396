//! Vector chart rendering for static export.
//!
//! Produces self-contained SVG markup on a fixed 400×300 canvas with explicit
//! width/height attributes, so it can be dropped straight into the HTML handed
//! to the PDF renderer. The interactive dashboard never goes through here.
//!
//! Geometry is computed separately (`bar_layout`, `donut_layout`,
//! `line_layout`) from markup emission so the proportions can be checked
//! without parsing SVG.

use thiserror::Error;
use tracing::warn;

use crate::charts::series::{ChartKind, ChartSpec};

pub const CANVAS_WIDTH: f64 = 400.0;
pub const CANVAS_HEIGHT: f64 = 300.0;
pub const PADDING: f64 = 50.0;

const BAR_GUTTER: f64 = 10.0;
/// The gutter never takes more than this share of a bar's slot.
const MAX_GUTTER_SHARE: f64 = 0.25;
const DONUT_MARGIN: f64 = 60.0;
const INNER_RADIUS_RATIO: f64 = 0.6;
const START_ANGLE: f64 = -90.0;
const LEGEND_LINE_HEIGHT: f64 = 16.0;

const TITLE_COLOR: &str = "#1F2937";
const VALUE_COLOR: &str = "#374151";
const AXIS_LABEL_COLOR: &str = "#6B7280";
const TRACK_COLOR: &str = "#E5E7EB";

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("chart '{0}' has no series points")]
    EmptySeries(String),

    #[error("chart kind {0:?} has no vector rendering")]
    UnsupportedKind(ChartKind),
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceGeometry {
    /// Degrees, 0° = 3 o'clock, increasing clockwise on screen.
    pub start_angle: f64,
    pub end_angle: f64,
}

impl SliceGeometry {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointGeometry {
    pub x: f64,
    pub y: f64,
}

fn plot_height() -> f64 {
    CANVAS_HEIGHT - PADDING * 2.0
}

fn baseline() -> f64 {
    CANVAS_HEIGHT - PADDING
}

/// `value / max`, or 0 when every value is zero.
fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value.max(0.0) / max).min(1.0)
    } else {
        0.0
    }
}

/// Bars anchored to the bottom axis, heights proportional to `value / max`.
///
/// Each bar owns an equal slot of the plot width. The gutter shrinks with the
/// slot, so the last bar always ends inside `CANVAS_WIDTH - PADDING`.
pub fn bar_layout(spec: &ChartSpec) -> Vec<BarGeometry> {
    let n = spec.series.len();
    if n == 0 {
        return Vec::new();
    }
    let max = spec.max_value();
    let slot = (CANVAS_WIDTH - PADDING * 2.0) / n as f64;
    let gutter = BAR_GUTTER.min(slot * MAX_GUTTER_SHARE);
    let width = slot - gutter;

    spec.series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let height = ratio(point.value, max) * plot_height();
            BarGeometry {
                x: PADDING + i as f64 * slot,
                y: baseline() - height,
                width,
                height,
            }
        })
        .collect()
}

/// Slices in series order from 12 o'clock, sweeps proportional to share of total.
pub fn donut_layout(spec: &ChartSpec) -> Vec<SliceGeometry> {
    let total: f64 = spec.series.iter().map(|p| p.value.max(0.0)).sum();
    let mut angle = START_ANGLE;

    spec.series
        .iter()
        .map(|point| {
            let sweep = if total > 0.0 {
                point.value.max(0.0) / total * 360.0
            } else {
                0.0
            };
            let slice = SliceGeometry {
                start_angle: angle,
                end_angle: angle + sweep,
            };
            angle += sweep;
            slice
        })
        .collect()
}

/// Evenly spaced points; a lone point sits in the horizontal centre.
pub fn line_layout(spec: &ChartSpec) -> Vec<PointGeometry> {
    let n = spec.series.len();
    let max = spec.max_value();
    let plot_width = CANVAS_WIDTH - PADDING * 2.0;
    let step = if n > 1 {
        plot_width / (n - 1) as f64
    } else {
        0.0
    };

    spec.series
        .iter()
        .enumerate()
        .map(|(i, point)| PointGeometry {
            x: if n > 1 {
                PADDING + i as f64 * step
            } else {
                CANVAS_WIDTH / 2.0
            },
            y: baseline() - ratio(point.value, max) * plot_height(),
        })
        .collect()
}

fn donut_radii() -> (f64, f64) {
    let outer = CANVAS_WIDTH.min(CANVAS_HEIGHT) / 2.0 - DONUT_MARGIN;
    (outer, outer * INNER_RADIUS_RATIO)
}

fn donut_center() -> (f64, f64) {
    (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0 - 10.0)
}

fn polar(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// Closed ring segment: outer arc forward, inner arc back.
///
/// A full 360° sweep would start and end on the same point, which SVG draws as
/// nothing, so it is shortened by a hair.
fn ring_segment_path(slice: &SliceGeometry) -> String {
    let (cx, cy) = donut_center();
    let (outer, inner) = donut_radii();
    let start = slice.start_angle;
    let end = if slice.sweep() >= 360.0 {
        start + 359.99
    } else {
        slice.end_angle
    };
    let large_arc = if end - start > 180.0 { 1 } else { 0 };

    let (osx, osy) = polar(cx, cy, outer, start);
    let (oex, oey) = polar(cx, cy, outer, end);
    let (iex, iey) = polar(cx, cy, inner, end);
    let (isx, isy) = polar(cx, cy, inner, start);

    format!(
        "M {} {} A {} {} 0 {large_arc} 1 {} {} L {} {} A {} {} 0 {large_arc} 0 {} {} Z",
        num(osx),
        num(osy),
        num(outer),
        num(outer),
        num(oex),
        num(oey),
        num(iex),
        num(iey),
        num(inner),
        num(inner),
        num(isx),
        num(isy),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Markup
// ────────────────────────────────────────────────────────────────────────────

/// Renders a chart, failing on an empty series or a kind with no vector form.
pub fn try_render(spec: &ChartSpec) -> Result<String, RenderError> {
    if spec.series.is_empty() {
        return Err(RenderError::EmptySeries(spec.title.clone()));
    }

    let body = match spec.kind {
        ChartKind::Bar => bar_markup(spec),
        ChartKind::Doughnut | ChartKind::Pie => donut_markup(spec),
        ChartKind::Line => line_markup(spec),
        kind @ (ChartKind::Progress | ChartKind::Timeline | ChartKind::Unknown) => {
            return Err(RenderError::UnsupportedKind(kind))
        }
    };

    Ok(svg_document(&spec.title, &body))
}

/// Renders a chart, substituting a "No data" placeholder on any error.
/// Export never breaks on a bad chart.
pub fn render_vector(spec: &ChartSpec) -> String {
    try_render(spec).unwrap_or_else(|e| {
        warn!(error = %e, "Chart rendering failed; using placeholder");
        placeholder_svg(&spec.title)
    })
}

/// An empty canvas carrying the title and a "No data" notice.
pub fn placeholder_svg(title: &str) -> String {
    let body = format!(
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="12" fill="{AXIS_LABEL_COLOR}">No data</text>"#,
        num(CANVAS_WIDTH / 2.0),
        num(CANVAS_HEIGHT / 2.0),
    );
    svg_document(title, &body)
}

fn svg_document(title: &str, body: &str) -> String {
    format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg"><text x="{cx}" y="25" text-anchor="middle" font-size="14" font-weight="600" fill="{TITLE_COLOR}">{title}</text>{body}</svg>"#,
        w = num(CANVAS_WIDTH),
        h = num(CANVAS_HEIGHT),
        cx = num(CANVAS_WIDTH / 2.0),
        title = escape_xml(title),
    )
}

fn bar_markup(spec: &ChartSpec) -> String {
    let mut out = String::new();
    for (i, (bar, point)) in bar_layout(spec).iter().zip(&spec.series).enumerate() {
        let center = bar.x + bar.width / 2.0;
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" rx="3"/>"#,
            num(bar.x),
            num(bar.y),
            num(bar.width),
            num(bar.height),
            escape_xml(spec.color_for(i)),
        ));
        if spec.show_values {
            out.push_str(&format!(
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="10" fill="{VALUE_COLOR}">{}</text>"#,
                num(center),
                num(bar.y - 3.0),
                num(point.value),
            ));
        }
        out.push_str(&axis_label(center, &point.label));
    }
    out
}

fn donut_markup(spec: &ChartSpec) -> String {
    let mut out = String::new();
    let slices = donut_layout(spec);
    let total: f64 = spec.series.iter().map(|p| p.value.max(0.0)).sum();

    if total <= 0.0 {
        let (cx, cy) = donut_center();
        let (outer, inner) = donut_radii();
        out.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{TRACK_COLOR}" stroke-width="{}"/>"#,
            num(cx),
            num(cy),
            num((outer + inner) / 2.0),
            num(outer - inner),
        ));
    }

    for (i, slice) in slices.iter().enumerate() {
        if slice.sweep() <= 0.0 {
            continue;
        }
        out.push_str(&format!(
            r#"<path d="{}" fill="{}"/>"#,
            ring_segment_path(slice),
            escape_xml(spec.color_for(i)),
        ));
    }

    if spec.show_legend {
        for (i, point) in spec.series.iter().enumerate() {
            let y = CANVAS_HEIGHT - 50.0 + i as f64 * LEGEND_LINE_HEIGHT;
            let share = if total > 0.0 {
                point.value.max(0.0) / total * 100.0
            } else {
                0.0
            };
            out.push_str(&format!(
                r#"<rect x="15" y="{}" width="10" height="10" fill="{}" rx="2"/><text x="30" y="{}" font-size="10" fill="{VALUE_COLOR}">{}: {} ({share:.1}%)</text>"#,
                num(y),
                escape_xml(spec.color_for(i)),
                num(y + 8.0),
                escape_xml(&point.label),
                num(point.value),
            ));
        }
    }
    out
}

fn line_markup(spec: &ChartSpec) -> String {
    let points = line_layout(spec);
    let stroke = escape_xml(spec.primary_color());

    let polyline = points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = format!(
        r#"<polyline points="{polyline}" fill="none" stroke="{stroke}" stroke-width="2"/>"#
    );
    for (p, point) in points.iter().zip(&spec.series) {
        out.push_str(&format!(
            r#"<circle cx="{}" cy="{}" r="3" fill="{stroke}"/>"#,
            num(p.x),
            num(p.y),
        ));
        if spec.show_values {
            out.push_str(&format!(
                r#"<text x="{}" y="{}" text-anchor="middle" font-size="10" fill="{VALUE_COLOR}">{}</text>"#,
                num(p.x),
                num(p.y - 6.0),
                num(point.value),
            ));
        }
        out.push_str(&axis_label(p.x, &point.label));
    }
    out
}

fn axis_label(x: f64, label: &str) -> String {
    format!(
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="10" fill="{AXIS_LABEL_COLOR}">{}</text>"#,
        num(x),
        num(baseline() + 15.0),
        escape_xml(label),
    )
}

/// Compact number: integers without a fraction, otherwise at most two decimals.
fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        return format!("{}", rounded as i64);
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Escapes text for XML/HTML element content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
