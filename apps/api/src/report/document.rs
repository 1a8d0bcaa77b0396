//! Report document assembly — the self-contained HTML handed to the PDF renderer.
//!
//! Charts are embedded as inline SVG through `render_vector`, which never
//! fails, so one bad chart cannot take the whole export down.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::charts::metrics::MetricsAggregate;
use crate::charts::series::{ChartBundle, ChartSpec};
use crate::charts::svg::{escape_xml, placeholder_svg, render_vector};

pub const DEFAULT_TITLE: &str = "Laporan Progress Pekerjaan";
const AUTHOR_PLACEHOLDER: &str = "[Nama Pembuat]";
const DOC_NUMBER_PLACEHOLDER: &str = "[Nomor Dokumen]";

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const WEEKDAYS_ID: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

/// Organisation details printed in the letterhead.
#[derive(Debug, Clone)]
pub struct Letterhead {
    pub name: String,
    pub division: String,
    pub contact: String,
}

/// A documentation image, usually a `data:` URL.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentImage {
    pub name: String,
    pub data: String,
}

/// Everything the document needs besides the letterhead and date.
///
/// Field names are snake_case; the dashboard's camelCase names are accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    #[serde(default, alias = "reportContent")]
    pub report_content: String,
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(alias = "docNumber")]
    pub doc_number: Option<String>,
    #[serde(default)]
    pub images: Vec<DocumentImage>,
    #[serde(
        default,
        alias = "chart_data",
        alias = "chartData",
        deserialize_with = "lenient"
    )]
    pub charts: Option<DocumentCharts>,
}

/// Chart data as the exporter receives it. Every part is optional: a missing
/// or malformed chart becomes a placeholder, missing metrics count as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentCharts {
    #[serde(default, deserialize_with = "lenient")]
    pub progress: Option<ChartSpec>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<ChartSpec>,
    #[serde(default, deserialize_with = "lenient")]
    pub timeline: Option<ChartSpec>,
    #[serde(default, deserialize_with = "lenient")]
    pub metrics: Option<MetricsAggregate>,
}

impl From<ChartBundle> for DocumentCharts {
    fn from(bundle: ChartBundle) -> Self {
        Self {
            progress: Some(bundle.progress),
            category: Some(bundle.category),
            timeline: Some(bundle.timeline),
            metrics: Some(bundle.metrics),
        }
    }
}

/// Deserialises `T`, turning a malformed value into `None` instead of an error.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed chart data");
            None
        }
    }))
}

/// Long Indonesian date, e.g. "18 Oktober 2026".
pub fn format_date_id(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

/// Long Indonesian date with weekday, e.g. "Minggu, 18 Oktober 2026".
pub fn format_weekday_date_id(date: NaiveDate) -> String {
    format!(
        "{}, {}",
        WEEKDAYS_ID[date.weekday().num_days_from_monday() as usize],
        format_date_id(date)
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Light markdown
// ────────────────────────────────────────────────────────────────────────────

fn inline_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"\*\*(.+?)\*\*", "<strong>$1</strong>"),
            (r"__(.+?)__", "<strong>$1</strong>"),
            (r"\*([^*\n]+?)\*", "<em>$1</em>"),
            (r"(^|\W)_([^_\n]+?)_(\W|$)", "$1<em>$2</em>$3"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("inline markdown pattern is valid"),
                replacement,
            )
        })
        .collect()
    })
}

fn format_inline(text: &str) -> String {
    inline_rules()
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (level, rest)))
}

fn list_item(line: &str) -> Option<&str> {
    line.strip_prefix("* ").or_else(|| line.strip_prefix("- "))
}

/// Converts model output to HTML: headings, bold/italic, bullet lists and
/// blank-line paragraphs. Input is HTML-escaped first.
pub fn format_markdown(text: &str) -> String {
    let escaped = escape_xml(&text.replace("\r\n", "\n"));
    let mut html = String::new();

    for block in escaped.split("\n\n") {
        let mut paragraph: Vec<String> = Vec::new();
        let mut items: Vec<String> = Vec::new();

        let flush_paragraph = |paragraph: &mut Vec<String>, html: &mut String| {
            if !paragraph.is_empty() {
                html.push_str(&format!("<p>{}</p>", paragraph.join("\n")));
                paragraph.clear();
            }
        };
        let flush_list = |items: &mut Vec<String>, html: &mut String| {
            if !items.is_empty() {
                html.push_str("<ul>");
                for item in items.drain(..) {
                    html.push_str(&format!("<li>{item}</li>"));
                }
                html.push_str("</ul>");
            }
        };

        for line in block.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Some((level, rest)) = heading(line) {
                flush_paragraph(&mut paragraph, &mut html);
                flush_list(&mut items, &mut html);
                html.push_str(&format!("<h{level}>{}</h{level}>", format_inline(rest)));
            } else if let Some(rest) = list_item(line) {
                flush_paragraph(&mut paragraph, &mut html);
                items.push(format_inline(rest));
            } else {
                flush_list(&mut items, &mut html);
                paragraph.push(format_inline(line));
            }
        }
        flush_paragraph(&mut paragraph, &mut html);
        flush_list(&mut items, &mut html);
    }

    html
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

const STYLES: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: Arial, 'Helvetica Neue', Helvetica, sans-serif; line-height: 1.6; color: #1f2937; padding: 40px; background: white; }
.letterhead { border-bottom: 3px solid #1e40af; padding-bottom: 15px; margin-bottom: 5px; }
.company-name { font-size: 24px; font-weight: 700; color: #1e40af; margin-bottom: 5px; text-transform: uppercase; letter-spacing: 1px; }
.division-name { font-size: 14px; color: #6b7280; font-weight: 500; margin-bottom: 3px; }
.company-info { font-size: 11px; color: #9ca3af; line-height: 1.4; }
.header { margin-top: 30px; margin-bottom: 30px; }
.report-title { font-size: 20px; font-weight: 700; margin-bottom: 15px; text-align: center; text-transform: uppercase; letter-spacing: 0.5px; }
.meta-info { display: grid; grid-template-columns: 1fr 1fr; gap: 8px; font-size: 13px; color: #374151; border: 1px solid #e5e7eb; padding: 15px; background-color: #f9fafb; border-radius: 4px; }
.meta-label { font-weight: 600; min-width: 100px; display: inline-block; }
.content { margin-top: 30px; white-space: pre-wrap; font-size: 14px; }
.content h1, .content h2 { color: #1e40af; font-size: 20px; margin: 25px 0 12px; font-weight: 600; }
.content h3 { color: #374151; font-size: 16px; margin: 20px 0 10px; font-weight: 600; }
.content p { margin-bottom: 12px; text-align: justify; }
.content ul { margin: 0 0 12px 25px; }
.charts-section, .documentation { margin-top: 40px; page-break-before: auto; }
.charts-section h2, .documentation h2 { color: #1e40af; font-size: 18px; margin-bottom: 20px; font-weight: 600; }
.metrics-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; margin-bottom: 20px; }
.metric-card { border: 1px solid #e5e7eb; padding: 15px; border-radius: 8px; background-color: #f9fafb; text-align: center; }
.metric-value { font-size: 28px; font-weight: 700; color: #1e40af; margin-bottom: 5px; }
.metric-label { font-size: 12px; color: #6b7280; text-transform: uppercase; letter-spacing: 0.5px; }
.charts-grid, .image-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 15px; margin-top: 20px; }
.chart-container { border: 1px solid #e5e7eb; padding: 10px; border-radius: 8px; overflow: hidden; min-height: 320px; display: flex; align-items: center; justify-content: center; }
.chart-container.full-width { grid-column: span 2; }
.chart-container svg { width: 100%; height: auto; max-width: 100%; display: block; margin: 0 auto; }
.image-container { border: 1px solid #e5e7eb; padding: 10px; border-radius: 4px; background-color: #f9fafb; }
.image-container img { width: 100%; height: auto; border-radius: 4px; margin-bottom: 8px; }
.image-caption { font-size: 11px; color: #6b7280; text-align: center; font-style: italic; }
.footer { margin-top: 50px; padding-top: 20px; border-top: 2px solid #e5e7eb; text-align: center; color: #9ca3af; font-size: 12px; }
"#;

fn meta_item(label: &str, value: &str) -> String {
    format!(
        r#"<div class="meta-item"><span class="meta-label">{label}</span><span class="meta-value">: {}</span></div>"#,
        escape_xml(value)
    )
}

fn chart_markup(chart: Option<&ChartSpec>, fallback_title: &str) -> String {
    chart
        .map(render_vector)
        .unwrap_or_else(|| placeholder_svg(fallback_title))
}

fn charts_section(charts: &DocumentCharts) -> String {
    let metrics = charts.metrics.unwrap_or_default();
    let card = |value: String, label: &str| {
        format!(
            r#"<div class="metric-card"><div class="metric-value">{value}</div><div class="metric-label">{label}</div></div>"#
        )
    };

    format!(
        r#"<div class="charts-section"><h2>📊 ANALISIS &amp; VISUALISASI DATA</h2><div class="metrics-grid">{}{}{}</div><div class="charts-grid"><div class="chart-container">{}</div><div class="chart-container">{}</div><div class="chart-container full-width">{}</div></div></div>"#,
        card(metrics.total_tasks().to_string(), "Total Tasks"),
        card(metrics.tasks_completed.to_string(), "Completed"),
        card(format!("{}%", metrics.completion_rate()), "Completion Rate"),
        chart_markup(charts.progress.as_ref(), "Progress Overview"),
        chart_markup(charts.category.as_ref(), "Work Distribution by Category"),
        chart_markup(charts.timeline.as_ref(), "Tasks Completed This Week"),
    )
}

fn documentation_section(images: &[DocumentImage]) -> String {
    let items: String = images
        .iter()
        .enumerate()
        .map(|(i, img)| {
            format!(
                r#"<div class="image-container"><img src="{src}" alt="{name}" /><div class="image-caption">Gambar {n}: {name}</div></div>"#,
                src = escape_xml(&img.data),
                name = escape_xml(&img.name),
                n = i + 1,
            )
        })
        .collect();
    format!(
        r#"<div class="documentation"><h2>DOKUMENTASI</h2><div class="image-grid">{items}</div></div>"#
    )
}

/// Builds the complete HTML document for one report.
pub fn render_document(request: &DocumentRequest, letterhead: &Letterhead, date: NaiveDate) -> String {
    let date_text = format_date_id(date);
    let title = request
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let meta = [
        meta_item(
            "Nomor",
            request.doc_number.as_deref().unwrap_or(DOC_NUMBER_PLACEHOLDER),
        ),
        meta_item("Tanggal", &date_text),
        meta_item(
            "Dibuat oleh",
            request.author.as_deref().unwrap_or(AUTHOR_PLACEHOLDER),
        ),
        meta_item("Divisi", &letterhead.division),
    ]
    .concat();

    let charts = request
        .charts
        .as_ref()
        .map(charts_section)
        .unwrap_or_default();
    let documentation = if request.images.is_empty() {
        String::new()
    } else {
        documentation_section(&request.images)
    };

    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>{title}</title><style>{STYLES}</style></head><body><div class="letterhead"><div class="company-name">{org}</div><div class="division-name">Divisi {division}</div><div class="company-info">{contact}</div></div><div class="header"><div class="report-title">{title}</div><div class="meta-info">{meta}</div></div><div class="content">{content}</div>{charts}{documentation}<div class="footer">{date}</div></body></html>"#,
        title = escape_xml(title),
        org = escape_xml(&letterhead.name),
        division = escape_xml(&letterhead.division),
        contact = escape_xml(&letterhead.contact),
        content = format_markdown(&request.report_content),
        date = date_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::keywords::KeywordTable;
    use crate::charts::series::generate_all_charts;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn letterhead() -> Letterhead {
        Letterhead {
            name: "SRT Corp".to_string(),
            division: "Creative & System Development".to_string(),
            contact: "Jakarta, Indonesia".to_string(),
        }
    }

    fn request(content: &str) -> DocumentRequest {
        DocumentRequest {
            report_content: content.to_string(),
            title: None,
            author: None,
            doc_number: None,
            images: vec![],
            charts: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_format_date_id() {
        assert_eq!(format_date_id(date()), "18 Oktober 2026");
        assert_eq!(
            format_date_id(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()),
            "2 Januari 2025"
        );
    }

    #[test]
    fn test_format_weekday_date_id() {
        assert_eq!(format_weekday_date_id(date()), "Minggu, 18 Oktober 2026");
        assert_eq!(
            format_weekday_date_id(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()),
            "Senin, 19 Oktober 2026"
        );
    }

    #[test]
    fn test_markdown_bold_and_paragraphs() {
        let html = format_markdown("**RINGKASAN**\nIsi pertama\n\nParagraf kedua");
        assert_eq!(
            html,
            "<p><strong>RINGKASAN</strong>\nIsi pertama</p><p>Paragraf kedua</p>"
        );
    }

    #[test]
    fn test_markdown_headings_and_lists() {
        let html = format_markdown("## Detail\n- satu\n- *dua*\nPenutup");
        assert_eq!(
            html,
            "<h2>Detail</h2><ul><li>satu</li><li><em>dua</em></li></ul><p>Penutup</p>"
        );
    }

    #[test]
    fn test_markdown_underscore_italic_spares_identifiers() {
        let html = format_markdown("file user_id tetap, tapi _penting_ miring");
        assert!(html.contains("user_id"));
        assert!(html.contains("<em>penting</em>"));
    }

    #[test]
    fn test_markdown_escapes_html() {
        let html = format_markdown("<script>alert('x')</script> & **ok**");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; <strong>ok</strong>"));
    }

    #[test]
    fn test_document_defaults_and_letterhead() {
        let html = render_document(&request("isi"), &letterhead(), date());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div class="report-title">Laporan Progress Pekerjaan</div>"#));
        assert!(html.contains("SRT Corp"));
        assert!(html.contains("Creative &amp; System Development"));
        assert!(html.contains(": [Nomor Dokumen]"));
        assert!(html.contains(": [Nama Pembuat]"));
        assert!(html.contains(": 18 Oktober 2026"));
        assert!(!html.contains("charts-section\""));
        assert!(!html.contains("class=\"documentation\""));
    }

    #[test]
    fn test_document_embeds_three_charts_and_metric_cards() {
        let charts = generate_all_charts(
            "fix api\nsedang desain figma\nakan rapat\nselesai testing",
            &KeywordTable::default(),
            &mut StdRng::seed_from_u64(5),
        );
        let mut req = request("isi");
        req.charts = Some(charts.into());
        let html = render_document(&req, &letterhead(), date());
        assert_eq!(html.matches("<svg ").count(), 3);
        assert!(html.contains(r#"<div class="metric-value">4</div><div class="metric-label">Total Tasks</div>"#));
        assert!(html.contains(r#"<div class="metric-value">2</div><div class="metric-label">Completed</div>"#));
        assert!(html.contains(r#"<div class="metric-value">50%</div>"#));
    }

    #[test]
    fn test_document_survives_unrenderable_chart() {
        let mut charts = generate_all_charts("", &KeywordTable::default(), &mut StdRng::seed_from_u64(1));
        charts.timeline.series.clear();
        let mut req = request("isi");
        req.charts = Some(charts.into());
        let html = render_document(&req, &letterhead(), date());
        assert!(html.contains("No data"));
        assert!(html.contains(r#"<div class="metric-value">0%</div>"#));
    }

    #[test]
    fn test_document_images_are_captioned() {
        let mut req = request("isi");
        req.images = vec![DocumentImage {
            name: "mockup.png".to_string(),
            data: "data:image/png;base64,AAAA".to_string(),
        }];
        let html = render_document(&req, &letterhead(), date());
        assert!(html.contains("Gambar 1: mockup.png"));
        assert!(html.contains(r#"src="data:image/png;base64,AAAA""#));
    }

    #[test]
    fn test_request_accepts_chart_data_alias() {
        let json = r#"{
            "report_content": "isi",
            "chart_data": {
                "progress": {"kind": "doughnut", "title": "P", "series": [{"label": "Completed", "value": 1}]},
                "category": {"kind": "bar", "title": "C", "series": [{"label": "Tasks", "value": 1}]},
                "timeline": {"kind": "line", "title": "T", "series": [{"label": "Mon", "value": 0}]},
                "metrics": {"tasksCompleted": 1, "tasksInProgress": 0, "tasksPending": 0,
                    "categories": {"development": 0, "design": 0, "testing": 0, "documentation": 0, "meeting": 0, "other": 1}}
            }
        }"#;
        let req: DocumentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.charts.unwrap().metrics.unwrap().tasks_completed, 1);
    }

    #[test]
    fn test_request_accepts_dashboard_field_names() {
        let req: DocumentRequest = serde_json::from_str(
            r#"{"reportContent": "isi laporan", "docNumber": "001/SRT/X/2026"}"#,
        )
        .unwrap();
        assert_eq!(req.report_content, "isi laporan");
        assert_eq!(req.doc_number.as_deref(), Some("001/SRT/X/2026"));
        let html = render_document(&req, &letterhead(), date());
        assert!(html.contains(": 001/SRT/X/2026"));
    }

    #[test]
    fn test_unknown_chart_kind_still_renders_document() {
        let req: DocumentRequest = serde_json::from_str(
            r#"{
                "reportContent": "isi",
                "chartData": {
                    "progress": {"type": "radar", "title": "Radar", "data": [{"label": "a", "value": 1}]},
                    "category": {"type": "bar", "title": "Kategori", "data": [{"label": "Development", "value": 2}]},
                    "timeline": {"type": "line", "title": "Minggu", "data": [{"label": "Mon", "value": 1}]}
                }
            }"#,
        )
        .unwrap();
        let html = render_document(&req, &letterhead(), date());
        assert_eq!(html.matches("<svg ").count(), 3);
        assert_eq!(html.matches("No data").count(), 1);
        assert!(html.contains("<rect"));
        assert!(html.contains("<polyline"));
    }

    #[test]
    fn test_missing_or_malformed_charts_become_placeholders() {
        let req: DocumentRequest = serde_json::from_str(
            r#"{
                "report_content": "isi",
                "chart_data": {
                    "category": {"kind": "bar", "title": "Kategori", "series": "not-a-list"},
                    "metrics": {"tasksCompleted": 3, "tasksInProgress": 1, "tasksPending": 0,
                        "categories": {"development": 4, "design": 0, "testing": 0, "documentation": 0, "meeting": 0, "other": 0}}
                }
            }"#,
        )
        .unwrap();
        let charts = req.charts.as_ref().unwrap();
        assert!(charts.progress.is_none());
        assert!(charts.category.is_none());
        assert!(charts.timeline.is_none());

        let html = render_document(&req, &letterhead(), date());
        assert_eq!(html.matches("No data").count(), 3);
        assert!(html.contains(">Progress Overview<"));
        assert!(html.contains(">Tasks Completed This Week<"));
        assert!(html.contains(r#"<div class="metric-value">75%</div>"#));
    }

    #[test]
    fn test_chart_data_of_the_wrong_shape_is_ignored() {
        let req: DocumentRequest =
            serde_json::from_str(r#"{"report_content": "isi", "chartData": "oops"}"#).unwrap();
        assert!(req.charts.is_none());
        let html = render_document(&req, &letterhead(), date());
        assert!(!html.contains("<svg "));
    }
}
