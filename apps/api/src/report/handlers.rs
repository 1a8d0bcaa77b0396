//! Axum route handlers for the Reports API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::charts::handlers::build_chart_bundle;
use crate::charts::ChartBundle;
use crate::errors::AppError;
use crate::llm_client::CompletionOptions;
use crate::mail::{decode_pdf_data, report_mail_html, Attachment, OutgoingMail};
use crate::models::report::{NewReport, ReportRow};
use crate::report::document::{format_weekday_date_id, render_document, DocumentRequest};
use crate::report::prompts::{build_report_messages, WorkCategory};
use crate::report::store;
use crate::report::templates::{ReportTemplate, TemplateInfo};
use crate::state::AppState;

const REPORT_MAX_TOKENS: u32 = 4000;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub updates: String,
    pub work_category: Option<String>,
    pub template_type: Option<String>,
    #[serde(default)]
    pub image_count: usize,
    pub model: Option<String>,
    /// Fixes the timeline jitter of the returned charts.
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub report: String,
    pub model: String,
    pub provider: String,
    pub charts: ChartBundle,
}

#[derive(Debug, Serialize)]
pub struct TemplateListing {
    pub key: &'static str,
    #[serde(flatten)]
    pub info: TemplateInfo,
}

/// POST /api/v1/reports/generate
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if req.updates.trim().is_empty() {
        return Err(AppError::Validation("updates must not be empty".to_string()));
    }

    let category = WorkCategory::parse(req.work_category.as_deref());
    let template = req.template_type.as_deref().and_then(ReportTemplate::parse);
    let messages = build_report_messages(&req.updates, category, template, req.image_count);
    let options = CompletionOptions {
        model: req.model.filter(|m| !m.trim().is_empty()),
        max_tokens: REPORT_MAX_TOKENS,
        ..CompletionOptions::default()
    };

    tracing::info!(
        category = category.key(),
        template = template.map(|t| t.key()),
        images = req.image_count,
        "Generating report"
    );
    let completion = state.llm.complete(&messages, &options).await?;
    let charts = build_chart_bundle(&state.keywords, &req.updates, req.seed);

    Ok(Json(GenerateResponse {
        report: completion.content,
        model: completion.model,
        provider: completion.provider,
        charts,
    }))
}

/// GET /api/v1/reports/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateListing>> {
    Json(
        ReportTemplate::ALL
            .into_iter()
            .map(|t| TemplateListing {
                key: t.key(),
                info: t.info(),
            })
            .collect(),
    )
}

fn document_html(state: &AppState, req: &DocumentRequest) -> Result<String, AppError> {
    if req.report_content.trim().is_empty() {
        return Err(AppError::Validation(
            "report_content must not be empty".to_string(),
        ));
    }
    Ok(render_document(
        req,
        &state.config.letterhead(),
        Utc::now().date_naive(),
    ))
}

/// POST /api/v1/reports/html
pub async fn handle_export_html(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    let html = document_html(&state, &req)?;
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response())
}

/// POST /api/v1/reports/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    let renderer = state
        .pdf
        .clone()
        .ok_or_else(|| AppError::NotImplemented("PDF export is not configured".to_string()))?;
    let html = document_html(&state, &req)?;
    let pdf = renderer.render_pdf(&html).await?;

    let disposition = format!(
        "attachment; filename=\"report-{}.pdf\"",
        Utc::now().timestamp_millis()
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    /// Exported PDF as a `data:` URL or bare base64.
    #[serde(default, alias = "pdfData")]
    pub pdf_data: String,
    #[serde(alias = "pdfName")]
    pub pdf_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub success: bool,
    pub message_id: Option<String>,
    pub message: &'static str,
}

/// POST /api/v1/reports/email
///
/// Sends an exported PDF as an attachment with a short cover letter.
pub async fn handle_email_report(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<EmailResponse>, AppError> {
    let transport = state
        .mail
        .clone()
        .ok_or_else(|| AppError::NotImplemented("Email delivery is not configured".to_string()))?;

    let to = req.to.trim();
    if to.is_empty() || req.subject.trim().is_empty() || req.pdf_data.trim().is_empty() {
        return Err(AppError::Validation(
            "to, subject and pdf_data are required".to_string(),
        ));
    }
    if !to.contains('@') {
        return Err(AppError::Validation(format!("'{to}' is not an email address")));
    }
    let pdf = decode_pdf_data(&req.pdf_data)
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("pdf_data is not valid base64".to_string()))?;

    let filename = req
        .pdf_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("report-{}.pdf", Utc::now().timestamp_millis()));
    let mail = OutgoingMail {
        to: to.to_string(),
        subject: req.subject.clone(),
        html: report_mail_html(&req.subject, &format_weekday_date_id(Utc::now().date_naive())),
        attachments: vec![Attachment {
            filename,
            content_type: "application/pdf".to_string(),
            content: pdf.into(),
        }],
    };

    let message_id = transport.send(&mail).await?;
    Ok(Json(EmailResponse {
        success: true,
        message_id,
        message: "Email berhasil dikirim!",
    }))
}

/// GET /api/v1/reports
pub async fn handle_list_reports(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportRow>>, AppError> {
    Ok(Json(store::list_reports(&state.db).await?))
}

/// POST /api/v1/reports
pub async fn handle_create_report(
    State(state): State<AppState>,
    Json(req): Json<NewReport>,
) -> Result<(StatusCode, Json<ReportRow>), AppError> {
    let row = store::create_report(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/reports/:id
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportRow>, AppError> {
    Ok(Json(store::get_report(&state.db, id).await?))
}

/// DELETE /api/v1/reports/:id
pub async fn handle_delete_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_report(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
