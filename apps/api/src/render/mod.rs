//! PDF rendering — pluggable, trait-based boundary to a headless-browser renderer.
//!
//! Default: `HttpPdfRenderer`, which posts the document to a browserless-style
//! `/pdf` endpoint. `AppState` holds an `Option<Arc<dyn PdfRenderer>>`; `None`
//! when no endpoint is configured.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("renderer returned status {status}: {message}")]
    Renderer { status: u16, message: String },

    #[error("renderer returned an empty document")]
    Empty,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// HTML in, PDF bytes out.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, PdfError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HttpPdfRenderer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct PdfMargin {
    top: &'static str,
    right: &'static str,
    bottom: &'static str,
    left: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PdfOptions {
    format: &'static str,
    print_background: bool,
    margin: PdfMargin,
}

#[derive(Debug, Serialize)]
struct PdfRequest<'a> {
    html: &'a str,
    options: PdfOptions,
}

impl<'a> PdfRequest<'a> {
    /// A4 with the letterhead margins used by every exported report.
    fn a4(html: &'a str) -> Self {
        Self {
            html,
            options: PdfOptions {
                format: "A4",
                print_background: true,
                margin: PdfMargin {
                    top: "1cm",
                    right: "3cm",
                    bottom: "3cm",
                    left: "3.5cm",
                },
            },
        }
    }
}

pub struct HttpPdfRenderer {
    client: Client,
    endpoint: String,
}

impl HttpPdfRenderer {
    pub fn new(endpoint: String) -> Result<Self, PdfError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(60)).build()?,
            endpoint,
        })
    }
}

#[async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, PdfError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PdfRequest::a4(html))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PdfError::Renderer {
                status: status.as_u16(),
                message,
            });
        }

        let pdf = response.bytes().await?;
        if pdf.is_empty() {
            return Err(PdfError::Empty);
        }
        tracing::debug!(bytes = pdf.len(), "PDF rendered");
        Ok(pdf)
    }
}
