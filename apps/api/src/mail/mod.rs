//! Mail delivery — pluggable, trait-based boundary to an outbound mail service.
//!
//! Default: `HttpMailTransport`, which posts the message as JSON to an HTTP
//! mail API (Resend-style `/emails`). `AppState` holds an
//! `Option<Arc<dyn MailTransport>>`; `None` when no endpoint is configured.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::charts::svg::escape_xml;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail service returned status {status}: {message}")]
    Provider { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Sends one message. Returns the provider's message id when it reports one.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<Option<String>, MailError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HttpMailTransport
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct WireAttachment<'a> {
    filename: &'a str,
    content_type: &'a str,
    /// Base64.
    content: String,
}

#[derive(Debug, Serialize)]
struct WireMail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    attachments: Vec<WireAttachment<'a>>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default, alias = "messageId")]
    id: Option<String>,
}

pub struct HttpMailTransport {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailTransport {
    pub fn new(endpoint: String, api_key: Option<String>, from: String) -> Result<Self, MailError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(30)).build()?,
            endpoint,
            api_key,
            from,
        })
    }

    fn wire<'a>(&'a self, mail: &'a OutgoingMail) -> WireMail<'a> {
        WireMail {
            from: &self.from,
            to: [&mail.to],
            subject: &mail.subject,
            html: &mail.html,
            attachments: mail
                .attachments
                .iter()
                .map(|a| WireAttachment {
                    filename: &a.filename,
                    content_type: &a.content_type,
                    content: BASE64_STANDARD.encode(&a.content),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<Option<String>, MailError> {
        let mut request = self.client.post(&self.endpoint).json(&self.wire(mail));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let id = serde_json::from_str::<SendResponse>(&body)
            .ok()
            .and_then(|r| r.id);
        tracing::info!(to = %mail.to, message_id = ?id, "Mail sent");
        Ok(id)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report mail content
// ────────────────────────────────────────────────────────────────────────────

/// Decodes a PDF sent as a `data:` URL or bare base64. `None` if it isn't valid base64.
pub fn decode_pdf_data(data: &str) -> Option<Vec<u8>> {
    let data = data.trim();
    let payload = if data.starts_with("data:") {
        data.split_once(',')?.1
    } else {
        data
    };
    BASE64_STANDARD.decode(payload.trim()).ok()
}

/// Cover letter for a report sent as an attachment.
pub fn report_mail_html(subject: &str, date_text: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; padding: 20px; max-width: 600px;"><h2 style="color: #1e40af;">📊 Laporan dari Gia AI</h2><p>Halo!</p><p>Aku mengirimkan laporan yang kamu request. Silakan cek attachment untuk detail lengkapnya! 📎</p><div style="background-color: #f3f4f6; padding: 15px; border-radius: 8px; margin: 20px 0;"><p style="margin: 0;"><strong>Subject:</strong> {subject}</p><p style="margin: 5px 0 0 0;"><strong>Tanggal:</strong> {date}</p></div><p>Kalau ada pertanyaan atau butuh laporan tambahan, feel free to reach out ya! ✨</p><hr style="border: none; border-top: 2px solid #e5e7eb; margin: 30px 0;"><p style="color: #6b7280; font-size: 12px; margin: 0;">Powered by Gia AI Assistant</p></div>"#,
        subject = escape_xml(subject),
        date = escape_xml(date_text),
    )
}
