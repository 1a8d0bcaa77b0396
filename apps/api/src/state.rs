use std::sync::Arc;

use sqlx::PgPool;

use crate::charts::KeywordTable;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::mail::MailTransport;
use crate::render::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// Status and category keyword table, loaded once at startup.
    pub keywords: Arc<KeywordTable>,
    /// Pluggable PDF backend. `None` when `PDF_RENDERER_URL` is unset.
    pub pdf: Option<Arc<dyn PdfRenderer>>,
    /// Pluggable mail backend. `None` when `MAIL_API_URL` is unset.
    pub mail: Option<Arc<dyn MailTransport>>,
}
