mod charts;
mod config;
mod db;
mod errors;
mod llm_client;
mod mail;
mod models;
mod render;
mod report;
mod routes;
mod state;
mod writer;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::charts::KeywordTable;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::mail::{HttpMailTransport, MailTransport};
use crate::render::{HttpPdfRenderer, PdfRenderer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("gia_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gia API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(
        config.groq_api_key.clone(),
        config.llm_api_url.clone(),
        config.llm_model.clone(),
    )
    .context("failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.default_model());

    // Keyword table: JSON file if configured, built-in vocabulary otherwise
    let keywords = match &config.keywords_path {
        Some(path) => {
            let table = KeywordTable::from_json_file(path)?;
            info!("Keyword table loaded from {path}");
            table
        }
        None => KeywordTable::default(),
    };

    // PDF renderer is optional; without it the PDF route answers 501
    let pdf: Option<Arc<dyn PdfRenderer>> = match &config.pdf_renderer_url {
        Some(url) => {
            let renderer =
                HttpPdfRenderer::new(url.clone()).context("failed to build PDF renderer")?;
            info!("PDF renderer at {url}");
            Some(Arc::new(renderer))
        }
        None => {
            info!("PDF_RENDERER_URL not set, PDF export disabled");
            None
        }
    };

    // Mail transport is optional; without it the email route answers 501
    let mail: Option<Arc<dyn MailTransport>> = match &config.mail_api_url {
        Some(url) => {
            let transport = HttpMailTransport::new(
                url.clone(),
                config.mail_api_key.clone(),
                config.mail_from.clone(),
            )
            .context("failed to build mail transport")?;
            info!("Mail transport at {url}");
            Some(Arc::new(transport))
        }
        None => {
            info!("MAIL_API_URL not set, email delivery disabled");
            None
        }
    };

    // Build app state
    let state = AppState {
        db,
        llm,
        config: config.clone(),
        keywords: Arc::new(keywords),
        pdf,
        mail,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
