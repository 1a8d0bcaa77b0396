use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::CompletionOptions;
use crate::state::AppState;
use crate::writer::prompts::{build_writer_messages, DocumentType};

const WRITER_TEMPERATURE: f32 = 0.7;
const WRITER_MAX_TOKENS: u32 = 2500;

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    #[serde(default, alias = "docType")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub prompt: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub document: String,
    pub doc_type: DocumentType,
    pub model: String,
    pub provider: String,
}

/// POST /api/v1/documents/generate
pub async fn handle_write_document(
    State(state): State<AppState>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<WriteResponse>, AppError> {
    if req.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt must not be empty".to_string()));
    }

    let doc_type = DocumentType::parse(req.doc_type.as_deref());
    let options = CompletionOptions {
        model: req.model.filter(|m| !m.trim().is_empty()),
        temperature: WRITER_TEMPERATURE,
        max_tokens: WRITER_MAX_TOKENS,
    };

    tracing::info!(doc_type = doc_type.key(), "Writing document");
    let completion = state
        .llm
        .complete(&build_writer_messages(doc_type, &req.prompt), &options)
        .await?;

    Ok(Json(WriteResponse {
        document: completion.content,
        doc_type,
        model: completion.model,
        provider: completion.provider,
    }))
}
