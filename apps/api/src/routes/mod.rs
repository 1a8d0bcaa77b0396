pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::charts::handlers as charts;
use crate::report::handlers as reports;
use crate::state::AppState;
use crate::writer::handlers as writer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Charts API
        .route("/api/v1/charts", post(charts::handle_generate_charts))
        .route("/api/v1/charts/metrics", post(charts::handle_extract_metrics))
        .route("/api/v1/charts/svg", post(charts::handle_render_svg))
        // Reports API
        .route("/api/v1/reports/generate", post(reports::handle_generate_report))
        .route("/api/v1/reports/templates", get(reports::handle_list_templates))
        .route("/api/v1/reports/html", post(reports::handle_export_html))
        .route("/api/v1/reports/pdf", post(reports::handle_export_pdf))
        .route("/api/v1/reports/email", post(reports::handle_email_report))
        .route(
            "/api/v1/reports",
            get(reports::handle_list_reports).post(reports::handle_create_report),
        )
        .route(
            "/api/v1/reports/:id",
            get(reports::handle_get_report).delete(reports::handle_delete_report),
        )
        // Document writer
        .route("/api/v1/documents/generate", post(writer::handle_write_document))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use bytes::Bytes;
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::charts::KeywordTable;
    use crate::config::Config;
    use crate::llm_client::{LlmClient, DEFAULT_MODEL};
    use crate::mail::{MailError, MailTransport, OutgoingMail};
    use crate::render::{PdfError, PdfRenderer};

    struct FakePdf;

    #[async_trait]
    impl PdfRenderer for FakePdf {
        async fn render_pdf(&self, html: &str) -> Result<Bytes, PdfError> {
            assert!(html.starts_with("<!DOCTYPE html>"));
            Ok(Bytes::from_static(b"%PDF-1.7 fake"))
        }
    }

    #[derive(Default)]
    struct RecordingMail {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingMail {
        async fn send(&self, mail: &OutgoingMail) -> Result<Option<String>, MailError> {
            self.sent.lock().unwrap().push(mail.clone());
            Ok(Some("msg-1".to_string()))
        }
    }

    /// Local chat-completions stub that always answers with a fixed report.
    async fn spawn_llm_stub() -> String {
        let app = Router::new().route(
            "/chat",
            post(|| async {
                axum::Json(json!({
                    "model": "llama-3.3-70b-versatile",
                    "choices": [{"message": {"role": "assistant", "content": "**RINGKASAN EKSEKUTIF**\nSemua beres."}}]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/chat")
    }

    fn state(llm_url: String, pdf: Option<Arc<dyn PdfRenderer>>) -> AppState {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy(&config.database_url)
            .unwrap();
        let llm = LlmClient::new("test-key".to_string(), llm_url, DEFAULT_MODEL.to_string())
            .unwrap()
            .with_retry_base_delay(Duration::from_millis(1));
        AppState {
            db,
            llm,
            config,
            keywords: Arc::new(KeywordTable::default()),
            pdf,
            mail: None,
        }
    }

    fn app() -> Router {
        build_router(state("http://127.0.0.1:9/chat".to_string(), None))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_body(response: axum::response::Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&read_body(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "gia-api");
    }

    #[tokio::test]
    async fn test_charts_route_is_reproducible_with_seed() {
        let body = json!({"updates": "fix login api\nsedang desain figma\nakan rapat", "seed": 42});
        let first = read_json(app().oneshot(post_json("/api/v1/charts", body.clone())).await.unwrap()).await;
        let second = read_json(app().oneshot(post_json("/api/v1/charts", body)).await.unwrap()).await;
        assert_eq!(first, second);
        assert_eq!(first["metrics"]["tasksCompleted"], 1);
        assert_eq!(first["metrics"]["tasksInProgress"], 1);
        assert_eq!(first["metrics"]["tasksPending"], 1);
        assert_eq!(first["progress"]["kind"], "doughnut");
        assert_eq!(first["timeline"]["series"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_metrics_route() {
        let response = app()
            .oneshot(post_json("/api/v1/charts/metrics", json!({"updates": "\n\n"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["tasksCompleted"], 0);
        assert_eq!(body["categories"]["other"], 0);
    }

    #[tokio::test]
    async fn test_svg_route_returns_placeholder_for_empty_series() {
        let spec = json!({"kind": "bar", "title": "Kosong", "series": []});
        let response = app().oneshot(post_json("/api/v1/charts/svg", spec)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        let svg = String::from_utf8(read_body(response).await.to_vec()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No data"));
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_updates() {
        let response = app()
            .oneshot(post_json("/api/v1/reports/generate", json!({"updates": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_returns_report_and_charts() {
        let app = build_router(state(spawn_llm_stub().await, None));
        let response = app
            .oneshot(post_json(
                "/api/v1/reports/generate",
                json!({"updates": "fix bug login\nrapat klien", "template_type": "weekly", "seed": 3}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert!(body["report"].as_str().unwrap().contains("RINGKASAN EKSEKUTIF"));
        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["provider"], "Groq AI");
        assert_eq!(body["charts"]["metrics"]["tasksCompleted"], 2);
    }

    #[tokio::test]
    async fn test_generate_surfaces_llm_failure() {
        let response = app()
            .oneshot(post_json("/api/v1/reports/generate", json!({"updates": "fix api"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(response).await["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_templates_route_lists_all_six() {
        let response = app()
            .oneshot(Request::get("/api/v1/reports/templates").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = read_json(response).await;
        let templates = body.as_array().unwrap();
        assert_eq!(templates.len(), 6);
        assert_eq!(templates[0]["key"], "weekly");
        assert_eq!(templates[0]["name"], "Laporan Mingguan");
    }

    #[tokio::test]
    async fn test_html_export() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/reports/html",
                json!({"report_content": "**Judul**\nIsi", "title": "Laporan Sprint 7"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let html = String::from_utf8(read_body(response).await.to_vec()).unwrap();
        assert!(html.contains("Laporan Sprint 7"));
        assert!(html.contains("<strong>Judul</strong>"));
    }

    #[tokio::test]
    async fn test_html_export_requires_content() {
        let response = app()
            .oneshot(post_json("/api/v1/reports/html", json!({"title": "x"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pdf_export_without_renderer_is_501() {
        let response = app()
            .oneshot(post_json("/api/v1/reports/pdf", json!({"report_content": "isi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_pdf_export_sets_attachment_headers() {
        let app = build_router(state(
            "http://127.0.0.1:9/chat".to_string(),
            Some(Arc::new(FakePdf)),
        ));
        let response = app
            .oneshot(post_json("/api/v1/reports/pdf", json!({"report_content": "isi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"report-"));
        assert!(disposition.ends_with(".pdf\""));
        assert_eq!(&read_body(response).await[..], b"%PDF-1.7 fake");
    }

    #[tokio::test]
    async fn test_report_id_must_be_a_uuid() {
        let response = app()
            .oneshot(Request::get("/api/v1/reports/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_svg_route_degrades_unknown_kind() {
        let spec = json!({"type": "radar", "title": "Radar", "data": [{"label": "a", "value": 1}]});
        let response = app().oneshot(post_json("/api/v1/charts/svg", spec)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let svg = String::from_utf8(read_body(response).await.to_vec()).unwrap();
        assert!(svg.contains("No data"));
    }

    #[tokio::test]
    async fn test_html_export_survives_unknown_chart_kind() {
        let body = json!({
            "reportContent": "isi",
            "chartData": {
                "progress": {"type": "radar", "title": "Radar", "data": [{"label": "a", "value": 1}]},
                "category": {"type": "bar", "title": "Kategori", "data": [{"label": "Development", "value": 1}]},
                "timeline": {"type": "line", "title": "Minggu", "data": [{"label": "Mon", "value": 1}]}
            }
        });
        let response = app().oneshot(post_json("/api/v1/reports/html", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(read_body(response).await.to_vec()).unwrap();
        assert_eq!(html.matches("<svg ").count(), 3);
        assert_eq!(html.matches("No data").count(), 1);
    }

    #[tokio::test]
    async fn test_html_export_survives_missing_charts() {
        let body = json!({
            "report_content": "isi",
            "chartData": {
                "category": {"type": "bar", "title": "Kategori", "data": [{"label": "Development", "value": 1}]}
            }
        });
        let response = app().oneshot(post_json("/api/v1/reports/html", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(read_body(response).await.to_vec()).unwrap();
        assert_eq!(html.matches("<svg ").count(), 3);
        assert_eq!(html.matches("No data").count(), 2);
    }

    #[tokio::test]
    async fn test_email_without_transport_is_501() {
        let body = json!({"to": "a@b.co", "subject": "Laporan", "pdfData": "JVBERi0xLjc="});
        let response = app().oneshot(post_json("/api/v1/reports/email", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_email_sends_decoded_pdf_attachment() {
        let mail = Arc::new(RecordingMail::default());
        let mut app_state = state("http://127.0.0.1:9/chat".to_string(), None);
        app_state.mail = Some(mail.clone() as Arc<dyn MailTransport>);
        let body = json!({
            "to": "lead@example.com",
            "subject": "Laporan Mingguan",
            "pdfData": "data:application/pdf;base64,JVBERi0xLjc=",
            "pdfName": "laporan.pdf"
        });
        let response = build_router(app_state)
            .oneshot(post_json("/api/v1/reports/email", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let reply = read_json(response).await;
        assert_eq!(reply["success"], true);
        assert_eq!(reply["message_id"], "msg-1");

        let sent = mail.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "lead@example.com");
        assert!(sent[0].html.contains("Laporan Mingguan"));
        assert_eq!(sent[0].attachments[0].filename, "laporan.pdf");
        assert_eq!(sent[0].attachments[0].content_type, "application/pdf");
        assert_eq!(&sent[0].attachments[0].content[..], b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_email_rejects_bad_input() {
        let mail = Arc::new(RecordingMail::default());
        let mut app_state = state("http://127.0.0.1:9/chat".to_string(), None);
        app_state.mail = Some(mail.clone() as Arc<dyn MailTransport>);
        let app = build_router(app_state);

        for body in [
            json!({"to": "lead@example.com", "subject": "x"}),
            json!({"to": "not-an-address", "subject": "x", "pdfData": "JVBERi0xLjc="}),
            json!({"to": "lead@example.com", "subject": "x", "pdfData": "%%%"}),
        ] {
            let response = app
                .clone()
                .oneshot(post_json("/api/v1/reports/email", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        assert!(mail.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_document_writer_returns_document() {
        let app = build_router(state(spawn_llm_stub().await, None));
        let response = app
            .oneshot(post_json(
                "/api/v1/documents/generate",
                json!({"docType": "memo", "prompt": "libur kantor tanggal 25"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["doc_type"], "memo");
        assert!(body["document"].as_str().unwrap().contains("Semua beres."));
        assert_eq!(body["provider"], "Groq AI");
    }

    #[tokio::test]
    async fn test_document_writer_requires_prompt() {
        let response = app()
            .oneshot(post_json("/api/v1/documents/generate", json!({"docType": "surat"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
