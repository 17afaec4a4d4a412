pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::rules::handlers as rules;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session API: model-backed summarization and Q&A
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_clear_session),
        )
        .route(
            "/api/v1/sessions/:id/document",
            put(sessions::handle_set_document),
        )
        .route("/api/v1/sessions/:id/upload", post(sessions::handle_upload))
        .route(
            "/api/v1/sessions/:id/summarize",
            post(sessions::handle_summarize),
        )
        .route("/api/v1/sessions/:id/ask", post(sessions::handle_ask))
        // Rule engine API: stateless
        .route("/api/v1/analyze", post(rules::handle_analyze))
        .route("/api/v1/simplify", post(rules::handle_simplify))
        .route("/api/v1/glossary", get(rules::handle_list_glossary))
        .route("/api/v1/glossary/:term", get(rules::handle_lookup_term))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::documents::pdf::fixtures::one_page_pdf;
    use crate::model_client::{GenerationParams, ModelError, TextGenerator};
    use crate::session::InMemorySessionStore;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(
            &self,
            input: &str,
            _params: &GenerationParams,
        ) -> Result<String, ModelError> {
            Ok(format!("<{}>", input.len()))
        }
    }

    fn test_router() -> Router {
        router_with_upload_limit(1024 * 1024)
    }

    fn router_with_upload_limit(max_upload_bytes: usize) -> Router {
        let config = Config {
            port: 0,
            rust_log: "info".to_string(),
            model_api_url: "http://localhost".to_string(),
            model_id: "t5-small".to_string(),
            model_api_token: None,
            redis_url: None,
            session_ttl_secs: 3600,
            chunk_max_tokens: 450,
            max_upload_bytes,
        };
        build_router(AppState {
            generator: Arc::new(EchoGenerator),
            sessions: Arc::new(InMemorySessionStore::new(3600)),
            config,
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(json) => {
                send_raw(app, method, uri, "application/json", json.to_string().into_bytes()).await
            }
            None => send_raw(app, method, uri, "", Vec::new()).await,
        }
    }

    async fn send_raw(
        app: &Router,
        method: &str,
        uri: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if !content_type.is_empty() {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    const BOUNDARY: &str = "sudarshan-test-boundary";

    fn multipart_file(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn upload(app: &Router, id: &str, body: Vec<u8>) -> (StatusCode, Value) {
        send_raw(
            app,
            "POST",
            &format!("/api/v1/sessions/{id}/upload"),
            &format!("multipart/form-data; boundary={BOUNDARY}"),
            body,
        )
        .await
    }

    async fn new_session(app: &Router) -> String {
        let (_, created) = send(app, "POST", "/api/v1/sessions", None).await;
        created["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_router();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let app = test_router();
        let (status, created) = send(&app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/document"),
            Some(json!({ "text": "Rent is due monthly." })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, summary) =
            send(&app, "POST", &format!("/api/v1/sessions/{id}/summarize"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["summary"]["chunk_count"], 1);

        let (status, answer) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/ask"),
            Some(json!({ "question": "When is rent due?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(answer["turn"]["question"], "When is rent due?");

        let (status, cleared) = send(&app, "DELETE", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cleared["document_text"], "");
        assert_eq!(cleared["chat_history"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = test_router();
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_summarize_empty_document_is_400() {
        let app = test_router();
        let (_, created) = send(&app, "POST", "/api/v1/sessions", None).await;
        let id = created["id"].as_str().unwrap().to_string();
        let (status, body) =
            send(&app, "POST", &format!("/api/v1/sessions/{id}/summarize"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_glossary_lookup() {
        let app = test_router();
        let (status, body) = send(&app, "GET", "/api/v1/glossary/Breach", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["term"], "breach");

        let (status, _) = send(&app, "GET", "/api/v1/glossary/pizza", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_simplify_endpoint() {
        let app = test_router();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/simplify",
            Some(json!({ "text": "Tenant shall pay prior to move-in." })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Tenant must pay before move-in.");
    }

    #[tokio::test]
    async fn test_upload_pdf_replaces_document() {
        let app = test_router();
        let id = new_session(&app).await;
        let pdf = one_page_pdf(Some("The Tenant shall pay rent."));

        let (status, body) = upload(&app, &id, multipart_file("lease.pdf", "application/pdf", &pdf)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], true);
        assert_eq!(body["page_count"], 1);

        let (_, session) = send(&app, "GET", &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(session["document_text"], "The Tenant shall pay rent.\n");
    }

    #[tokio::test]
    async fn test_upload_non_pdf_is_400() {
        let app = test_router();
        let id = new_session(&app).await;
        let (status, body) =
            upload(&app, &id, multipart_file("notes.txt", "text/plain", b"just notes")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_413() {
        let app = router_with_upload_limit(256);
        let id = new_session(&app).await;
        let pdf = one_page_pdf(Some(&"x".repeat(1024)));
        let (status, body) = upload(&app, &id, multipart_file("big.pdf", "application/pdf", &pdf)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_truncated_multipart_is_400() {
        let app = test_router();
        let id = new_session(&app).await;
        let truncated = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"lease.pdf\"\r\nContent-Type: application/pdf\r\n\r\n%PDF-1.4 cut off"
        );
        let (status, body) = upload(&app, &id, truncated.into_bytes()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_summarize_rejects_malformed_body() {
        let app = test_router();
        let id = new_session(&app).await;
        send(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{id}/document"),
            Some(json!({ "text": "Stored lease." })),
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{id}/summarize"),
            Some(json!({ "text": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
