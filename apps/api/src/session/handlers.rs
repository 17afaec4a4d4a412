//! Axum route handlers for the Session API.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::workflow::{self, UploadOutcome};
use crate::session::{ChatTurn, Session};
use crate::simplifier::summarizer::Summary;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    /// Current text-box value; overrides the stored document when present.
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub session_id: Uuid,
    pub summary: Summary,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: Uuid,
    pub turn: ChatTurn,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let session = workflow::create_session(state.sessions.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(
        workflow::get_session(state.sessions.as_ref(), id).await?,
    ))
}

/// DELETE /api/v1/sessions/:id
///
/// "Clear All" — resets the session's document, summary, and chat history.
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(workflow::clear(state.sessions.as_ref(), id).await?))
}

/// PUT /api/v1/sessions/:id/document
pub async fn handle_set_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(
        workflow::set_document(state.sessions.as_ref(), id, req.text).await?,
    ))
}

/// POST /api/v1/sessions/:id/upload
///
/// Multipart upload with a single `file` field holding a PDF.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadOutcome>, AppError> {
    let bytes = read_pdf_field(&mut multipart).await?;
    let outcome = workflow::ingest_pdf(state.sessions.as_ref(), id, bytes).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/sessions/:id/summarize
///
/// The body is optional; an empty body summarizes the stored document.
pub async fn handle_summarize(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<SummarizeResponse>, AppError> {
    let req: SummarizeRequest = parse_optional_body(&body)?;
    let summary = workflow::summarize(
        state.sessions.as_ref(),
        state.generator.as_ref(),
        id,
        req.text,
        state.config.chunk_max_tokens,
    )
    .await?;
    Ok(Json(SummarizeResponse {
        session_id: id,
        summary,
    }))
}

/// POST /api/v1/sessions/:id/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let turn = workflow::ask(
        state.sessions.as_ref(),
        state.generator.as_ref(),
        id,
        &req.question,
        req.text,
    )
    .await?;
    Ok(Json(AskResponse {
        session_id: id,
        turn,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart helpers
// ────────────────────────────────────────────────────────────────────────────

/// Pulls the `file` field out of the form and checks it claims to be a PDF.
async fn read_pdf_field(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }

        if !is_pdf_upload(field.content_type(), field.file_name()) {
            return Err(AppError::Validation(
                "Only PDF uploads are supported".to_string(),
            ));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(bytes.to_vec());
    }

    Err(AppError::Validation(
        "Multipart body must include a 'file' field".to_string(),
    ))
}

/// Body-limit overruns are 413; every other multipart failure is the client's malformed form.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {err}"))
    } else {
        AppError::Validation(format!("Malformed multipart body: {err}"))
    }
}

/// An empty body means "no fields"; anything else must be valid JSON for `T`.
fn parse_optional_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))
}

fn is_pdf_upload(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let type_ok = content_type
        .map(|ct| ct.eq_ignore_ascii_case("application/pdf"))
        .unwrap_or(false);
    let name_ok = file_name
        .map(|n| n.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    type_ok || name_ok
}
