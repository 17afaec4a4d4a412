//! Session workflow — one operation per user interaction.
//!
//! Each operation loads the session, applies its change, and writes it back.
//! Operations that wait on the model or the PDF parser reload the session
//! afterwards and write only their own fields, so edits made in the meantime
//! survive.

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::documents::pdf::extract_text_from_pdf;
use crate::errors::AppError;
use crate::model_client::TextGenerator;
use crate::session::{ChatTurn, Session, SessionStore};
use crate::simplifier::qa::{generate_answer, select_context, validate_question};
use crate::simplifier::summarizer::{summarize_text, Summary};

#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub session_id: Uuid,
    pub page_count: usize,
    pub extracted_chars: usize,
    /// False when the PDF held no text; the previous document is kept.
    pub applied: bool,
}

pub async fn create_session(store: &dyn SessionStore) -> Result<Session, AppError> {
    let session = Session::new();
    store.put(&session).await?;
    info!("Created session {}", session.id);
    Ok(session)
}

pub async fn get_session(store: &dyn SessionStore, id: Uuid) -> Result<Session, AppError> {
    Ok(store.require(id).await?)
}

/// Replaces the document text (a text-box edit).
pub async fn set_document(
    store: &dyn SessionStore,
    id: Uuid,
    text: String,
) -> Result<Session, AppError> {
    let mut session = store.require(id).await?;
    session.document_text = text;
    session.touch();
    store.put(&session).await?;
    Ok(session)
}

/// Extracts text from an uploaded PDF and makes it the session document.
pub async fn ingest_pdf(
    store: &dyn SessionStore,
    id: Uuid,
    bytes: Vec<u8>,
) -> Result<UploadOutcome, AppError> {
    // Fail fast on unknown sessions before spending time in the parser.
    let _ = store.require(id).await?;

    let extracted = extract_text_from_pdf(bytes).await?;
    let applied = !extracted.is_empty();

    if applied {
        // Reload: the parse may have taken a while.
        let mut session = store.require(id).await?;
        session.document_text = extracted.text.clone();
        session.touch();
        store.put(&session).await?;
        info!(
            "Session {id}: PDF text extracted ({} pages, {} chars)",
            extracted.page_count,
            extracted.text.len()
        );
    } else {
        info!("Session {id}: PDF contained no extractable text");
    }

    Ok(UploadOutcome {
        session_id: id,
        page_count: extracted.page_count,
        extracted_chars: extracted.text.chars().count(),
        applied,
    })
}

/// Summarizes the session document and stores the result.
///
/// `text_override` is the current text-box value; when given it becomes the
/// session document before summarizing. The summary is stored only if the
/// document it was built from is still the session document once the model
/// answers; otherwise it is returned without being stored.
pub async fn summarize(
    store: &dyn SessionStore,
    generator: &dyn TextGenerator,
    id: Uuid,
    text_override: Option<String>,
    max_tokens: usize,
) -> Result<Summary, AppError> {
    let session = apply_override(store, id, text_override).await?;
    let document = session.document_text;

    let summary = summarize_text(generator, &document, max_tokens).await?;

    // Reload: model calls take seconds and the session may have moved on.
    let mut session = store.require(id).await?;
    if session.document_text == document {
        session.summary = summary.text.clone();
        session.touch();
        store.put(&session).await?;
    } else {
        info!("Session {id}: document changed during summarization; summary not stored");
    }
    Ok(summary)
}

/// Answers a question about the session document and appends it to the transcript.
///
/// The turn is appended only while the context it was answered from is still
/// in the session, so a "Clear All" or document edit made while the model is
/// busy is never undone.
pub async fn ask(
    store: &dyn SessionStore,
    generator: &dyn TextGenerator,
    id: Uuid,
    question: &str,
    text_override: Option<String>,
) -> Result<ChatTurn, AppError> {
    let session = apply_override(store, id, text_override).await?;

    validate_question(question, &session.summary, &session.document_text)?;
    let context = select_context(&session.summary, &session.document_text);
    let used_summary = !session.summary.trim().is_empty();
    let answer = generate_answer(generator, question, context).await?;

    let turn = ChatTurn {
        question: question.to_string(),
        answer,
        asked_at: Utc::now(),
    };

    let mut fresh = store.require(id).await?;
    let still_current = fresh.document_text == session.document_text
        && !(used_summary && fresh.summary.trim().is_empty());
    if still_current {
        fresh.chat_history.push(turn.clone());
        fresh.touch();
        store.put(&fresh).await?;
    } else {
        info!("Session {id}: context changed while answering; turn not recorded");
    }
    Ok(turn)
}

/// Writes a text-box value back as the document before a model call.
async fn apply_override(
    store: &dyn SessionStore,
    id: Uuid,
    text_override: Option<String>,
) -> Result<Session, AppError> {
    let mut session = store.require(id).await?;
    if let Some(text) = text_override {
        if text != session.document_text {
            session.document_text = text;
            session.touch();
            store.put(&session).await?;
        }
    }
    Ok(session)
}

/// "Clear All": wipes document, summary, and transcript.
pub async fn clear(store: &dyn SessionStore, id: Uuid) -> Result<Session, AppError> {
    let mut session = store.require(id).await?;
    session.clear();
    store.put(&session).await?;
    info!("Cleared session {id}");
    Ok(session)
}
