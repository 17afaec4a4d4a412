//! Axum route handlers for the stateless rule engine.

use axum::{extract::Path, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::rules::analysis::{analyze_document, DocumentAnalysis};
use crate::rules::glossary::{lookup_term, LEGAL_TERMS};
use crate::rules::substitutions::{simplify_text, SimplifiedText};

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GlossaryEntry {
    pub term: &'static str,
    pub definition: &'static str,
}

/// POST /api/v1/analyze
pub async fn handle_analyze(
    Json(req): Json<TextRequest>,
) -> Result<Json<DocumentAnalysis>, AppError> {
    Ok(Json(analyze_document(&req.text)?))
}

/// POST /api/v1/simplify
pub async fn handle_simplify(
    Json(req): Json<TextRequest>,
) -> Result<Json<SimplifiedText>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    Ok(Json(simplify_text(&req.text)))
}

/// GET /api/v1/glossary
pub async fn handle_list_glossary() -> Json<Vec<GlossaryEntry>> {
    Json(
        LEGAL_TERMS
            .iter()
            .map(|&(term, definition)| GlossaryEntry { term, definition })
            .collect(),
    )
}

/// GET /api/v1/glossary/:term
pub async fn handle_lookup_term(Path(term): Path<String>) -> Result<Json<GlossaryEntry>, AppError> {
    let (term, definition) =
        lookup_term(&term).ok_or_else(|| AppError::NotFound(format!("Term '{term}' not found")))?;
    Ok(Json(GlossaryEntry { term, definition }))
}
