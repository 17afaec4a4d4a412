//! Document analysis — runs the whole rule engine over one text.

use serde::Serialize;

use crate::errors::AppError;
use crate::rules::classify::{classify_document, ClassifiedSentence, SentenceCategory, Severity};
use crate::rules::glossary::{extract_terms, TermMatch};
use crate::rules::substitutions::{simplify_text, SimplifiedText};

pub const EMPTY_ANALYSIS_MESSAGE: &str = "Please provide some text to analyze.";

#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub word_count: usize,
    pub sentence_count: usize,
    pub terms: Vec<TermMatch>,
    pub simplified: SimplifiedText,
    pub risks: Vec<ClassifiedSentence>,
    pub obligations: Vec<ClassifiedSentence>,
    pub rights: Vec<ClassifiedSentence>,
    /// Highest severity among risk sentences, if any.
    pub risk_level: Option<Severity>,
}

pub fn analyze_document(text: &str) -> Result<DocumentAnalysis, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_ANALYSIS_MESSAGE.to_string()));
    }

    let sentences = classify_document(text);
    let sentence_count = sentences.len();

    let mut risks = Vec::new();
    let mut obligations = Vec::new();
    let mut rights = Vec::new();
    for sentence in sentences {
        match sentence.classification.category {
            SentenceCategory::Risk => risks.push(sentence),
            SentenceCategory::Obligation => obligations.push(sentence),
            SentenceCategory::Right => rights.push(sentence),
            SentenceCategory::Neutral => {}
        }
    }

    let risk_level = risks
        .iter()
        .filter_map(|s| s.classification.severity)
        .max();

    Ok(DocumentAnalysis {
        word_count: text.split_whitespace().count(),
        sentence_count,
        terms: extract_terms(text),
        simplified: simplify_text(text),
        risks,
        obligations,
        rights,
        risk_level,
    })
}
