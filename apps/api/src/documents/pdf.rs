//! PDF text extraction.
//!
//! Wraps `pdf-extract`. Parsing is CPU-bound and the library may panic on
//! malformed input, so extraction runs on the blocking pool and a panic is
//! reported as an extraction failure.

use pdf_extract::extract_text_from_mem;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";
const PAGE_SEPARATOR: char = '\x0C';

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("Password-protected PDF")]
    PasswordProtected,

    #[error("{0}")]
    Extraction(String),
}

/// Text pulled from a PDF.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    /// Non-empty pages, each followed by a newline.
    pub text: String,
    /// Pages that carried any text.
    pub page_count: usize,
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Extracts text from PDF bytes on the blocking pool.
pub async fn extract_text_from_pdf(bytes: Vec<u8>) -> Result<ExtractedText, PdfError> {
    tokio::task::spawn_blocking(move || extract_text_sync(&bytes))
        .await
        .map_err(|e| {
            warn!("PDF extraction task failed: {e}");
            PdfError::Extraction("the PDF could not be parsed".to_string())
        })?
}

/// Synchronous extraction. Callers on the async runtime should use
/// [`extract_text_from_pdf`].
pub fn extract_text_sync(bytes: &[u8]) -> Result<ExtractedText, PdfError> {
    if !looks_like_pdf(bytes) {
        return Err(PdfError::InvalidPdf("missing %PDF header".to_string()));
    }

    let raw = extract_text_from_mem(bytes).map_err(classify_error)?;
    let extracted = join_pages(&raw);

    debug!(
        pages = extracted.page_count,
        chars = extracted.text.len(),
        "PDF text extracted"
    );

    Ok(extracted)
}

/// True when `bytes` starts with the PDF magic, ignoring leading whitespace.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PDF_MAGIC)
}

fn classify_error(e: pdf_extract::OutputError) -> PdfError {
    let message = e.to_string();
    let lower = message.to_lowercase();

    if lower.contains("encrypted") || lower.contains("password") {
        PdfError::PasswordProtected
    } else if lower.contains("invalid") || lower.contains("malformed") || lower.contains("corrupt")
    {
        PdfError::InvalidPdf(message)
    } else {
        PdfError::Extraction(message)
    }
}

/// Splits raw extractor output on form feeds, drops empty pages, and joins
/// the rest with a trailing newline per page.
fn join_pages(raw: &str) -> ExtractedText {
    let mut text = String::with_capacity(raw.len());
    let mut page_count = 0;

    for page in raw.split(PAGE_SEPARATOR) {
        let page = page.trim();
        if page.is_empty() {
            continue;
        }
        text.push_str(page);
        text.push('\n');
        page_count += 1;
    }

    ExtractedText { text, page_count }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Builds a one-page PDF showing `line` in Helvetica, or an empty page
    /// when `line` is `None`. Offsets in the xref table are computed, so the
    /// file parses without repair.
    pub(crate) fn one_page_pdf(line: Option<&str>) -> Vec<u8> {
        let content = match line {
            Some(text) => format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET"),
            None => String::new(),
        };
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_offset = pdf.len();
        let size = objects.len() + 1;
        pdf.extend_from_slice(format!("xref\n0 {size}\n").as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!("trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n")
                .as_bytes(),
        );
        pdf
    }
}
