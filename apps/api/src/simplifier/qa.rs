//! Document Q&A — one model call per question, grounded in either the
//! generated summary or the raw document.

use tracing::info;

use crate::errors::AppError;
use crate::model_client::prompts::build_question_prompt;
use crate::model_client::{GenerationParams, TextGenerator};

pub const MISSING_INPUT_MESSAGE: &str = "Please upload or paste a document and enter a question.";

/// Picks the context for a question: the summary when there is one,
/// otherwise the document text.
pub fn select_context<'a>(summary: &'a str, document: &'a str) -> &'a str {
    if summary.trim().is_empty() {
        document
    } else {
        summary
    }
}

/// Rejects blank questions and questions with nothing to answer from.
pub fn validate_question(question: &str, summary: &str, document: &str) -> Result<(), AppError> {
    if question.trim().is_empty() || (summary.trim().is_empty() && document.trim().is_empty()) {
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    }
    Ok(())
}

/// Asks the model `question` against `context`.
pub async fn generate_answer(
    generator: &dyn TextGenerator,
    question: &str,
    context: &str,
) -> Result<String, AppError> {
    let prompt = build_question_prompt(question.trim(), context);
    info!(
        question_chars = question.len(),
        context_chars = context.len(),
        "Generating answer"
    );
    let answer = generator
        .generate(&prompt, &GenerationParams::answer())
        .await?;
    Ok(answer)
}
