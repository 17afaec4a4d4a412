//! Summarizer — chunk → "summarize:" prompt → model, then stitch the pieces.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::model_client::prompts::build_summarize_prompt;
use crate::model_client::{GenerationParams, TextGenerator};
use crate::simplifier::chunking::chunk_text;

pub const EMPTY_DOCUMENT_MESSAGE: &str = "Please provide some text to summarize.";

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Per-chunk summaries joined with a single space.
    pub text: String,
    pub chunk_count: usize,
}

/// Summarizes `text` chunk by chunk, in document order.
pub async fn summarize_text(
    generator: &dyn TextGenerator,
    text: &str,
    max_tokens: usize,
) -> Result<Summary, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_DOCUMENT_MESSAGE.to_string()));
    }

    let chunks = chunk_text(text, max_tokens);
    info!("Summarizing document in {} chunk(s)", chunks.len());

    let params = GenerationParams::summary();
    let mut summaries = Vec::with_capacity(chunks.len());

    for (i, chunk) in chunks.iter().enumerate() {
        let prompt = build_summarize_prompt(chunk);
        let summary = generator.generate(&prompt, &params).await?;
        debug!(chunk = i, chars = summary.len(), "Chunk summarized");
        summaries.push(summary);
    }

    Ok(Summary {
        text: summaries.join(" "),
        chunk_count: chunks.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_client::ModelError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every prompt and answers with a numbered summary.
    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(
            &self,
            input: &str,
            params: &GenerationParams,
        ) -> Result<String, ModelError> {
            assert_eq!(params, &GenerationParams::summary());
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(input.to_string());
            Ok(format!("summary {}", prompts.len()))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _: &str, _: &GenerationParams) -> Result<String, ModelError> {
            Err(ModelError::EmptyOutput)
        }
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_without_model_call() {
        let gen = RecordingGenerator::default();
        let err = summarize_text(&gen, "  \n ", 450).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == EMPTY_DOCUMENT_MESSAGE));
        assert!(gen.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_chunk_summary() {
        let gen = RecordingGenerator::default();
        let summary = summarize_text(&gen, "The lessee shall pay rent.", 450)
            .await
            .unwrap();
        assert_eq!(summary.text, "summary 1");
        assert_eq!(summary.chunk_count, 1);
        assert_eq!(
            gen.prompts.lock().unwrap()[0],
            "summarize: The lessee shall pay rent."
        );
    }

    #[tokio::test]
    async fn test_multi_chunk_summaries_joined_in_order() {
        let gen = RecordingGenerator::default();
        // width 8: "aaaa bbb" | "cccc ddd"
        let summary = summarize_text(&gen, "aaaa bbb cccc ddd", 2).await.unwrap();
        assert_eq!(summary.chunk_count, 2);
        assert_eq!(summary.text, "summary 1 summary 2");
        let prompts = gen.prompts.lock().unwrap();
        assert_eq!(prompts[0], "summarize: aaaa bbb");
        assert_eq!(prompts[1], "summarize: cccc ddd");
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let err = summarize_text(&FailingGenerator, "some text", 450)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Model(ModelError::EmptyOutput)));
    }
}
