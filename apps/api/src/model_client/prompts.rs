// Task prefixes for the T5 family. The model picks its task from the
// leading prefix, so these strings are part of the inference contract.

/// Summarization prompt template. Replace `{chunk}` before sending.
pub const SUMMARIZE_PROMPT_TEMPLATE: &str = "summarize: {chunk}";

/// Question answering prompt template. Replace `{question}` and `{context}`.
pub const QUESTION_PROMPT_TEMPLATE: &str = "question: {question} context: {context}";

pub fn build_summarize_prompt(chunk: &str) -> String {
    SUMMARIZE_PROMPT_TEMPLATE.replace("{chunk}", chunk)
}

pub fn build_question_prompt(question: &str, context: &str) -> String {
    // The template's own `{question}` precedes the context, so a context
    // containing that placeholder text is left alone.
    QUESTION_PROMPT_TEMPLATE
        .replacen("{context}", context, 1)
        .replacen("{question}", question, 1)
}
