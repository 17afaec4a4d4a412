// Model-backed simplification: chunked summarization and document Q&A.
// All model calls go through model_client — no direct HTTP calls here.

pub mod chunking;
pub mod qa;
pub mod summarizer;
