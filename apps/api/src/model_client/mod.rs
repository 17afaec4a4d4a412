/// Model Client — the single point of entry for all seq2seq model inference in Sudarshan.
///
/// ARCHITECTURAL RULE: No other module may call the inference endpoint directly.
/// Everything goes through the `TextGenerator` seam defined here.
///
/// Wire format: Hugging Face inference API, text2text / summarization pipelines.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_MODEL_API_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODEL_ID: &str = "t5-small";
/// Rough characters-per-token ratio used wherever we cannot run the tokenizer.
pub const CHARS_PER_TOKEN: usize = 4;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Model returned empty output")]
    EmptyOutput,
}

/// Decoding hyperparameters for one `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_penalty: Option<f32>,
    pub num_beams: u32,
    pub early_stopping: bool,
    /// Input budget in tokens; longer inputs are cut before sending.
    #[serde(skip)]
    pub truncate_tokens: usize,
}

impl GenerationParams {
    /// Fixed settings for per-chunk summarization.
    pub fn summary() -> Self {
        Self {
            max_length: 150,
            min_length: Some(30),
            length_penalty: Some(2.0),
            num_beams: 4,
            early_stopping: true,
            truncate_tokens: 512,
        }
    }

    /// Fixed settings for question answering.
    pub fn answer() -> Self {
        Self {
            max_length: 100,
            min_length: None,
            length_penalty: None,
            num_beams: 4,
            early_stopping: true,
            truncate_tokens: 512,
        }
    }
}

/// Text-in/text-out inference. Implement this to swap model backends without
/// touching the summarizer, Q&A, or handler code.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, input: &str, params: &GenerationParams) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// One element of the pipeline output array. Text2text pipelines fill
/// `generated_text`, summarization pipelines fill `summary_text`.
#[derive(Debug, Deserialize)]
struct GeneratedOutput {
    generated_text: Option<String>,
    summary_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InferenceErrorBody {
    error: String,
}

/// HTTP inference client with retry logic.
#[derive(Clone)]
pub struct ModelClient {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl ModelClient {
    pub fn new(endpoint: String, api_token: Option<String>) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Makes a raw inference call.
    /// Retries on 429 (rate limit, also used while the model loads), 5xx and
    /// transport errors with exponential backoff.
    async fn call(&self, input: &str, params: &GenerationParams) -> Result<String, ModelError> {
        let inputs = truncate_to_tokens(input, params.truncate_tokens);
        let request_body = InferenceRequest {
            inputs,
            parameters: params,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut last_error: Option<ModelError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Model call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&request_body);
            if let Some(token) = &self.api_token {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ModelError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Model API returned {}: {}", status, body);
                last_error = Some(ModelError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<InferenceErrorBody>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(ModelError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let text = parse_generated_text(&body)?;

            debug!(
                input_chars = inputs.len(),
                output_chars = text.len(),
                "Model call succeeded"
            );

            return Ok(text);
        }

        Err(last_error.unwrap_or(ModelError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextGenerator for ModelClient {
    async fn generate(&self, input: &str, params: &GenerationParams) -> Result<String, ModelError> {
        self.call(input, params).await
    }
}

/// Pulls the first generated sequence out of a pipeline response body,
/// skipping special tokens the server may leave in.
fn parse_generated_text(body: &str) -> Result<String, ModelError> {
    let outputs: Vec<GeneratedOutput> = serde_json::from_str(body)?;
    let raw = outputs
        .into_iter()
        .next()
        .and_then(|o| o.generated_text.or(o.summary_text))
        .ok_or(ModelError::EmptyOutput)?;

    let cleaned = strip_special_tokens(&raw);
    if cleaned.is_empty() {
        return Err(ModelError::EmptyOutput);
    }
    Ok(cleaned)
}

/// Removes T5 sentinel tokens (`<pad>`, `</s>`, `<unk>`) and trims.
fn strip_special_tokens(text: &str) -> String {
    text.replace("<pad>", "")
        .replace("</s>", "")
        .replace("<unk>", "")
        .trim()
        .to_string()
}

/// Cuts `text` to roughly `max_tokens` tokens, always on a char boundary.
pub fn truncate_to_tokens(text: &str, max_tokens: usize) -> &str {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
