//! Generative-text API clients.
//!
//! This module sends one prompt to an external model and returns the raw
//! text it produced. The contract is the same for every backend: text in,
//! text out, or a [`NewsError`].
//!
//! # Architecture
//!
//! - [`TextGenerator`]: the async seam the pipeline depends on
//! - [`AnthropicClient`]: Anthropic Messages API
//! - [`GeminiClient`]: Google Gemini `generateContent`
//! - [`RetryGenerate`]: opt-in decorator adding exponential backoff
//!
//! A plain client makes exactly one outbound call per [`TextGenerator::generate`]
//! and never retries. [`build_generator`] only wraps it in [`RetryGenerate`]
//! when the configuration asks for retries.

use crate::config::{GenerationConfig, Provider};
use crate::error::{NewsError, Result};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use rand::{Rng, rng};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anything that can turn a prompt into model text.
#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    /// Send `prompt` and return the model's concatenated text output.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

fn ensure_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(NewsError::Config("prompt is empty".to_string()));
    }
    Ok(())
}

/// Send `body` as JSON, returning the decoded JSON envelope.
async fn post_json(request: reqwest::RequestBuilder, body: &Value) -> Result<Value> {
    let t0 = Instant::now();
    // Gemini carries the key in the query string; keep URLs out of error text.
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| NewsError::Transport(e.without_url()))?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| NewsError::Transport(e.without_url()))?;
    let dt = t0.elapsed();

    if !status.is_success() {
        warn!(
            status = status.as_u16(),
            elapsed_ms = dt.as_millis() as u64,
            body = %truncate_for_log(&text, 300),
            "Generation API returned an error status"
        );
        return Err(NewsError::Status {
            status: status.as_u16(),
            body: truncate_for_log(&text, 300),
        });
    }

    debug!(elapsed_ms = dt.as_millis() as u64, bytes = text.len(), "Generation API responded");
    serde_json::from_str(&text)
        .map_err(|e| NewsError::MalformedResponse(format!("response body is not JSON: {e}")))
}

/// Concatenate every text block of an Anthropic Messages response.
pub fn anthropic_text(envelope: &Value) -> Result<String> {
    let blocks = envelope
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| NewsError::MalformedResponse("missing `content` array".to_string()))?;
    Ok(blocks
        .iter()
        .map(|b| b.get("text").and_then(Value::as_str).unwrap_or(""))
        .collect())
}

/// Concatenate the text parts of the first Gemini candidate.
pub fn gemini_text(envelope: &Value) -> Result<String> {
    let parts = envelope
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            NewsError::MalformedResponse("missing `candidates[0].content.parts`".to_string())
        })?;
    Ok(parts
        .iter()
        .map(|p| p.get("text").and_then(Value::as_str).unwrap_or(""))
        .collect())
}

/// Client for the Anthropic Messages API.
#[derive(Debug)]
pub struct AnthropicClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl AnthropicClient {
    pub fn new(http: reqwest::Client, config: GenerationConfig) -> Self {
        Self { http, config }
    }

    /// Request body: model, output limit and one user message.
    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    #[instrument(level = "info", skip_all, fields(model = %self.config.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        ensure_prompt(prompt)?;
        let url = format!("{}/v1/messages", self.config.endpoint);
        let request = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);
        let envelope = post_json(request, &self.request_body(prompt)).await?;
        anthropic_text(&envelope)
    }
}

/// Client for Google Gemini `generateContent`.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: GenerationConfig) -> Self {
        Self { http, config }
    }

    /// Request body: one user message and the output limit.
    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "maxOutputTokens": self.config.max_tokens },
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.config.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        ensure_prompt(prompt)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint, self.config.model
        );
        let request = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())]);
        let envelope = post_json(request, &self.request_body(prompt)).await?;
        gemini_text(&envelope)
    }
}

fn jitter() -> StdDuration {
    StdDuration::from_millis(rng().random_range(0..=250))
}

/// Wrapper that adds exponential backoff retry logic to any [`TextGenerator`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryGenerate<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T: TextGenerator> RetryGenerate<T> {
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RetryGenerate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryGenerate")
            .field("inner", &self.inner)
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

#[async_trait]
impl<T: TextGenerator> TextGenerator for RetryGenerate<T> {
    #[instrument(level = "info", skip_all)]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "generate() exhausted retries"
                        );
                        return Err(e);
                    }

                    let shift = (attempt - 1).min(16) as u32;
                    let delay = self
                        .base_delay
                        .saturating_mul(1 << shift)
                        .min(self.max_delay);
                    let delay = delay + jitter();

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "generate() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Build the configured client, wrapped in [`RetryGenerate`] when `retries > 0`.
///
/// # Arguments
///
/// * `config` - Resolved provider, model, endpoint, key and retry count
///
/// # Returns
///
/// A shareable [`TextGenerator`]. With `retries == 0` this is the bare
/// provider client, which makes exactly one request per call.
///
/// # Errors
///
/// Returns [`NewsError::Transport`] if the HTTP client cannot be constructed.
///
/// # Examples
///
/// ```ignore
/// let config = GenerationConfig::resolve(&file, &args, Provider::Gemini, env)?;
/// let generator = build_generator(&config)?;
/// let text = generator.generate("Say hello").await?;
/// ```
pub fn build_generator(config: &GenerationConfig) -> Result<Arc<dyn TextGenerator>> {
    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let base: Arc<dyn TextGenerator> = match config.provider {
        Provider::Anthropic => Arc::new(AnthropicClient::new(http, config.clone())),
        Provider::Gemini => Arc::new(GeminiClient::new(http, config.clone())),
    };
    info!(provider = ?config.provider, model = %config.model, retries = config.retries, "Generation client ready");

    if config.retries > 0 {
        Ok(Arc::new(RetryGenerate::new(
            base,
            config.retries,
            StdDuration::from_secs(1),
        )))
    } else {
        Ok(base)
    }
}
