use std::time::Duration;

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("request to Google AI failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Google AI rejected the request ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("Google AI returned an unusable response: {0}")]
    InvalidResponse(String),
    #[error("Google AI still failing after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

/// Backoff schedule for transient embedding failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following failed attempt `attempt` (0-based):
    /// exponential growth capped at `max_delay`, plus up to 25% jitter.
    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1u32 << attempt.min(10));
        let capped = exp.min(self.max_delay);
        let jitter_ms = rand::rng().random_range(0..=capped.as_millis() as u64 / 4);
        capped.saturating_add(Duration::from_millis(jitter_ms))
    }
}

/// Client for the Google Generative Language API, covering both the
/// embedding and the text-generation endpoints.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
    generation_model: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            embedding_model: crate::core::config::DEFAULT_EMBEDDING_MODEL.to_string(),
            generation_model: crate::core::config::DEFAULT_GENERATION_MODEL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = model.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Embeds text for storage, with the document-retrieval task hint.
    /// Transient failures are retried under the client's `RetryPolicy`.
    pub async fn embed_document(&self, text: &str) -> Result<Vec<f32>, GenAiError> {
        self.embed(text, Some("RETRIEVAL_DOCUMENT")).await
    }

    /// Embeds a user question for search. No task hint, no retries beyond
    /// the shared policy.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, GenAiError> {
        self.embed(text, None).await
    }

    async fn embed(&self, text: &str, task_type: Option<&str>) -> Result<Vec<f32>, GenAiError> {
        let url = format!(
            "{}/models/{}:embedContent",
            self.base_url, self.embedding_model
        );
        let mut body = json!({
            "model": format!("models/{}", self.embedding_model),
            "content": { "parts": [ { "text": text } ] },
        });
        if let Some(task) = task_type {
            if let Some(obj) = body.as_object_mut() {
                obj.insert("taskType".to_string(), json!(task));
            }
        }

        let payload: EmbedContentResponse = self.post_with_retry(&url, &body).await?;
        if payload.embedding.values.is_empty() {
            return Err(GenAiError::InvalidResponse(
                "embedding values were empty".to_string(),
            ));
        }
        Ok(payload.embedding.values)
    }

    /// Runs one generation call and returns the first candidate's text, or
    /// `None` when the response carried no usable candidate. Generation is
    /// never retried; callers decide how to degrade.
    pub async fn generate(&self, prompt: &str) -> Result<Option<String>, GenAiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.generation_model
        );
        let body = json!({
            "contents": [ { "parts": [ { "text": prompt } ] } ],
        });

        let res = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let payload: GenerateContentResponse = Self::decode(res).await?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text);

        Ok(text.filter(|text| !text.trim().is_empty()))
    }

    async fn post_with_retry<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, GenAiError> {
        let mut last = String::new();
        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay_for(attempt - 1);
                tracing::warn!(
                    "retrying Google AI call in {:?} (attempt {}/{}): {}",
                    delay,
                    attempt + 1,
                    self.retry.max_attempts,
                    last
                );
                tokio::time::sleep(delay).await;
            }

            let sent = self
                .client
                .post(url)
                .query(&[("key", self.api_key.as_str())])
                .json(body)
                .send()
                .await;

            match sent {
                Ok(res) => match Self::decode::<T>(res).await {
                    Ok(payload) => return Ok(payload),
                    Err(GenAiError::Api { status, message }) if is_transient(status) => {
                        last = format!("{}: {}", status, message);
                    }
                    Err(other) => return Err(other),
                },
                Err(err) => {
                    last = err.to_string();
                }
            }
        }
        Err(GenAiError::RetriesExhausted {
            attempts: self.retry.max_attempts,
            last,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        res: reqwest::Response,
    ) -> Result<T, GenAiError> {
        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(GenAiError::Api { status, message });
        }
        res.json::<T>()
            .await
            .map_err(|err| GenAiError::InvalidResponse(err.to_string()))
    }
}

fn is_transient(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
