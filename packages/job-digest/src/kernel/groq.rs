//! Groq chat-completions client for batched job summarization.
//!
//! All fetched descriptions go out in one request rather than one per
//! posting: the API quota is the scarce resource, not latency.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::traits::BaseSummarizer;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Retry budget for rate-limited requests
const RATE_LIMIT_ATTEMPTS: u32 = 3;
const RATE_LIMIT_PAUSE: Duration = Duration::from_secs(5);

const EXTRACTION_PROMPT: &str = "Extract clearly in bullet points, per job:\n\
    \n\
    - Company Name\n\
    - Job Title\n\
    - Required Skills\n\
    - Experience\n\
    - Location\n\
    - Salary (if mentioned)\n";

#[derive(Debug, Error)]
pub enum GroqError {
    #[error("rate limited by Groq API")]
    RateLimited,
    #[error("Groq API error {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("Groq request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Groq response held no choices")]
    EmptyResponse,
}

/// Groq API request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Groq API response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Groq implementation of the summarizer seam
pub struct GroqClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GroqClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            model,
            client,
        })
    }

    async fn request_completion(&self, prompt: String) -> Result<String, GroqError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GroqError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GroqError::Api { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GroqError::EmptyResponse)
    }
}

#[async_trait]
impl BaseSummarizer for GroqClient {
    async fn summarize(&self, batch: &str) -> Result<String> {
        let prompt = format!("{EXTRACTION_PROMPT}\n{batch}");
        info!(
            model = %self.model,
            batch_length = batch.len(),
            "Calling Groq API"
        );

        let content = with_rate_limit_retry(RATE_LIMIT_PAUSE, || {
            self.request_completion(prompt.clone())
        })
        .await?;

        info!(response_length = content.len(), "Groq response received");
        Ok(content)
    }
}

/// Run `call`, retrying only rate-limited failures, up to
/// `RATE_LIMIT_ATTEMPTS` attempts with `pause` between them. Exhausting the
/// budget reports abandonment; any other error is returned on first sight.
async fn with_rate_limit_retry<F, Fut>(pause: Duration, mut call: F) -> Result<String>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<String, GroqError>>,
{
    for attempt in 1..=RATE_LIMIT_ATTEMPTS {
        match call().await {
            Ok(content) => return Ok(content),
            Err(GroqError::RateLimited) if attempt < RATE_LIMIT_ATTEMPTS => {
                warn!(
                    attempt = attempt,
                    pause_secs = pause.as_secs(),
                    "Rate limited, pausing before retry"
                );
                tokio::time::sleep(pause).await;
            }
            Err(GroqError::RateLimited) => break,
            Err(e) => return Err(e).context("Summarization request failed"),
        }
    }

    Err(GroqError::RateLimited).context("Summarization abandoned after repeated rate limits")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn chat_request_serializes_to_expected_shape() {
        let request = ChatRequest {
            model: "llama-3.1-8b-instant".to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: "hello".to_string(),
            }],
            temperature: 0.2,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn chat_response_content_path_is_choices_0_message_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"- Company: Acme"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "- Company: Acme");
    }

    #[tokio::test]
    async fn rate_limit_exhaustion_reports_abandonment() {
        let calls = AtomicU32::new(0);

        let result = with_rate_limit_retry(Duration::ZERO, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<String, _>(GroqError::RateLimited) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), RATE_LIMIT_ATTEMPTS);
        let rendered = format!("{:#}", result.unwrap_err());
        assert!(rendered.contains("abandoned after repeated rate limits"));
    }

    #[tokio::test]
    async fn non_rate_limit_error_is_not_retried() {
        let calls = AtomicU32::new(0);

        let result = with_rate_limit_retry(Duration::ZERO, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<String, _>(GroqError::EmptyResponse) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let rendered = format!("{:#}", result.unwrap_err());
        assert!(rendered.contains("Summarization request failed"));
    }

    #[tokio::test]
    async fn rate_limited_call_succeeds_on_retry() {
        let calls = AtomicU32::new(0);

        let content = with_rate_limit_retry(Duration::ZERO, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(GroqError::RateLimited)
                } else {
                    Ok("- Company Name: Acme".to_string())
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(content, "- Company Name: Acme");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[ignore] // Requires API key
    async fn summarize_live() {
        let api_key = std::env::var("GROQ_API_KEY")
            .expect("GROQ_API_KEY must be set for integration tests");

        let client =
            GroqClient::new(api_key, "llama-3.1-8b-instant".to_string()).unwrap();
        let summary = client
            .summarize("JOB: Test Engineer (posted 01/01/2025)\nAcme hires a test engineer.")
            .await
            .expect("summarization should succeed");

        assert!(!summary.is_empty());
    }
}
