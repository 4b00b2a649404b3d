//! Completion gateway over the OpenAI chat-completions API.
//!
//! One prompt in, one completion out — no streaming, no retries. The
//! calling request suspends until the round-trip completes or the 30s
//! client timeout fires. Every successful call emits a structured usage
//! log; that log is non-critical and can never fail the caller.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::tokens::{ApiUsage, UsageRecord};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Client-side request timeout (the upstream has no cancellation story,
/// so this bounds how long one assistant request can hang).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from a gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body.
        message: String,
        /// Provider-specific error code.
        code: Option<String>,
        /// Whether retrying could help (429 or 5xx).
        retryable: bool,
    },

    /// Credential missing or rejected.
    #[error("Auth error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },

    /// The model returned an empty completion.
    #[error("Empty completion from model")]
    Empty,
}

impl GatewayError {
    /// Whether the failure is plausibly transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { retryable, .. } => *retryable,
            Self::Auth { .. } | Self::Empty => false,
        }
    }
}

/// Parse an API error response body into (message, code, retryable).
fn parse_api_error(body: &str, status: u16) -> (String, Option<String>, bool) {
    let retryable = status == 429 || status >= 500;
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &json["error"];
        let message = error["message"]
            .as_str()
            .unwrap_or("Unknown error")
            .to_string();
        let code = error["type"].as_str().map(String::from);
        (message, code, retryable)
    } else {
        (format!("HTTP {status}: {body}"), None, retryable)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gateway trait
// ─────────────────────────────────────────────────────────────────────────────

/// Sampling options for one completion call.
#[derive(Clone, Copy, Debug)]
pub struct CompletionOptions {
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token budget.
    pub max_tokens: u32,
}

/// The seam between the assistant pipeline and the external model.
///
/// Production uses [`OpenAiGateway`]; tests substitute a stub.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send a prompt and return the raw completion text.
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, GatewayError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for [`OpenAiGateway`].
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// API credential; absence is a hard constructor failure, never a
    /// silent degradation.
    pub api_key: String,
    /// Model name, e.g. `gpt-4o-mini`.
    pub model: String,
    /// API base URL override (used by tests and proxies).
    pub base_url: Option<String>,
}

/// Chat-completions request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions response body (the fields we read).
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Gateway over the OpenAI chat-completions API.
pub struct OpenAiGateway {
    client: reqwest::Client,
    model: String,
    base_url: String,
    api_key: String,
}

impl OpenAiGateway {
    /// Create a new gateway.
    ///
    /// Fails with [`GatewayError::Auth`] when the credential is missing —
    /// callers check this at startup.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::Auth {
                message: "OPENAI_API_KEY is not set".into(),
            });
        }

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GatewayError::Http)?;

        info!(model = %config.model, base_url = %base_url, "gateway initialized");

        Ok(Self {
            client,
            model: config.model,
            base_url,
            api_key: config.api_key,
        })
    }

    /// The configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_headers(&self) -> Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", self.api_key);
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|e| GatewayError::Auth {
                message: format!("invalid authorization header: {e}"),
            })?,
        );
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Emit the structured usage log for one completed call.
    fn log_usage(&self, usage: Option<ApiUsage>, prompt: &str, completion: &str, started: Instant) {
        let record = UsageRecord::from_call(usage, prompt, completion);
        info!(
            model = %self.model,
            prompt_tokens = record.prompt_tokens,
            completion_tokens = record.completion_tokens,
            total_tokens = record.total(),
            exact = record.exact,
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "completion usage"
        );
    }
}

#[async_trait]
impl Gateway for OpenAiGateway {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, GatewayError> {
        let started = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!(
            model = %self.model,
            temperature = options.temperature,
            max_tokens = options.max_tokens,
            prompt_len = prompt.len(),
            "sending completion request"
        );

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await
            .map_err(GatewayError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (message, code, retryable) = parse_api_error(&body, status.as_u16());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
                code,
                retryable,
            });
        }

        let body: ChatResponse = response.json().await.map_err(GatewayError::Http)?;
        let text = body
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        if text.is_empty() {
            return Err(GatewayError::Empty);
        }

        self.log_usage(body.usage, prompt, &text, started);
        Ok(text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> GatewayConfig {
        GatewayConfig {
            api_key: "test-key".into(),
            model: "gpt-4o-mini".into(),
            base_url: Some(base_url.to_string()),
        }
    }

    const OPTIONS: CompletionOptions = CompletionOptions {
        temperature: 0.3,
        max_tokens: 200,
    };

    #[test]
    fn missing_api_key_is_hard_error() {
        let result = OpenAiGateway::new(GatewayConfig {
            api_key: "  ".into(),
            model: "gpt-4o-mini".into(),
            base_url: None,
        });
        assert!(matches!(result, Err(GatewayError::Auth { .. })));
    }

    #[test]
    fn default_base_url() {
        let gw = OpenAiGateway::new(GatewayConfig {
            api_key: "k".into(),
            model: "gpt-4o-mini".into(),
            base_url: None,
        })
        .unwrap();
        assert_eq!(gw.base_url, DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn complete_returns_trimmed_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(
                serde_json::json!({"model": "gpt-4o-mini", "temperature": 0.3}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "  hello there  "}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 3}
            })))
            .mount(&server)
            .await;

        let gw = OpenAiGateway::new(config(&server.uri())).unwrap();
        let text = gw.complete("hi", &OPTIONS).await.unwrap();
        assert_eq!(text, "hello there");
    }

    #[tokio::test]
    async fn empty_completion_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "   "}}]
            })))
            .mount(&server)
            .await;

        let gw = OpenAiGateway::new(config(&server.uri())).unwrap();
        let result = gw.complete("hi", &OPTIONS).await;
        assert!(matches!(result, Err(GatewayError::Empty)));
    }

    #[tokio::test]
    async fn no_choices_is_empty_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let gw = OpenAiGateway::new(config(&server.uri())).unwrap();
        assert!(matches!(
            gw.complete("hi", &OPTIONS).await,
            Err(GatewayError::Empty)
        ));
    }

    #[tokio::test]
    async fn api_error_body_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"type": "rate_limit", "message": "Too many requests"}
            })))
            .mount(&server)
            .await;

        let gw = OpenAiGateway::new(config(&server.uri())).unwrap();
        let err = gw.complete("hi", &OPTIONS).await.unwrap_err();
        let GatewayError::Api {
            status,
            message,
            code,
            retryable,
        } = err
        else {
            panic!("expected Api error");
        };
        assert_eq!(status, 429);
        assert_eq!(message, "Too many requests");
        assert_eq!(code.as_deref(), Some("rate_limit"));
        assert!(retryable);
    }

    #[tokio::test]
    async fn non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let gw = OpenAiGateway::new(config(&server.uri())).unwrap();
        let err = gw.complete("hi", &OPTIONS).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn parse_api_error_400_not_retryable() {
        let body = r#"{"error":{"type":"invalid_request","message":"Bad request"}}"#;
        let (msg, _, retryable) = parse_api_error(body, 400);
        assert_eq!(msg, "Bad request");
        assert!(!retryable);
    }

    #[test]
    fn parse_api_error_missing_fields() {
        let (msg, code, _) = parse_api_error(r#"{"error":{}}"#, 400);
        assert_eq!(msg, "Unknown error");
        assert!(code.is_none());
    }
}
