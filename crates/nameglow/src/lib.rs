//! Personalized daily insights generated from a person's name.
//!
//! `nameglow` turns a name into a small "daily insight" card: a letter
//! rearrangement of the name (the *anagram of the day*), a virtue matched to
//! it, a couple of affectionate nicknames, and a reflection prompt. Cards can
//! be rendered as HTML or plain text and appended to a per-user JSON history.
//!
//! Generation is deterministic by default. Virtues and nicknames can
//! optionally come from a language model on [OpenRouter](https://openrouter.ai/);
//! every model call is bounded by a timeout and falls back to the built-in
//! catalogs on any failure, so the pipeline never stalls or errors because of
//! the network.
//!
//! # Getting started
//!
//! ```ignore
//! use nameglow::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> nameglow::Result<()> {
//!     let composer = NameGlowConfig::default().with_seed(7).build_composer()?;
//!     let content = composer.compose("Alexander").await?;
//!     println!("{}", render_text(&content));
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Letter rearrangements:** [`NameMutator`](mutator::NameMutator).
//! - **Virtues:** [`VirtueMatcher`](virtue::VirtueMatcher) and the
//!   [`VirtueSource`](virtue::VirtueSource) capability trait.
//! - **Nicknames:** [`NicknameGenerator`](nickname::NicknameGenerator) and the
//!   [`NicknameSource`](nickname::NicknameSource) capability trait.
//! - **Assembling a card:** [`ContentComposer`](composer::ContentComposer).
//! - **Output and persistence:** [`render`] and
//!   [`HistoryStore`](history::HistoryStore).
//! - **Model calls:** [`OpenRouterClient`] and the
//!   [`TextGenerator`](llm::TextGenerator) trait in [`llm`].

pub mod catalog;
pub mod composer;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod mutator;
pub mod name;
pub mod nickname;
pub mod prelude;
pub mod render;
pub mod rng;
pub mod virtue;

pub use error::{NameGlowError, Result};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for virtue and nickname requests.
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_KEY";

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`.
///
/// Used to describe and validate the structured nickname answers a model
/// returns.
///
/// ```
/// use nameglow::json_schema_for;
/// use nameglow::nickname::Nickname;
///
/// let schema = json_schema_for::<Vec<Nickname>>();
/// assert_eq!(schema["type"], "array");
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body. Unused optional fields are omitted from
/// serialization.
#[derive(Serialize, Debug, Default)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "is_zero_f32")]
    pub temperature: f32,
    /// Sampling seed. Providers that honor it return repeatable answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}
fn is_zero_f32(v: &f32) -> bool {
    *v == 0.0
}

/// JSON output format type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ResponseFormatType {
    #[serde(rename = "json_object")]
    JsonObject,
}

/// JSON output mode.
#[derive(Serialize, Debug)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub fmt_type: ResponseFormatType,
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
        }
    }
}

/// A message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Clean return type from `OpenRouterClient::chat()`.
#[derive(Debug)]
pub struct ChatCompletion {
    pub content: Option<String>,
    /// `"length"` when the answer was cut off at `max_tokens`.
    pub finish_reason: Option<String>,
}

/// Token usage statistics, logged at debug level.
#[derive(Deserialize, Debug, Clone)]
struct UsageInfo {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the OpenRouter chat completions API.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key and default headers.
    pub fn new(api_key: impl Into<String>) -> std::result::Result<Self, String> {
        Self::with_headers(api_key, "https://github.com/nameglow/nameglow", "nameglow")
    }

    /// Create a new client with custom Referer and X-Title headers.
    pub fn with_headers(
        api_key: impl Into<String>,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> std::result::Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent("nameglow/0.1")
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            referer: referer.into(),
            title: title.into(),
        })
    }

    /// Send a chat completion request.
    pub async fn chat(&self, body: &ChatRequest) -> std::result::Result<ChatCompletion, String> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={}",
            body.model.as_deref().unwrap_or("(none)"),
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(format!("OpenRouter API HTTP {status}: {text}"));
        }

        parse_chat_response(&text)
    }
}

/// Parse a raw chat completion body into a [`ChatCompletion`].
fn parse_chat_response(text: &str) -> std::result::Result<ChatCompletion, String> {
    let parsed: RawChatResponse =
        serde_json::from_str(text).map_err(|e| format!("failed to parse response: {e}"))?;

    if let Some(err) = parsed.error {
        return Err(format!("OpenRouter API error: {}", err.message));
    }

    if let Some(ref usage) = parsed.usage {
        debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens.unwrap_or(0),
            usage.completion_tokens.unwrap_or(0),
            usage.total_tokens.unwrap_or(0),
        );
    }

    match parsed.choices.and_then(|c| c.into_iter().next()) {
        Some(c) => Ok(ChatCompletion {
            content: c.message.content,
            finish_reason: c.finish_reason,
        }),
        None => {
            debug!("LLM output: empty (no choices)");
            Ok(ChatCompletion {
                content: None,
                finish_reason: None,
            })
        }
    }
}
