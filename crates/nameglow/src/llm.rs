//! Text generation behind a dyn-compatible trait.
//!
//! [`TextGenerator`] is the seam between the service-backed virtue and
//! nickname sources and the network. [`LlmTextGenerator`] implements it on
//! top of [`OpenRouterClient`]; tests substitute in-process fakes.
//!
//! Errors are plain strings, as with [`OpenRouterClient::chat`]: callers never
//! propagate them, they log and fall back.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{ChatRequest, Message, OpenRouterClient, ResponseFormat, ResponseFormatType};

/// Boxed future returned by [`TextGenerator::complete`].
pub type TextFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// One prompt for a text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    /// Ask the service for a JSON object response.
    pub json_output: bool,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
            json_output: false,
        }
    }

    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// A service that turns a prompt into text.
///
/// Uses a boxed future so that the trait stays dyn-compatible and can be
/// shared as `Arc<dyn TextGenerator>`.
pub trait TextGenerator: Send + Sync {
    fn complete(&self, prompt: Prompt) -> TextFuture<'_>;
}

/// [`TextGenerator`] backed by an OpenRouter model.
pub struct LlmTextGenerator {
    client: OpenRouterClient,
    model: String,
    temperature: f32,
    seed: Option<u64>,
}

impl LlmTextGenerator {
    pub fn new(client: OpenRouterClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: 0.7,
            seed: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Forward a sampling seed with every request.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn request_for(&self, prompt: Prompt) -> ChatRequest {
        ChatRequest {
            model: Some(self.model.clone()),
            messages: vec![Message::system(prompt.system), Message::user(prompt.user)],
            max_tokens: prompt.max_tokens,
            temperature: self.temperature,
            seed: self.seed,
            response_format: prompt.json_output.then_some(ResponseFormat {
                fmt_type: ResponseFormatType::JsonObject,
            }),
        }
    }
}

impl TextGenerator for LlmTextGenerator {
    fn complete(&self, prompt: Prompt) -> TextFuture<'_> {
        Box::pin(async move {
            let body = self.request_for(prompt);
            let completion = self.client.chat(&body).await?;
            if completion.finish_reason.as_deref() == Some("length") {
                warn!("LLM answer was cut off at max_tokens={}", body.max_tokens);
            }
            completion
                .content
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| "Empty LLM response".to_string())
        })
    }
}

/// Await `fut`, turning an elapsed `limit` into an error.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, String>
where
    F: Future<Output = Result<T, String>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            debug!("Text generation timed out after {:?}", limit);
            Err(format!("timed out after {:.1}s", limit.as_secs_f64()))
        }
    }
}

/// Quotes, Markdown emphasis, and punctuation stripped from answer edges.
const DECORATION: [char; 10] = ['"', '\'', '*', '`', '_', '.', '!', ',', ';', ':'];

/// Longest answer, in words, that [`clean_single_word`] accepts. Two words
/// admits compound virtues like "Inner Peace".
pub const MAX_ANSWER_WORDS: usize = 2;

/// Reduce a model answer to a single word or short compound.
///
/// Takes the first non-empty line and strips quotes, Markdown emphasis, and
/// trailing punctuation. `None` if nothing is left or if the line is a
/// sentence longer than [`MAX_ANSWER_WORDS`] words.
pub fn clean_single_word(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let cleaned = line.trim_matches(|c: char| c.is_whitespace() || DECORATION.contains(&c));
    let words = cleaned.split_whitespace().count();
    if words == 0 || words > MAX_ANSWER_WORDS {
        return None;
    }
    Some(cleaned.to_string())
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow;

    impl TextGenerator for Slow {
        fn complete(&self, _prompt: Prompt) -> TextFuture<'_> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("too late".to_string())
            })
        }
    }

    #[tokio::test]
    async fn timeout_becomes_error() {
        let result = with_timeout(
            Duration::from_millis(20),
            Slow.complete(Prompt::new("s", "u", 10)),
        )
        .await;
        assert!(result.unwrap_err().contains("timed out"));
    }

    #[tokio::test]
    async fn completed_future_passes_through() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, String>(3) }).await;
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn clean_single_word_strips_decoration() {
        assert_eq!(clean_single_word("  Kindness.\n"), Some("Kindness".into()));
        assert_eq!(clean_single_word("\"Courage\""), Some("Courage".into()));
        assert_eq!(clean_single_word("**Wonder**!"), Some("Wonder".into()));
        assert_eq!(clean_single_word("\n\nJoy\nbecause..."), Some("Joy".into()));
        assert_eq!(clean_single_word("  \n \"\" "), None);
    }

    #[test]
    fn clean_single_word_rejects_sentences() {
        assert_eq!(clean_single_word("Courage is the virtue of 'acb'"), None);
        assert_eq!(clean_single_word("I would say: Kindness."), None);
        assert_eq!(clean_single_word("Inner Peace"), Some("Inner Peace".into()));
    }

    #[test]
    fn strip_code_fences_handles_both_forms() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  [3] "), "[3]");
    }

    #[test]
    fn request_carries_seed_and_json_format() {
        let client = OpenRouterClient::new("sk-test").unwrap();
        let generator = LlmTextGenerator::new(client, "test/model")
            .with_temperature(0.2)
            .with_seed(42);
        let body = generator.request_for(Prompt::new("sys", "user", 60).with_json_output());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "test/model");
        assert_eq!(json["seed"], 42);
        assert_eq!(json["max_tokens"], 60);
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "user");
    }

    #[test]
    fn request_without_seed_omits_it() {
        let client = OpenRouterClient::new("sk-test").unwrap();
        let generator = LlmTextGenerator::new(client, "m");
        let body = generator.request_for(Prompt::new("s", "u", 10));
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("seed").is_none());
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn prompt_builder() {
        let prompt = Prompt::new("sys", "user", 50).with_json_output();
        assert!(prompt.json_output);
        assert_eq!(prompt.max_tokens, 50);
    }
}
