//! Nickname generation.
//!
//! [`PatternNicknameSource`] applies fixed strategies in priority order until
//! it has enough nicknames:
//!
//! 1. first letter + each diminutive ("A" + "ie" → "Aie"), in catalog order;
//! 2. first three letters + "ie", for names of at least three letters;
//! 3. a random prefix word + first three letters ("Sunnyale");
//! 4. the name + a random suffix word ("Alexanderheart").
//!
//! [`LlmNicknameSource`] asks a [`TextGenerator`] for structured pairs and
//! falls back to the patterns wholesale when anything goes wrong.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Catalogs;
use crate::json_schema_for;
use crate::llm::{Prompt, TextGenerator, strip_code_fences, with_timeout};
use crate::name::{Name, capitalize};
use crate::rng::SharedRng;

const NICKNAME_SYSTEM_PROMPT: &str =
    "You generate meaningful, positive nicknames based on people's names.";

const NICKNAME_MAX_TOKENS: u32 = 250;

/// A nickname and what it is meant to convey.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct Nickname {
    pub nickname: String,
    pub meaning: String,
}

impl Nickname {
    pub fn new(nickname: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            meaning: meaning.into(),
        }
    }
}

/// Boxed future returned by [`NicknameSource::nicknames_for`].
pub type NicknameFuture<'a> = Pin<Box<dyn Future<Output = Vec<Nickname>> + Send + 'a>>;

/// Something that can suggest up to `count` nicknames for a name.
pub trait NicknameSource: Send + Sync {
    fn nicknames_for<'a>(&'a self, name: &'a Name, count: usize) -> NicknameFuture<'a>;
}

// ── PatternNicknameSource ──────────────────────────────────────────

/// Rule-based nicknames from the catalog's nickname patterns.
pub struct PatternNicknameSource {
    catalogs: Arc<Catalogs>,
    rng: SharedRng,
}

impl PatternNicknameSource {
    pub fn new(catalogs: Arc<Catalogs>, rng: SharedRng) -> Self {
        Self { catalogs, rng }
    }

    /// Up to `count` nicknames. The random source is only consulted when the
    /// prefix or suffix strategy is reached.
    pub fn generate(&self, name: &Name, count: usize) -> Vec<Nickname> {
        let patterns = &self.catalogs.nicknames;
        let normalized = name.normalized();
        let display = name.capitalized();
        let first = name.first_letters(1);
        let first_three = name.first_letters(3);
        let mut results = Vec::with_capacity(count);

        for diminutive in &patterns.diminutives {
            if results.len() >= count {
                break;
            }
            results.push(Nickname::new(
                capitalize(&format!("{first}{diminutive}")),
                format!("Represents the essence of {display}'s spirit"),
            ));
        }

        if results.len() < count && name.letter_count() >= 3 {
            results.push(Nickname::new(
                capitalize(&format!("{first_three}ie")),
                format!("Captures the playful energy of {display}"),
            ));
        }

        if results.len() < count
            && let Some(prefix) = self.rng.choose(&patterns.prefixes)
        {
            results.push(Nickname::new(
                format!("{prefix}{first_three}"),
                format!(
                    "Highlights the {} nature within {display}",
                    prefix.to_lowercase()
                ),
            ));
        }

        if results.len() < count
            && let Some(suffix) = self.rng.choose(&patterns.suffixes)
        {
            results.push(Nickname::new(
                capitalize(&format!("{normalized}{suffix}")),
                format!("Celebrates the {suffix} that {display} brings to others"),
            ));
        }

        results.truncate(count);
        results
    }
}

impl NicknameSource for PatternNicknameSource {
    fn nicknames_for<'a>(&'a self, name: &'a Name, count: usize) -> NicknameFuture<'a> {
        Box::pin(std::future::ready(self.generate(name, count)))
    }
}

// ── LlmNicknameSource ──────────────────────────────────────────────

/// Nicknames suggested by a text-generation service.
pub struct LlmNicknameSource {
    generator: Arc<dyn TextGenerator>,
    fallback: PatternNicknameSource,
    timeout: Duration,
}

impl LlmNicknameSource {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        fallback: PatternNicknameSource,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            fallback,
            timeout,
        }
    }

    fn prompt(name: &Name, count: usize) -> Prompt {
        Prompt::new(
            NICKNAME_SYSTEM_PROMPT,
            format!(
                "Generate {count} nicknames for someone named '{}'. For each nickname, \
                 provide a short meaning that connects to a positive quality. Respond with \
                 a JSON object of the form \
                 {{\"nicknames\": [{{\"nickname\": \"...\", \"meaning\": \"...\"}}]}}.",
                name.display()
            ),
            NICKNAME_MAX_TOKENS,
        )
        .with_json_output()
    }
}

impl NicknameSource for LlmNicknameSource {
    fn nicknames_for<'a>(&'a self, name: &'a Name, count: usize) -> NicknameFuture<'a> {
        Box::pin(async move {
            if count == 0 {
                return Vec::new();
            }
            let answer = with_timeout(
                self.timeout,
                self.generator.complete(Self::prompt(name, count)),
            )
            .await
            .and_then(|text| parse_nickname_answer(&text, count));

            match answer {
                Ok(nicknames) => {
                    debug!(
                        "Nickname service returned {} nickname(s) for '{}'",
                        nicknames.len(),
                        name.display()
                    );
                    nicknames
                }
                Err(e) => {
                    warn!(
                        "Nickname service failed for '{}': {e}; using pattern nicknames",
                        name.display()
                    );
                    self.fallback.generate(name, count)
                }
            }
        })
    }
}

/// Parse a model answer into at most `count` nicknames.
///
/// Accepts a bare JSON array or an object with a `nicknames` array, optionally
/// wrapped in a Markdown code fence. The array is validated against the
/// `Vec<Nickname>` schema; an empty list or a blank nickname is an error.
pub fn parse_nickname_answer(text: &str, count: usize) -> Result<Vec<Nickname>, String> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| format!("answer is not JSON: {e}"))?;

    let list = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => map
            .remove("nicknames")
            .ok_or_else(|| "answer has no 'nicknames' field".to_string())?,
        other => return Err(format!("unexpected answer shape: {other}")),
    };

    let schema = json_schema_for::<Vec<Nickname>>();
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| format!("invalid nickname schema: {e}"))?;
    let errors: Vec<String> = validator
        .iter_errors(&list)
        .map(|e| format!("  - {e}"))
        .collect();
    if !errors.is_empty() {
        return Err(format!(
            "answer does not match the nickname schema:\n{}",
            errors.join("\n")
        ));
    }

    let mut nicknames: Vec<Nickname> =
        serde_json::from_value(list).map_err(|e| format!("failed to read nicknames: {e}"))?;
    if nicknames.is_empty() {
        return Err("answer contained no nicknames".to_string());
    }
    if nicknames.iter().any(|n| n.nickname.trim().is_empty()) {
        return Err("answer contained a blank nickname".to_string());
    }
    nicknames.truncate(count);
    Ok(nicknames)
}

// ── NicknameGenerator ──────────────────────────────────────────────

/// Produces nicknames using the source selected at construction.
pub struct NicknameGenerator {
    source: Box<dyn NicknameSource>,
}

impl NicknameGenerator {
    pub fn new(source: Box<dyn NicknameSource>) -> Self {
        Self { source }
    }

    /// Rule-based nicknames only.
    pub fn deterministic(catalogs: Arc<Catalogs>, rng: SharedRng) -> Self {
        Self::new(Box::new(PatternNicknameSource::new(catalogs, rng)))
    }

    /// Service-backed nicknames, falling back to the patterns on failure.
    pub fn external(
        generator: Arc<dyn TextGenerator>,
        catalogs: Arc<Catalogs>,
        rng: SharedRng,
        timeout: Duration,
    ) -> Self {
        Self::new(Box::new(LlmNicknameSource::new(
            generator,
            PatternNicknameSource::new(catalogs, rng),
            timeout,
        )))
    }

    /// Up to `count` nicknames for `name`.
    pub async fn generate(&self, name: &Name, count: usize) -> Vec<Nickname> {
        self.source.nicknames_for(name, count).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NicknamePatterns;
    use crate::llm::TextFuture;

    fn name(raw: &str) -> Name {
        Name::parse(raw).unwrap()
    }

    fn patterns(seed: u64) -> PatternNicknameSource {
        PatternNicknameSource::new(Arc::new(Catalogs::default()), SharedRng::seeded(seed))
    }

    /// Catalogs with a single diminutive so the later strategies are reached.
    fn short_patterns() -> Arc<Catalogs> {
        Arc::new(Catalogs {
            nicknames: NicknamePatterns {
                prefixes: vec!["Sunny".into()],
                suffixes: vec!["heart".into()],
                diminutives: vec!["ie".into()],
            },
            ..Catalogs::default()
        })
    }

    struct Answer(&'static str);

    impl TextGenerator for Answer {
        fn complete(&self, _prompt: Prompt) -> TextFuture<'_> {
            Box::pin(std::future::ready(Ok(self.0.to_string())))
        }
    }

    struct Hang;

    impl TextGenerator for Hang {
        fn complete(&self, _prompt: Prompt) -> TextFuture<'_> {
            Box::pin(std::future::pending())
        }
    }

    fn external(generator: impl TextGenerator + 'static) -> NicknameGenerator {
        NicknameGenerator::external(
            Arc::new(generator),
            Arc::new(Catalogs::default()),
            SharedRng::seeded(5),
            Duration::from_millis(50),
        )
    }

    #[test]
    fn diminutives_come_first() {
        let nicknames = patterns(1).generate(&name("Alexander"), 2);
        assert_eq!(
            nicknames,
            vec![
                Nickname::new("Aie", "Represents the essence of Alexander's spirit"),
                Nickname::new("Ay", "Represents the essence of Alexander's spirit"),
            ]
        );
    }

    #[test]
    fn short_name_with_count_three() {
        let nicknames = patterns(1).generate(&name("Al"), 3);
        let names: Vec<&str> = nicknames.iter().map(|n| n.nickname.as_str()).collect();
        assert_eq!(names, vec!["Aie", "Ay", "Akins"]);
    }

    #[test]
    fn later_strategies_fill_remaining_slots() {
        let source = PatternNicknameSource::new(short_patterns(), SharedRng::seeded(9));
        let nicknames = source.generate(&name("Maria"), 4);
        assert_eq!(
            nicknames,
            vec![
                Nickname::new("Mie", "Represents the essence of Maria's spirit"),
                Nickname::new("Marie", "Captures the playful energy of Maria"),
                Nickname::new("Sunnymar", "Highlights the sunny nature within Maria"),
                Nickname::new(
                    "Mariaheart",
                    "Celebrates the heart that Maria brings to others"
                ),
            ]
        );
    }

    #[test]
    fn short_names_skip_the_syllable_strategy() {
        let source = PatternNicknameSource::new(short_patterns(), SharedRng::seeded(9));
        let nicknames = source.generate(&name("Al"), 3);
        let names: Vec<&str> = nicknames.iter().map(|n| n.nickname.as_str()).collect();
        assert_eq!(names, vec!["Aie", "Sunnyal", "Alheart"]);
    }

    #[test]
    fn never_exceeds_count() {
        let source = PatternNicknameSource::new(short_patterns(), SharedRng::seeded(9));
        assert_eq!(source.generate(&name("Maria"), 10).len(), 4);
        assert!(source.generate(&name("Maria"), 0).is_empty());
    }

    #[test]
    fn seeded_random_picks_are_reproducible() {
        let catalogs = Arc::new(Catalogs {
            nicknames: NicknamePatterns {
                diminutives: vec![],
                ..NicknamePatterns::default()
            },
            ..Catalogs::default()
        });
        let a = PatternNicknameSource::new(catalogs.clone(), SharedRng::seeded(77));
        let b = PatternNicknameSource::new(catalogs, SharedRng::seeded(77));
        assert_eq!(
            a.generate(&name("Sophia"), 3),
            b.generate(&name("Sophia"), 3)
        );
    }

    #[test]
    fn parses_object_and_array_answers() {
        let object = r#"{"nicknames": [{"nickname": "Lexi", "meaning": "Bright and kind"}]}"#;
        assert_eq!(
            parse_nickname_answer(object, 2).unwrap(),
            vec![Nickname::new("Lexi", "Bright and kind")]
        );

        let fenced = "```json\n[{\"nickname\": \"A\", \"meaning\": \"x\"}, {\"nickname\": \"B\", \"meaning\": \"y\"}]\n```";
        let parsed = parse_nickname_answer(fenced, 1).unwrap();
        assert_eq!(parsed, vec![Nickname::new("A", "x")]);
    }

    #[test]
    fn rejects_malformed_answers() {
        assert!(parse_nickname_answer("Lexi, Al", 2).is_err());
        assert!(parse_nickname_answer("[]", 2).is_err());
        assert!(parse_nickname_answer(r#"[{"nickname": "Lexi"}]"#, 2).is_err());
        assert!(parse_nickname_answer(r#"{"names": []}"#, 2).is_err());
        assert!(parse_nickname_answer(r#"[{"nickname": " ", "meaning": "m"}]"#, 2).is_err());
        assert!(parse_nickname_answer("42", 2).is_err());
    }

    #[tokio::test]
    async fn external_success_is_used_as_is() {
        let generator = external(Answer(
            r#"{"nicknames": [{"nickname": "Lexi", "meaning": "Bright"}, {"nickname": "Xan", "meaning": "Bold"}]}"#,
        ));
        let nicknames = generator.generate(&name("Alexander"), 2).await;
        assert_eq!(nicknames[0].nickname, "Lexi");
        assert_eq!(nicknames[1].nickname, "Xan");
    }

    #[tokio::test]
    async fn external_failure_falls_back_entirely() {
        let expected = patterns(5).generate(&name("Alexander"), 2);
        let garbage = external(Answer("Here are some nicknames: Lexi, Xan"));
        assert_eq!(garbage.generate(&name("Alexander"), 2).await, expected);

        let timeout = external(Hang);
        assert_eq!(timeout.generate(&name("Alexander"), 2).await, expected);
    }
}
