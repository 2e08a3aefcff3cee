//! Matching a virtue to a name variant.
//!
//! [`VirtueSource`] is the capability; [`VirtueMatcher`] wraps whichever
//! implementation was chosen at construction:
//!
//! | Source | Behavior |
//! |--------|----------|
//! | [`CatalogVirtueSource`] | Character-code fingerprint of the variant, modulo the catalog size |
//! | [`LlmVirtueSource`] | Asks a [`TextGenerator`] for one word; random catalog virtue on any failure |

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::Catalogs;
use crate::llm::{Prompt, TextGenerator, clean_single_word, with_timeout};
use crate::rng::SharedRng;

const VIRTUE_SYSTEM_PROMPT: &str =
    "You are an expert in finding meaningful virtue associations in words.";

const VIRTUE_MAX_TOKENS: u32 = 10;

/// Boxed future returned by [`VirtueSource::virtue_for`].
pub type VirtueFuture<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

/// Something that can pick a virtue for a variant of a name.
///
/// Implementations must always produce a virtue; failures are handled inside.
pub trait VirtueSource: Send + Sync {
    fn virtue_for<'a>(&'a self, variant: &'a str, original_name: &'a str) -> VirtueFuture<'a>;
}

/// Sum of the variant's character codes.
pub fn fingerprint(variant: &str) -> u64 {
    variant.chars().map(|c| u64::from(u32::from(c))).sum()
}

/// The catalog entry selected by `fingerprint(variant) % virtues.len()`.
///
/// Returns an empty string for an empty catalog.
pub fn fingerprint_virtue<'a>(variant: &str, virtues: &'a [String]) -> &'a str {
    if virtues.is_empty() {
        return "";
    }
    let index = (fingerprint(variant) % virtues.len() as u64) as usize;
    &virtues[index]
}

// ── CatalogVirtueSource ────────────────────────────────────────────

/// Deterministic virtues: the same variant always yields the same virtue.
pub struct CatalogVirtueSource {
    catalogs: Arc<Catalogs>,
}

impl CatalogVirtueSource {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self { catalogs }
    }
}

impl VirtueSource for CatalogVirtueSource {
    fn virtue_for<'a>(&'a self, variant: &'a str, _original_name: &'a str) -> VirtueFuture<'a> {
        let virtue = fingerprint_virtue(variant, &self.catalogs.virtues).to_string();
        Box::pin(std::future::ready(virtue))
    }
}

// ── LlmVirtueSource ────────────────────────────────────────────────

/// Virtues suggested by a text-generation service.
pub struct LlmVirtueSource {
    generator: Arc<dyn TextGenerator>,
    catalogs: Arc<Catalogs>,
    rng: SharedRng,
    timeout: Duration,
}

impl LlmVirtueSource {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        catalogs: Arc<Catalogs>,
        rng: SharedRng,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            catalogs,
            rng,
            timeout,
        }
    }

    fn prompt(variant: &str, original_name: &str) -> Prompt {
        Prompt::new(
            VIRTUE_SYSTEM_PROMPT,
            format!(
                "Find a virtue or positive quality that could be associated with the word \
                 '{variant}', which is derived from the name '{original_name}'. \
                 Respond with just the single virtue word."
            ),
            VIRTUE_MAX_TOKENS,
        )
    }

    fn fallback(&self) -> String {
        self.rng
            .choose(&self.catalogs.virtues)
            .cloned()
            .unwrap_or_default()
    }
}

impl VirtueSource for LlmVirtueSource {
    fn virtue_for<'a>(&'a self, variant: &'a str, original_name: &'a str) -> VirtueFuture<'a> {
        Box::pin(async move {
            let answer = with_timeout(
                self.timeout,
                self.generator.complete(Self::prompt(variant, original_name)),
            )
            .await
            .and_then(|text| {
                clean_single_word(&text)
                    .ok_or_else(|| format!("answer is not a single word: {:?}", text.trim()))
            });

            match answer {
                Ok(virtue) => {
                    debug!("Virtue service matched '{variant}' to '{virtue}'");
                    virtue
                }
                Err(e) => {
                    let virtue = self.fallback();
                    warn!("Virtue service failed for '{variant}': {e}; using '{virtue}' instead");
                    virtue
                }
            }
        })
    }
}

// ── VirtueMatcher ──────────────────────────────────────────────────

/// Pairs variants with virtues using the source selected at construction.
pub struct VirtueMatcher {
    source: Box<dyn VirtueSource>,
}

impl VirtueMatcher {
    pub fn new(source: Box<dyn VirtueSource>) -> Self {
        Self { source }
    }

    /// Fingerprint-based matching over the catalog.
    pub fn deterministic(catalogs: Arc<Catalogs>) -> Self {
        Self::new(Box::new(CatalogVirtueSource::new(catalogs)))
    }

    /// Service-backed matching with a random catalog fallback.
    pub fn external(
        generator: Arc<dyn TextGenerator>,
        catalogs: Arc<Catalogs>,
        rng: SharedRng,
        timeout: Duration,
    ) -> Self {
        Self::new(Box::new(LlmVirtueSource::new(
            generator, catalogs, rng, timeout,
        )))
    }

    /// The virtue for `variant`, a rearrangement of `original_name`.
    pub async fn match_virtue(&self, variant: &str, original_name: &str) -> String {
        self.source.virtue_for(variant, original_name).await
    }
}
