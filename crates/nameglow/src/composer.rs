//! Assembling a day's content from the individual generators.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalogs;
use crate::error::Result;
use crate::llm::TextGenerator;
use crate::mutator::NameMutator;
use crate::name::Name;
use crate::nickname::{Nickname, NicknameGenerator};
use crate::rng::SharedRng;
use crate::virtue::VirtueMatcher;

/// Variants requested per card: the anagram of the day plus alternatives.
pub const VARIANT_COUNT: usize = 3;

/// Nicknames per card.
pub const NICKNAME_COUNT: usize = 2;

/// One day's generated content for a name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyContent {
    pub date: NaiveDate,
    /// The name as entered (trimmed).
    pub name: String,
    /// The primary variant: the first one the mutator found, or the reversed
    /// name when there were none.
    pub anagram: String,
    pub virtue: String,
    pub nicknames: Vec<Nickname>,
    pub reflection_prompt: String,
    /// Remaining variants, in discovery order.
    #[serde(default)]
    pub alternative_anagrams: Vec<String>,
}

/// A variant paired with its virtue.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VirtueAssignment {
    pub variant: String,
    pub virtue: String,
}

/// Runs the generation pipeline: variants → virtue → nicknames → reflection.
pub struct ContentComposer {
    catalogs: Arc<Catalogs>,
    mutator: NameMutator,
    virtues: VirtueMatcher,
    nicknames: NicknameGenerator,
    rng: SharedRng,
}

impl ContentComposer {
    pub fn new(
        catalogs: Arc<Catalogs>,
        virtues: VirtueMatcher,
        nicknames: NicknameGenerator,
        rng: SharedRng,
    ) -> Self {
        Self {
            catalogs,
            mutator: NameMutator::default(),
            virtues,
            nicknames,
            rng,
        }
    }

    /// Catalog-only generation; no network access.
    pub fn deterministic(catalogs: Arc<Catalogs>, rng: SharedRng) -> Self {
        Self::new(
            catalogs.clone(),
            VirtueMatcher::deterministic(catalogs.clone()),
            NicknameGenerator::deterministic(catalogs, rng.clone()),
            rng,
        )
    }

    /// Service-backed virtues and nicknames, each call bounded by `timeout`.
    pub fn external(
        generator: Arc<dyn TextGenerator>,
        catalogs: Arc<Catalogs>,
        rng: SharedRng,
        timeout: Duration,
    ) -> Self {
        Self::new(
            catalogs.clone(),
            VirtueMatcher::external(generator.clone(), catalogs.clone(), rng.clone(), timeout),
            NicknameGenerator::external(generator, catalogs, rng.clone(), timeout),
            rng,
        )
    }

    /// Replace the default name mutator.
    pub fn with_mutator(mut self, mutator: NameMutator) -> Self {
        self.mutator = mutator;
        self
    }

    /// Generate today's content (local date) for `raw_name`.
    pub async fn compose(&self, raw_name: &str) -> Result<DailyContent> {
        self.compose_on(raw_name, Local::now().date_naive()).await
    }

    /// Generate content for `raw_name`, stamped with `date`.
    ///
    /// Fails only when the name is invalid.
    pub async fn compose_on(&self, raw_name: &str, date: NaiveDate) -> Result<DailyContent> {
        let name = Name::parse(raw_name)?;

        let mut variants = self.mutator.generate_variants(&name, VARIANT_COUNT);
        let anagram = if variants.is_empty() {
            name.reversed()
        } else {
            variants.remove(0)
        };

        let virtue = self.virtues.match_virtue(&anagram, name.display()).await;
        let nicknames = self.nicknames.generate(&name, NICKNAME_COUNT).await;
        let reflection_prompt = self.reflection_prompt();

        info!(
            "Composed content for '{}': anagram={anagram}, virtue={virtue}, {} nickname(s), {} alternative(s)",
            name.display(),
            nicknames.len(),
            variants.len()
        );

        Ok(DailyContent {
            date,
            name: name.display().to_string(),
            anagram,
            virtue,
            nicknames,
            reflection_prompt,
            alternative_anagrams: variants,
        })
    }

    /// A uniformly random reflection prompt.
    pub fn reflection_prompt(&self) -> String {
        self.rng
            .choose(&self.catalogs.reflections)
            .cloned()
            .unwrap_or_default()
    }

    /// Pair each of `variants` with its own virtue.
    pub async fn assign_virtues(
        &self,
        original_name: &str,
        variants: &[String],
    ) -> Vec<VirtueAssignment> {
        let mut assignments = Vec::with_capacity(variants.len());
        for variant in variants {
            let virtue = self.virtues.match_virtue(variant, original_name).await;
            assignments.push(VirtueAssignment {
                variant: variant.clone(),
                virtue,
            });
        }
        assignments
    }
}
