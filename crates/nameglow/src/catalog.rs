//! Word catalogs: virtues, nickname patterns, and reflection prompts.
//!
//! [`Catalogs::default()`] carries the built-in lists. A JSON file can
//! replace any subset of them; fields left out keep their defaults:
//!
//! ```json
//! {
//!   "virtues": ["Kindness", "Courage"],
//!   "nicknames": { "diminutives": ["ie", "y"] }
//! }
//! ```
//!
//! Catalogs are immutable once built and are shared between components
//! through an `Arc`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NameGlowError, Result};

const DEFAULT_VIRTUES: [&str; 22] = [
    "Kindness",
    "Courage",
    "Wisdom",
    "Patience",
    "Honesty",
    "Compassion",
    "Creativity",
    "Resilience",
    "Generosity",
    "Gratitude",
    "Humility",
    "Joy",
    "Serenity",
    "Mindfulness",
    "Balance",
    "Authenticity",
    "Wonder",
    "Empathy",
    "Integrity",
    "Determination",
    "Gentleness",
    "Presence",
];

const DEFAULT_PREFIXES: [&str; 8] = [
    "Sunny", "Starry", "Gentle", "Bright", "Noble", "Kind", "Wise", "Brave",
];

const DEFAULT_SUFFIXES: [&str; 7] = ["heart", "soul", "mind", "spirit", "light", "smile", "spark"];

const DEFAULT_DIMINUTIVES: [&str; 7] = ["ie", "y", "kins", "boo", "bean", "pop", "love"];

const DEFAULT_REFLECTIONS: [&str; 10] = [
    "How does today's anagram resonate with you in this moment?",
    "What part of you does this virtue illuminate today?",
    "If you embodied this virtue fully today, how might your experience change?",
    "Notice how this quality can feel both familiar and new at once.",
    "What happens when you imagine this quality as flowing through you rather than belonging to you?",
    "How might this virtue appear differently in different contexts of your life?",
    "If this quality were a guest visiting your home, how would you welcome it?",
    "What if this virtue isn't something you have, but something you participate in?",
    "How does this quality exist beyond the boundaries of what you call 'me'?",
    "What happens if you allow this virtue to be present without claiming it as yours?",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|s| (*s).to_string()).collect()
}

/// Word lists used by the rule-based nickname strategies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NicknamePatterns {
    /// Words placed before the first letters of a name ("Sunny" + "ale").
    pub prefixes: Vec<String>,
    /// Words appended to a name ("alex" + "heart").
    pub suffixes: Vec<String>,
    /// Endings appended to the first letter ("a" + "ie"), in priority order.
    pub diminutives: Vec<String>,
}

impl Default for NicknamePatterns {
    fn default() -> Self {
        Self {
            prefixes: owned(&DEFAULT_PREFIXES),
            suffixes: owned(&DEFAULT_SUFFIXES),
            diminutives: owned(&DEFAULT_DIMINUTIVES),
        }
    }
}

/// All catalogs used during generation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Catalogs {
    pub virtues: Vec<String>,
    pub nicknames: NicknamePatterns,
    pub reflections: Vec<String>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            virtues: owned(&DEFAULT_VIRTUES),
            nicknames: NicknamePatterns::default(),
            reflections: owned(&DEFAULT_REFLECTIONS),
        }
    }
}

impl Catalogs {
    /// Parse catalogs from JSON text. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalogs: Catalogs = serde_json::from_str(json)?;
        catalogs.validate()?;
        Ok(catalogs)
    }

    /// Load catalogs from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            NameGlowError::Config(format!(
                "failed to read catalog file {}: {e}",
                path.display()
            ))
        })?;
        let catalogs = Self::from_json(&json)?;
        debug!(
            "Loaded catalogs from {}: {} virtues, {} reflections",
            path.display(),
            catalogs.virtues.len(),
            catalogs.reflections.len()
        );
        Ok(catalogs)
    }

    /// Every list must have at least one entry; generation indexes into all
    /// of them.
    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("virtues", self.virtues.len()),
            ("nicknames.prefixes", self.nicknames.prefixes.len()),
            ("nicknames.suffixes", self.nicknames.suffixes.len()),
            ("nicknames.diminutives", self.nicknames.diminutives.len()),
            ("reflections", self.reflections.len()),
        ];
        match lists.iter().find(|(_, len)| *len == 0) {
            Some((field, _)) => Err(NameGlowError::Config(format!(
                "catalog list '{field}' must not be empty"
            ))),
            None => Ok(()),
        }
    }
}
