//! Per-user history of generated content, stored as one JSON document.
//!
//! File layout:
//! ```json
//! {
//!   "users": {
//!     "mary_jane": { "history": [ { "date": "2024-03-14", ... } ] }
//!   }
//! }
//! ```
//!
//! Loading never fails: a missing or unreadable file is an empty history.
//! Saving rewrites the whole document through a temp file and a rename, so a
//! crash mid-write leaves the previous file intact. Concurrent writers from
//! several processes are not coordinated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::composer::DailyContent;
use crate::error::Result;

/// Default history file name, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "nameglow_data.json";

/// The whole history file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryDocument {
    #[serde(default)]
    pub users: BTreeMap<String, UserHistory>,
}

/// Saved content for one user, oldest first.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UserHistory {
    #[serde(default)]
    pub history: Vec<DailyContent>,
}

/// History identifier for a name: lowercase, spaces replaced by underscores.
pub fn user_id_for(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Reads and appends to the history file at a fixed path.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. Missing or corrupt files yield an empty document.
    pub fn load(&self) -> HistoryDocument {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                debug!(
                    "No history at {} ({e}); starting empty",
                    self.path.display()
                );
                return HistoryDocument::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Ignoring malformed history at {}: {e}", self.path.display());
                HistoryDocument::default()
            }
        }
    }

    /// Saved entries for `user_id`, oldest first.
    pub fn history(&self, user_id: &str) -> Vec<DailyContent> {
        self.load()
            .users
            .remove(user_id)
            .map(|u| u.history)
            .unwrap_or_default()
    }

    /// Append `content` to `user_id`'s history and rewrite the file.
    pub fn save(&self, user_id: &str, content: &DailyContent) -> Result<()> {
        let mut doc = self.load();
        doc.users
            .entry(user_id.to_string())
            .or_default()
            .history
            .push(content.clone());
        self.write(&doc)?;
        info!("Saved content for '{user_id}' to {}", self.path.display());
        Ok(())
    }

    /// Atomic write: serialize to a temp file, then rename into place.
    fn write(&self, doc: &HistoryDocument) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(doc)?;
        std::fs::write(&tmp_path, json)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}
