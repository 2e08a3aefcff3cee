//! Runtime configuration with sensible defaults.
//!
//! [`NameGlowConfig`] captures everything needed to build a
//! [`ContentComposer`] and a [`HistoryStore`]. The CLI maps its flags onto
//! it; library users can set fields directly or use the `with_*` helpers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::Catalogs;
use crate::composer::ContentComposer;
use crate::error::{NameGlowError, Result};
use crate::history::{DEFAULT_HISTORY_FILE, HistoryStore};
use crate::llm::LlmTextGenerator;
use crate::rng::SharedRng;
use crate::{DEFAULT_MODEL, OpenRouterClient};

/// Configuration for a NameGlow session.
#[derive(Debug, Clone)]
pub struct NameGlowConfig {
    /// Use the text-generation service for virtues and nicknames.
    /// Default: `false`.
    pub use_api: bool,
    /// OpenRouter API key. Without one, `use_api` has no effect.
    pub api_key: Option<String>,
    /// Model identifier. Default: `"anthropic/claude-sonnet-4"`.
    pub model: String,
    /// Upper bound on each service call. Default: 10 seconds.
    pub timeout: Duration,
    /// Sampling temperature for service calls. Default: `0.7`.
    pub temperature: f32,
    /// Seed for every random pick, also forwarded to the text-generation
    /// service. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// History file. Default: `nameglow_data.json`.
    pub history_path: PathBuf,
    /// Optional JSON file overriding the built-in catalogs.
    pub catalog_path: Option<PathBuf>,
}

impl Default for NameGlowConfig {
    fn default() -> Self {
        Self {
            use_api: false,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(10),
            temperature: 0.7,
            seed: None,
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            catalog_path: None,
        }
    }
}

impl NameGlowConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_api(mut self, api_key: impl Into<String>) -> Self {
        self.use_api = true;
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Built-in catalogs, or the override file when one is configured.
    pub fn load_catalogs(&self) -> Result<Catalogs> {
        match &self.catalog_path {
            Some(path) => Catalogs::from_json_file(path),
            None => Ok(Catalogs::default()),
        }
    }

    /// Build a composer in service-backed or deterministic mode.
    ///
    /// Requesting the service without an API key logs a warning and falls
    /// back to deterministic mode.
    pub fn build_composer(&self) -> Result<ContentComposer> {
        if self.timeout.is_zero() {
            return Err(NameGlowError::Config(
                "timeout must be greater than zero".into(),
            ));
        }
        let catalogs = Arc::new(self.load_catalogs()?);
        let rng = SharedRng::new(self.seed);

        match (self.use_api, self.api_key.as_deref()) {
            (true, Some(key)) if !key.trim().is_empty() => {
                let client = OpenRouterClient::new(key).map_err(NameGlowError::Api)?;
                let mut generator = LlmTextGenerator::new(client, self.model.clone())
                    .with_temperature(self.temperature);
                if let Some(seed) = self.seed {
                    generator = generator.with_seed(seed);
                }
                info!(
                    "Using model {} for virtues and nicknames (timeout {:?})",
                    self.model, self.timeout
                );
                Ok(ContentComposer::external(
                    Arc::new(generator),
                    catalogs,
                    rng,
                    self.timeout,
                ))
            }
            (true, _) => {
                warn!("API mode requested but no API key is set; using catalog generation");
                Ok(ContentComposer::deterministic(catalogs, rng))
            }
            (false, _) => Ok(ContentComposer::deterministic(catalogs, rng)),
        }
    }

    /// The history store at the configured path.
    pub fn history_store(&self) -> HistoryStore {
        HistoryStore::new(self.history_path.clone())
    }
}
