//! Convenience re-exports for common `nameglow` types.
//!
//! ```ignore
//! use nameglow::prelude::*;
//! ```
//!
//! Source implementations (`CatalogVirtueSource`, `LlmNicknameSource`, ...)
//! and the raw chat types are left out; import those from their modules.

pub use crate::OpenRouterClient;
pub use crate::catalog::{Catalogs, NicknamePatterns};
pub use crate::composer::{ContentComposer, DailyContent, VirtueAssignment};
pub use crate::config::NameGlowConfig;
pub use crate::error::{NameGlowError, Result};
pub use crate::history::{HistoryStore, user_id_for};
pub use crate::llm::{LlmTextGenerator, Prompt, TextGenerator};
pub use crate::mutator::NameMutator;
pub use crate::name::Name;
pub use crate::nickname::{Nickname, NicknameGenerator, NicknameSource};
pub use crate::render::{render_alternatives, render_html, render_json, render_text};
pub use crate::rng::SharedRng;
pub use crate::virtue::{VirtueMatcher, VirtueSource};
