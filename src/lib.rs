//! Glossa - Memoizing Translation Engine
//!
//! Translates arbitrary text between language pairs through an external
//! LLM, persisting every result under a content fingerprint so identical
//! requests are served without recomputation. Concurrent identical requests
//! are deduplicated in-process (single-flight), long texts are translated
//! in bounded sentence-aligned chunks, and learned URL rewrites are applied
//! to translated output.

pub mod bundler;
pub mod chunk;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod model;
pub mod pipeline;
pub mod service;
pub mod store;
pub mod translate;
pub mod url_rewrite;

pub use config::Config;
pub use error::{GlossaError, Result};
pub use model::{TranslationRecord, UrlMapping};
pub use service::TranslationService;
pub use store::{MemoryStore, TranslationStore};
pub use translate::{LlmTranslator, Translator};
