// External translator boundary.
//
// The engine never reimplements translation itself; it drives an external
// LLM through this trait. The production backend is an OpenAI-compatible
// chat completions client; tests substitute their own implementations.

pub mod llm;

use async_trait::async_trait;

pub use llm::LlmTranslator;

use crate::error::Result;

/// A capability that translates one bounded chunk of text between two
/// ISO 639-1 language codes.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_chunk(
        &self,
        text: &str,
        original_language: &str,
        translated_language: &str,
    ) -> Result<String>;
}
