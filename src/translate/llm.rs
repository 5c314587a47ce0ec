use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Translator;
use crate::config::{GlossaryConfig, TranslatorConfig};
use crate::error::{GlossaError, Result};

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Translator backed by an OpenAI-compatible chat completions endpoint.
pub struct LlmTranslator {
    client: Client,
    config: TranslatorConfig,
    api_key: String,
}

impl LlmTranslator {
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        let api_key = if config.api_key.is_empty() {
            std::env::var("OPENAI_API_KEY").map_err(|_| {
                GlossaError::Config(
                    "No API key configured and OPENAI_API_KEY is not set".to_string(),
                )
            })?
        } else {
            config.api_key.clone()
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn glossary_for(
        &self,
        original_language: &str,
        translated_language: &str,
    ) -> Option<&GlossaryConfig> {
        self.config.glossaries.iter().find(|g| {
            g.original_language == original_language
                && g.translated_language == translated_language
        })
    }

    /// Build the system prompt for one language pair, including any
    /// configured terminology guidance.
    fn build_system_prompt(&self, original_language: &str, translated_language: &str) -> String {
        let mut prompt = format!(
            "You are a professional translation tool. Your task is to translate text from {} to {} while maintaining the highest quality and accuracy. The languages were defined as ISO 639-1 codes.\n\
             Key requirements:\n\
             1. Preserve all original formatting, including line breaks, spacing, and special characters\n\
             2. Maintain the original tone, style, and intent of the text\n\
             3. Keep technical terms, proper nouns, and domain-specific vocabulary intact\n\
             4. Ensure natural-sounding translations in the target language\n\
             5. Do not add any explanatory text or comments\n\
             6. Do not add any additional information\n\
             7. If the text contains no alphanumeric characters, return it unchanged\n\
             8. For ambiguous terms, choose the most contextually appropriate translation\n\
             9. Never return anything else than the translated text. Phrases like \"Translation:\", \"Translated text:\" or \"No text to translate\" are not allowed.\n\
             10. Do not trim extra spaces or newlines.\n\
             11. If the original text is already in the target language, return it unchanged.\n\
             12. Do not translate URLs, email addresses, phone numbers, or other non-text content e.g. \"https://www.google.com\" or \"john.doe@example.com\" or \"+48 123 456 789\"\n\
             13. Do not translate addresses / street names. Also try to not translate bus stops, train stations, etc.",
            original_language, translated_language
        );

        if let Some(glossary) = self.glossary_for(original_language, translated_language) {
            if !glossary.preferred_terms.is_empty() {
                prompt.push_str(&format!(
                    "\n\nPreferred translations for {} to {}:",
                    original_language, translated_language
                ));
                for (source, target) in &glossary.preferred_terms {
                    prompt.push_str(&format!("\n - \"{}\" -> \"{}\"", source, target));
                }
            }
            if !glossary.keep_untranslated.is_empty() {
                prompt.push_str("\n\nDo not translate the following proper nouns:");
                for term in &glossary.keep_untranslated {
                    prompt.push_str(&format!("\n - \"{}\"", term));
                }
            }
        }

        prompt
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate_chunk(
        &self,
        text: &str,
        original_language: &str,
        translated_language: &str,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.build_system_prompt(original_language, translated_language),
                },
                ChatMessage {
                    role: "user",
                    content: text.to_string(),
                },
            ],
        };

        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GlossaError::Service(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GlossaError::Service(format!(
                "Translation API error {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GlossaError::Service(format!("Failed to parse response: {}", e)))?;

        let content = chat_response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }
}
