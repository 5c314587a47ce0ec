use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GlossaError, Result};

/// A memoized translation, identified by (fingerprint, translated_language).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// SHA-256 hex digest of the exact bytes of `original_text`
    pub fingerprint: String,
    pub original_text: String,
    pub translated_text: String,
    pub original_language: String,
    pub translated_language: String,
    /// Starts false; set true only by the approve operation, never reset
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslationRecord {
    pub fn new(
        fingerprint: String,
        original_text: String,
        translated_text: String,
        original_language: String,
        translated_language: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            fingerprint,
            original_text,
            translated_text,
            original_language,
            translated_language,
            is_approved: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A learned URL rewrite, scoped to one language pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlMapping {
    pub source_url: String,
    pub target_url: String,
    pub original_language: String,
    pub translated_language: String,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    pub fn new(
        source_url: String,
        target_url: String,
        original_language: String,
        translated_language: String,
    ) -> Self {
        Self {
            source_url,
            target_url,
            original_language,
            translated_language,
            created_at: Utc::now(),
        }
    }
}

/// Validate an ISO 639-1 language code: exactly two ASCII letters, lowercase.
pub fn validate_language_code(code: &str) -> Result<()> {
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase()) {
        Ok(())
    } else {
        Err(GlossaError::InvalidInput(format!(
            "Invalid language code: '{}' (expected two lowercase ASCII letters)",
            code
        )))
    }
}

/// Validate a translation request before any external call is made.
pub fn validate_request(text: &str, original_language: &str, translated_language: &str) -> Result<()> {
    if text.is_empty() {
        return Err(GlossaError::InvalidInput(
            "Original text must not be empty".to_string(),
        ));
    }
    validate_language_code(original_language)?;
    validate_language_code(translated_language)?;
    Ok(())
}
