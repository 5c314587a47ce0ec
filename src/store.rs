//! Persistence boundary.
//!
//! The engine never owns a database; it talks to whatever store the host
//! application provides through [`TranslationStore`]. The store enforces the
//! final correctness guarantee — uniqueness of (fingerprint, translated
//! language) — independent of in-process coordination, which covers separate
//! processes racing on the same fingerprint. [`MemoryStore`] is the
//! reference in-process implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{GlossaError, Result};
use crate::model::{TranslationRecord, UrlMapping};

#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// Look up a stored translation by its identity pair.
    async fn find_translation(
        &self,
        fingerprint: &str,
        translated_language: &str,
    ) -> Result<Option<TranslationRecord>>;

    /// Insert a new translation. Fails with `Conflict` when a record with
    /// the same (fingerprint, translated_language) already exists.
    async fn insert_translation(&self, record: TranslationRecord) -> Result<()>;

    /// Mark a translation approved. Approval is monotonic: there is no
    /// operation that resets it.
    async fn approve_translation(
        &self,
        fingerprint: &str,
        translated_language: &str,
    ) -> Result<TranslationRecord>;

    /// Remove a stored translation.
    async fn delete_translation(
        &self,
        fingerprint: &str,
        translated_language: &str,
    ) -> Result<()>;

    /// All translations into one target language.
    async fn translations_for_language(
        &self,
        translated_language: &str,
    ) -> Result<Vec<TranslationRecord>>;

    /// All translations of one source text, across target languages.
    async fn translations_for_text(&self, fingerprint: &str) -> Result<Vec<TranslationRecord>>;

    /// URL mappings scoped to one language pair.
    async fn url_mappings(
        &self,
        original_language: &str,
        translated_language: &str,
    ) -> Result<Vec<UrlMapping>>;

    /// Insert a URL mapping. Fails with `Conflict` when a mapping with the
    /// same (source_url, original_language, translated_language) exists.
    async fn insert_url_mapping(&self, mapping: UrlMapping) -> Result<()>;
}

type TranslationKey = (String, String);
type UrlMappingKey = (String, String, String);

/// In-memory store with the same uniqueness semantics as the relational
/// collaborator. Used as the embedded default and throughout the tests.
#[derive(Default)]
pub struct MemoryStore {
    translations: RwLock<HashMap<TranslationKey, TranslationRecord>>,
    url_mappings: RwLock<HashMap<UrlMappingKey, UrlMapping>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn find_translation(
        &self,
        fingerprint: &str,
        translated_language: &str,
    ) -> Result<Option<TranslationRecord>> {
        let translations = self.translations.read().await;
        Ok(translations
            .get(&(fingerprint.to_string(), translated_language.to_string()))
            .cloned())
    }

    async fn insert_translation(&self, record: TranslationRecord) -> Result<()> {
        let mut translations = self.translations.write().await;
        let key = (
            record.fingerprint.clone(),
            record.translated_language.clone(),
        );
        if translations.contains_key(&key) {
            return Err(GlossaError::Conflict(format!(
                "Translation already exists for fingerprint {} into {}",
                record.fingerprint, record.translated_language
            )));
        }
        translations.insert(key, record);
        Ok(())
    }

    async fn approve_translation(
        &self,
        fingerprint: &str,
        translated_language: &str,
    ) -> Result<TranslationRecord> {
        let mut translations = self.translations.write().await;
        let key = (fingerprint.to_string(), translated_language.to_string());
        let record = translations.get_mut(&key).ok_or_else(|| {
            GlossaError::Store(format!(
                "No translation for fingerprint {} into {}",
                fingerprint, translated_language
            ))
        })?;
        record.is_approved = true;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_translation(
        &self,
        fingerprint: &str,
        translated_language: &str,
    ) -> Result<()> {
        let mut translations = self.translations.write().await;
        let key = (fingerprint.to_string(), translated_language.to_string());
        translations.remove(&key).ok_or_else(|| {
            GlossaError::Store(format!(
                "No translation for fingerprint {} into {}",
                fingerprint, translated_language
            ))
        })?;
        Ok(())
    }

    async fn translations_for_language(
        &self,
        translated_language: &str,
    ) -> Result<Vec<TranslationRecord>> {
        let translations = self.translations.read().await;
        Ok(translations
            .values()
            .filter(|r| r.translated_language == translated_language)
            .cloned()
            .collect())
    }

    async fn translations_for_text(&self, fingerprint: &str) -> Result<Vec<TranslationRecord>> {
        let translations = self.translations.read().await;
        Ok(translations
            .values()
            .filter(|r| r.fingerprint == fingerprint)
            .cloned()
            .collect())
    }

    async fn url_mappings(
        &self,
        original_language: &str,
        translated_language: &str,
    ) -> Result<Vec<UrlMapping>> {
        let url_mappings = self.url_mappings.read().await;
        Ok(url_mappings
            .values()
            .filter(|m| {
                m.original_language == original_language
                    && m.translated_language == translated_language
            })
            .cloned()
            .collect())
    }

    async fn insert_url_mapping(&self, mapping: UrlMapping) -> Result<()> {
        let mut url_mappings = self.url_mappings.write().await;
        let key = (
            mapping.source_url.clone(),
            mapping.original_language.clone(),
            mapping.translated_language.clone(),
        );
        if url_mappings.contains_key(&key) {
            return Err(GlossaError::Conflict(format!(
                "URL mapping already exists for {} ({} -> {})",
                mapping.source_url, mapping.original_language, mapping.translated_language
            )));
        }
        url_mappings.insert(key, mapping);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fingerprint: &str, language: &str) -> TranslationRecord {
        TranslationRecord::new(
            fingerprint.to_string(),
            "Hello".to_string(),
            "Bonjour".to_string(),
            "en".to_string(),
            language.to_string(),
        )
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryStore::new();
        store.insert_translation(record("f1", "fr")).await.unwrap();

        let found = store.find_translation("f1", "fr").await.unwrap().unwrap();
        assert_eq!(found.translated_text, "Bonjour");
        assert!(store.find_translation("f1", "de").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = MemoryStore::new();
        store.insert_translation(record("f1", "fr")).await.unwrap();
        let error = store.insert_translation(record("f1", "fr")).await.unwrap_err();
        assert!(matches!(error, GlossaError::Conflict(_)));

        // Same fingerprint, different target language is a distinct record
        store.insert_translation(record("f1", "de")).await.unwrap();
    }

    #[tokio::test]
    async fn test_approval_is_monotonic() {
        let store = MemoryStore::new();
        store.insert_translation(record("f1", "fr")).await.unwrap();

        let approved = store.approve_translation("f1", "fr").await.unwrap();
        assert!(approved.is_approved);
        assert!(approved.updated_at >= approved.created_at);

        // Approving again keeps it approved
        let again = store.approve_translation("f1", "fr").await.unwrap();
        assert!(again.is_approved);
    }

    #[tokio::test]
    async fn test_listing_by_language_and_text() {
        let store = MemoryStore::new();
        store.insert_translation(record("f1", "fr")).await.unwrap();
        store.insert_translation(record("f1", "de")).await.unwrap();
        store.insert_translation(record("f2", "fr")).await.unwrap();

        assert_eq!(
            store.translations_for_language("fr").await.unwrap().len(),
            2
        );
        assert_eq!(store.translations_for_text("f1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_url_mappings_are_scoped_to_the_pair() {
        let store = MemoryStore::new();
        store
            .insert_url_mapping(UrlMapping::new(
                "https://x.com/a".into(),
                "https://x.com/b".into(),
                "en".into(),
                "fr".into(),
            ))
            .await
            .unwrap();
        store
            .insert_url_mapping(UrlMapping::new(
                "https://x.com/a".into(),
                "https://x.com/c".into(),
                "en".into(),
                "de".into(),
            ))
            .await
            .unwrap();

        let fr = store.url_mappings("en", "fr").await.unwrap();
        assert_eq!(fr.len(), 1);
        assert_eq!(fr[0].target_url, "https://x.com/b");
        assert!(store.url_mappings("fr", "en").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_url_mapping_conflicts() {
        let store = MemoryStore::new();
        let mapping = UrlMapping::new(
            "https://x.com/a".into(),
            "https://x.com/b".into(),
            "en".into(),
            "fr".into(),
        );
        store.insert_url_mapping(mapping.clone()).await.unwrap();
        let error = store.insert_url_mapping(mapping).await.unwrap_err();
        assert!(matches!(error, GlossaError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_translation() {
        let store = MemoryStore::new();
        store.insert_translation(record("f1", "fr")).await.unwrap();
        store.delete_translation("f1", "fr").await.unwrap();
        assert!(store.find_translation("f1", "fr").await.unwrap().is_none());
        assert!(store.delete_translation("f1", "fr").await.is_err());
    }
}
