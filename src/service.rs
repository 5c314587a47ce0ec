//! Translation orchestration.
//!
//! Ties the pieces together: fingerprint the source text, deduplicate
//! concurrent identical requests through the bundler, serve stored records
//! when present, otherwise run the chunked pipeline exactly once on behalf
//! of all waiters, persist the result, and apply learned URL rewrites to
//! the response. The stored translated text stays raw; URL substitution is
//! applied at response time so newly learned mappings reach old records.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::bundler::RequestBundler;
use crate::error::{GlossaError, Result};
use crate::fingerprint::fingerprint;
use crate::model::{validate_language_code, validate_request, TranslationRecord, UrlMapping};
use crate::pipeline::TranslationPipeline;
use crate::store::TranslationStore;
use crate::translate::Translator;
use crate::url_rewrite::rewrite_urls;

pub struct TranslationService {
    store: Arc<dyn TranslationStore>,
    pipeline: Arc<TranslationPipeline>,
    bundler: RequestBundler<TranslationRecord>,
}

async fn apply_url_mappings(
    store: &dyn TranslationStore,
    mut record: TranslationRecord,
) -> Result<TranslationRecord> {
    let mappings = store
        .url_mappings(&record.original_language, &record.translated_language)
        .await?;
    record.translated_text = rewrite_urls(&record.translated_text, &mappings);
    Ok(record)
}

impl TranslationService {
    pub fn new(
        store: Arc<dyn TranslationStore>,
        translator: Arc<dyn Translator>,
        max_chunk_chars: usize,
    ) -> Self {
        Self {
            store,
            pipeline: Arc::new(TranslationPipeline::new(translator, max_chunk_chars)),
            bundler: RequestBundler::new(),
        }
    }

    /// Translate `original_text`, serving a stored record when one exists.
    ///
    /// Concurrent calls for the same (text, target language) share a single
    /// pipeline run and all receive the identical record. The returned
    /// record has URL mappings applied; the stored copy does not.
    pub async fn request_translation(
        &self,
        original_text: &str,
        original_language: &str,
        translated_language: &str,
    ) -> Result<TranslationRecord> {
        validate_request(original_text, original_language, translated_language)?;

        let fingerprint = fingerprint(original_text);
        let key = format!("{}-{}", fingerprint, translated_language);

        let store = Arc::clone(&self.store);
        let pipeline = Arc::clone(&self.pipeline);
        let text = original_text.to_string();
        let source = original_language.to_string();
        let target = translated_language.to_string();

        self.bundler
            .run(&key, async move {
                if let Some(existing) = store.find_translation(&fingerprint, &target).await? {
                    debug!("Found stored translation for {} into {}", fingerprint, target);
                    return apply_url_mappings(store.as_ref(), existing).await;
                }

                info!("Starting translation.");
                let translated_text = pipeline.translate(&text, &source, &target).await?;

                let record = TranslationRecord::new(
                    fingerprint.clone(),
                    text,
                    translated_text,
                    source,
                    target.clone(),
                );

                let record = match store.insert_translation(record.clone()).await {
                    Ok(()) => record,
                    Err(GlossaError::Conflict(_)) => {
                        // Another process inserted first; its record wins
                        warn!(
                            "Insert raced for {} into {}, returning the stored record",
                            fingerprint, target
                        );
                        store
                            .find_translation(&fingerprint, &target)
                            .await?
                            .ok_or_else(|| {
                                GlossaError::Store(
                                    "Translation disappeared after insert conflict".to_string(),
                                )
                            })?
                    }
                    Err(other) => return Err(other),
                };

                apply_url_mappings(store.as_ref(), record).await
            })
            .await
    }

    /// Store a human-provided translation. Fails with `Conflict` when the
    /// pair already exists.
    pub async fn create_manual(
        &self,
        original_text: &str,
        translated_text: &str,
        original_language: &str,
        translated_language: &str,
    ) -> Result<TranslationRecord> {
        validate_request(original_text, original_language, translated_language)?;
        if translated_text.is_empty() {
            return Err(GlossaError::InvalidInput(
                "Translated text must not be empty".to_string(),
            ));
        }

        let record = TranslationRecord::new(
            fingerprint(original_text),
            original_text.to_string(),
            translated_text.to_string(),
            original_language.to_string(),
            translated_language.to_string(),
        );
        self.store.insert_translation(record.clone()).await?;
        Ok(record)
    }

    /// Correct a stored translation: replace its texts and re-fingerprint.
    ///
    /// When the corrected source text already has a stored translation into
    /// the same target language, that record wins and is returned with the
    /// located record left untouched. A correction that changes the source
    /// text produces a new identity and starts unapproved; a correction of
    /// the translated text alone keeps the identity, so approval stays
    /// monotonic.
    pub async fn update(
        &self,
        fingerprint_key: &str,
        translated_language: &str,
        original_text: &str,
        translated_text: &str,
        original_language: &str,
    ) -> Result<TranslationRecord> {
        validate_request(original_text, original_language, translated_language)?;
        if translated_text.is_empty() {
            return Err(GlossaError::InvalidInput(
                "Translated text must not be empty".to_string(),
            ));
        }

        let existing = self
            .store
            .find_translation(fingerprint_key, translated_language)
            .await?
            .ok_or_else(|| {
                GlossaError::Store(format!(
                    "No translation for fingerprint {} into {}",
                    fingerprint_key, translated_language
                ))
            })?;

        let new_fingerprint = fingerprint(original_text);
        let identity_unchanged = new_fingerprint == existing.fingerprint;

        if !identity_unchanged {
            if let Some(already) = self
                .store
                .find_translation(&new_fingerprint, translated_language)
                .await?
            {
                return Ok(already);
            }
        }

        let record = TranslationRecord {
            fingerprint: new_fingerprint,
            original_text: original_text.to_string(),
            translated_text: translated_text.to_string(),
            original_language: original_language.to_string(),
            translated_language: translated_language.to_string(),
            is_approved: identity_unchanged && existing.is_approved,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.store
            .delete_translation(fingerprint_key, translated_language)
            .await?;
        self.store.insert_translation(record.clone()).await?;
        Ok(record)
    }

    pub async fn find(
        &self,
        fingerprint: &str,
        translated_language: &str,
    ) -> Result<Option<TranslationRecord>> {
        self.store
            .find_translation(fingerprint, translated_language)
            .await
    }

    /// Approve a stored translation. Approval never reverts.
    pub async fn approve(
        &self,
        fingerprint: &str,
        translated_language: &str,
    ) -> Result<TranslationRecord> {
        self.store
            .approve_translation(fingerprint, translated_language)
            .await
    }

    pub async fn delete(&self, fingerprint: &str, translated_language: &str) -> Result<()> {
        self.store
            .delete_translation(fingerprint, translated_language)
            .await
    }

    pub async fn translations_for_language(
        &self,
        translated_language: &str,
    ) -> Result<Vec<TranslationRecord>> {
        self.store
            .translations_for_language(translated_language)
            .await
    }

    pub async fn translations_for_text(
        &self,
        fingerprint: &str,
    ) -> Result<Vec<TranslationRecord>> {
        self.store.translations_for_text(fingerprint).await
    }

    /// Register a learned URL rewrite for one language pair.
    pub async fn add_url_mapping(
        &self,
        source_url: &str,
        target_url: &str,
        original_language: &str,
        translated_language: &str,
    ) -> Result<UrlMapping> {
        validate_language_code(original_language)?;
        validate_language_code(translated_language)?;
        if source_url.is_empty() || target_url.is_empty() {
            return Err(GlossaError::InvalidInput(
                "URL mapping requires non-empty source and target URLs".to_string(),
            ));
        }

        let mapping = UrlMapping::new(
            source_url.to_string(),
            target_url.to_string(),
            original_language.to_string(),
            translated_language.to_string(),
        );
        self.store.insert_url_mapping(mapping.clone()).await?;
        Ok(mapping)
    }
}
