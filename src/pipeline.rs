//! Chunked translation pipeline.
//!
//! Long texts are split into bounded chunks and submitted to the external
//! translator strictly sequentially, in original order — later chunks may
//! rely on terminology the model established in earlier ones, so chunks are
//! never translated in parallel. Outputs are concatenated with no separators
//! since every chunk keeps its own trailing whitespace.

use std::sync::Arc;

use tracing::info;

use crate::chunk::split_text_into_chunks;
use crate::error::{GlossaError, Result};
use crate::translate::Translator;

pub struct TranslationPipeline {
    translator: Arc<dyn Translator>,
    max_chunk_chars: usize,
}

impl TranslationPipeline {
    pub fn new(translator: Arc<dyn Translator>, max_chunk_chars: usize) -> Self {
        Self {
            translator,
            max_chunk_chars,
        }
    }

    /// Translate `text` chunk by chunk. Any chunk failure aborts the whole
    /// run; no partial translation is ever returned or stored.
    pub async fn translate(
        &self,
        text: &str,
        original_language: &str,
        translated_language: &str,
    ) -> Result<String> {
        let chunks = split_text_into_chunks(text, self.max_chunk_chars);
        if chunks.is_empty() {
            return Err(GlossaError::Service(
                "Translation failed: no text to translate".to_string(),
            ));
        }

        let total = chunks.len();
        info!("Starting translation in {} chunk(s)", total);

        let mut translated_text = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let translated_chunk = self
                .translator
                .translate_chunk(chunk, original_language, translated_language)
                .await
                .map_err(|e| GlossaError::Translation {
                    chunk: index,
                    message: e.to_string(),
                })?;
            translated_text.push_str(&translated_chunk);
            info!("Translated chunk no: {}.", index);
        }

        info!("Translated text in {} chunks.", total);
        Ok(translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Uppercases input and records the chunks it was given, in order.
    struct RecordingTranslator {
        seen: Mutex<Vec<String>>,
    }

    impl RecordingTranslator {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Translator for RecordingTranslator {
        async fn translate_chunk(
            &self,
            text: &str,
            _original_language: &str,
            _translated_language: &str,
        ) -> Result<String> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(text.to_uppercase())
        }
    }

    /// Fails on the chunk at `fail_at`, counting invocations.
    struct FailingTranslator {
        fail_at: usize,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate_chunk(
            &self,
            text: &str,
            _original_language: &str,
            _translated_language: &str,
        ) -> Result<String> {
            let mut calls = self.calls.lock().unwrap();
            let index = *calls;
            *calls += 1;
            if index == self.fail_at {
                Err(GlossaError::Service("quota exceeded".to_string()))
            } else {
                Ok(text.to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_chunks_are_translated_in_original_order() {
        let translator = Arc::new(RecordingTranslator::new());
        let pipeline = TranslationPipeline::new(translator.clone(), 12);

        let output = pipeline
            .translate("One two. Three four. Five.", "en", "fr")
            .await
            .unwrap();

        let seen = translator.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &["One two. ", "Three four. ", "Five."]);
        assert_eq!(output, "ONE TWO. THREE FOUR. FIVE.");
    }

    #[tokio::test]
    async fn test_reassembly_preserves_spacing() {
        let translator = Arc::new(RecordingTranslator::new());
        let pipeline = TranslationPipeline::new(translator, 8);

        let text = "Hi there. How are you? Fine!";
        let output = pipeline.translate(text, "en", "en").await.unwrap();
        assert_eq!(output, text.to_uppercase());
    }

    #[tokio::test]
    async fn test_chunk_failure_aborts_the_whole_run() {
        let translator = Arc::new(FailingTranslator {
            fail_at: 1,
            calls: Mutex::new(0),
        });
        let pipeline = TranslationPipeline::new(translator.clone(), 10);

        let error = pipeline
            .translate("One two. Three four. Five six.", "en", "fr")
            .await
            .unwrap_err();

        match error {
            GlossaError::Translation { chunk, message } => {
                assert_eq!(chunk, 1);
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // No chunk after the failing one was attempted
        assert_eq!(*translator.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let translator = Arc::new(RecordingTranslator::new());
        let pipeline = TranslationPipeline::new(translator, 10);
        assert!(pipeline.translate("", "en", "fr").await.is_err());
    }
}
