use std::sync::Arc;

use tracing::{error, info, warn};

use super::interface::TranslationBackend;
use super::languages::{self, LOCALE_TAGS};
use crate::error::ServiceError;

const MAX_TEXT_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub text: String,
    /// Length-ratio heuristic, see [`length_confidence`]. Not a model probability.
    pub confidence: f64,
}

/// Validates translation requests and runs them through the loaded backend.
#[derive(Clone)]
pub struct TranslationService {
    backend: Arc<dyn TranslationBackend>,
}

impl TranslationService {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self { backend }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    pub fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Translation, ServiceError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::validation("text", "Text cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TEXT_CHARS {
            return Err(ServiceError::validation(
                "text",
                format!("Text exceeds maximum length of {} characters", MAX_TEXT_CHARS),
            ));
        }

        let source_tag = languages::locale_tag(source_language).ok_or_else(|| {
            ServiceError::validation(
                "source_language",
                format!("Unsupported source language: {}", source_language),
            )
        })?;
        let target_tag = languages::locale_tag(target_language).ok_or_else(|| {
            ServiceError::validation(
                "target_language",
                format!("Unsupported target language: {}", target_language),
            )
        })?;

        if source_language == target_language {
            warn!("Source and target languages are the same");
            return Ok(Translation {
                text: text.to_string(),
                confidence: 1.0,
            });
        }

        let translated = self
            .backend
            .generate(text, source_tag, target_tag)
            .map_err(|e| {
                error!("Translation error: {}", e);
                ServiceError::Translation(e.to_string())
            })?;

        let confidence = length_confidence(text, &translated);
        info!("Translated from {} to {}", source_language, target_language);

        Ok(Translation {
            text: translated,
            confidence,
        })
    }

    pub fn supported_languages() -> Vec<&'static str> {
        LOCALE_TAGS.iter().map(|(code, _)| *code).collect()
    }

    pub fn language_name(code: &str) -> String {
        languages::language_name(code)
    }
}

/// `min(0.95, 0.7 + 0.25 * chars(translated) / chars(original))`.
///
/// A presentational score that grows with output length; it says nothing
/// about translation quality.
pub fn length_confidence(original: &str, translated: &str) -> f64 {
    let original_len = original.chars().count() as f64;
    let translated_len = translated.chars().count() as f64;
    (0.7 + translated_len / original_len * 0.25).min(0.95)
}
