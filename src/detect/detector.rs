use std::sync::Arc;

use tracing::{error, info};

use super::interface::LanguageIdentifier;
use super::names::{self, LANGUAGE_NAMES};
use crate::error::ServiceError;

const MIN_TEXT_CHARS: usize = 3;

/// Best guess for the language of a text.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub code: String,
    pub name: String,
    /// Probability the identifier gave its top guess.
    pub confidence: f64,
}

/// Validates input and picks the top-ranked language from an identifier.
#[derive(Clone)]
pub struct LanguageDetector {
    identifier: Arc<dyn LanguageIdentifier>,
}

impl LanguageDetector {
    pub fn new(identifier: Arc<dyn LanguageIdentifier>) -> Self {
        info!("Initializing LanguageDetector ({})", identifier.name());
        Self { identifier }
    }

    pub fn detect(&self, text: &str) -> Result<Detection, ServiceError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::validation("text", "Text cannot be empty"));
        }
        if trimmed.chars().count() < MIN_TEXT_CHARS {
            return Err(ServiceError::validation(
                "text",
                "Text must be at least 3 characters long",
            ));
        }

        let guesses = self.identifier.rank(text).map_err(|e| {
            error!("Language detection error: {}", e);
            ServiceError::Detection(e.to_string())
        })?;

        let top = guesses
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Detection("Unable to detect language".to_string()))?;

        let confidence = top.probability.clamp(0.0, 1.0);
        let name = names::language_name(&top.code);
        info!(
            "Detected language: {} ({}) with confidence {:.2}",
            top.code, name, confidence
        );

        Ok(Detection {
            code: top.code,
            name,
            confidence,
        })
    }

    pub fn supported_languages() -> Vec<(&'static str, &'static str)> {
        LANGUAGE_NAMES.to_vec()
    }

    pub fn language_name(code: &str) -> String {
        names::language_name(code)
    }
}
