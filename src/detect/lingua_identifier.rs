//! Lingua-backed language identifier
//!
//! Lingua scores text against n-gram models of every language it knows and
//! returns a probability per language, much like a ranked `detect_langs`.

use lingua::{LanguageDetector as LinguaDetector, LanguageDetectorBuilder};

use super::interface::{IdentifierError, LanguageGuess, LanguageIdentifier};

pub struct LinguaIdentifier {
    detector: LinguaDetector,
}

impl LinguaIdentifier {
    /// Build a detector over all languages with the models loaded up front,
    /// so the first request does not pay for lazy loading.
    pub fn new() -> Self {
        tracing::info!("Initializing Lingua language identifier");
        let detector = LanguageDetectorBuilder::from_all_languages()
            .with_preloaded_language_models()
            .build();
        Self { detector }
    }
}

impl Default for LinguaIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageIdentifier for LinguaIdentifier {
    fn rank(&self, text: &str) -> Result<Vec<LanguageGuess>, IdentifierError> {
        // Lingua reports every language; zero scores mean "no evidence".
        let guesses = self
            .detector
            .compute_language_confidence_values(text)
            .into_iter()
            .filter(|(_, probability)| *probability > 0.0)
            .map(|(language, probability)| LanguageGuess {
                code: language.iso_code_639_1().to_string(),
                probability,
            })
            .collect();
        Ok(guesses)
    }

    fn name(&self) -> &str {
        "lingua"
    }
}
