use std::sync::Arc;

use tracing::{error, info};

use crate::config::ModelConfig;
use crate::detect::lingua_identifier::LinguaIdentifier;
use crate::detect::{LanguageDetector, LanguageIdentifier};
use crate::translate::factory::TranslationFactory;
use crate::translate::{GenerationOptions, TranslationService};

/// Model handles loaded once at startup and shared read-only by every request.
///
/// A handle is `None` when its load failed; handlers answer 503 for it.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    detector: Option<LanguageDetector>,
    translator: Option<TranslationService>,
}

impl ModelRegistry {
    pub fn new(detector: Option<LanguageDetector>, translator: Option<TranslationService>) -> Self {
        Self {
            detector,
            translator,
        }
    }

    /// Load every model. Failures are logged and leave that handle empty.
    ///
    /// Blocking: call from `spawn_blocking` when on the runtime.
    pub fn load(model_config: &ModelConfig) -> Self {
        info!("Loading ML models on startup...");

        let detector = match Self::load_detector() {
            Ok(detector) => {
                info!("Language detector loaded successfully");
                Some(detector)
            }
            Err(e) => {
                error!("Failed to load language detector: {}", e);
                None
            }
        };

        let translator =
            match TranslationFactory::create_backend(model_config, GenerationOptions::default()) {
                Ok(backend) => {
                    let service = TranslationService::new(backend);
                    info!("Translation model loaded successfully ({})", service.model_name());
                    Some(service)
                }
                Err(e) => {
                    error!("Failed to load translation model: {:#}", e);
                    None
                }
            };

        Self::new(detector, translator)
    }

    fn load_detector() -> anyhow::Result<LanguageDetector> {
        // A panic here marks the detector unavailable instead of aborting startup.
        let identifier = std::panic::catch_unwind(LinguaIdentifier::new)
            .map_err(|_| anyhow::anyhow!("lingua detector construction panicked"))?;
        let identifier: Arc<dyn LanguageIdentifier> = Arc::new(identifier);
        Ok(LanguageDetector::new(identifier))
    }

    pub fn detector(&self) -> Option<&LanguageDetector> {
        self.detector.as_ref()
    }

    pub fn translator(&self) -> Option<&TranslationService> {
        self.translator.as_ref()
    }
}
