use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use super::interface::{GenerationOptions, TranslationBackend};
use crate::config::ModelConfig;

/// Factory for the translation backend compiled into this binary
pub struct TranslationFactory;

impl TranslationFactory {
    /// Load the pretrained translation model described by `model_config`.
    ///
    /// Blocks while weights are fetched and loaded.
    pub fn create_backend(
        model_config: &ModelConfig,
        options: GenerationOptions,
    ) -> Result<Arc<dyn TranslationBackend>> {
        info!(
            "Initializing translation backend: {} (beams={}, max_length={})",
            model_config.translation_model, options.num_beams, options.max_length
        );

        #[cfg(feature = "m2m100")]
        {
            let backend = super::m2m100::M2M100Backend::load(model_config, options)?;
            Ok(Arc::new(backend))
        }

        #[cfg(not(feature = "m2m100"))]
        {
            anyhow::bail!(
                "no translation backend compiled in; rebuild with `--features m2m100` to load {}",
                model_config.translation_model
            )
        }
    }
}

#[cfg(all(test, not(feature = "m2m100")))]
mod tests {
    use super::*;

    #[test]
    fn reports_missing_backend() {
        let err = TranslationFactory::create_backend(&ModelConfig::default(), GenerationOptions::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("m2m100"));
    }
}
