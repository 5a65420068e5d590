/// Translation backend interface - generation is done by a pretrained model

use thiserror::Error;

/// Decoding settings handed to the backend when it is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub num_beams: usize,
    pub early_stopping: bool,
    /// Upper bound on generated tokens.
    pub max_length: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            num_beams: 4,
            early_stopping: true,
            max_length: 200,
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("model does not support locale {0}")]
    UnsupportedLocale(String),

    #[error("generation produced no output")]
    EmptyOutput,

    #[error("{0}")]
    Inference(String),
}

/// A loaded encoder-decoder model plus tokenizer.
///
/// Calls block until generation finishes; run them off the async runtime.
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` between two locale tags (e.g. `en_XX` -> `de_DE`).
    /// The decoder is forced to start with the target language token and the
    /// returned string has special tokens stripped.
    fn generate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<String, BackendError>;

    fn model_name(&self) -> &str;
}
