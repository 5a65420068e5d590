/// Language identification interface - the statistics live in the backing library

use thiserror::Error;

/// One candidate language with the probability the identifier assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageGuess {
    pub code: String,
    pub probability: f64,
}

#[derive(Debug, Error)]
pub enum IdentifierError {
    #[error("{0}")]
    Failed(String),
}

/// Ranks the languages a piece of text may be written in.
pub trait LanguageIdentifier: Send + Sync {
    /// Candidates ordered from most to least probable. May be empty.
    fn rank(&self, text: &str) -> Result<Vec<LanguageGuess>, IdentifierError>;

    fn name(&self) -> &str;
}
