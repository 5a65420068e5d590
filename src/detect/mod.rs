pub mod detector;
pub mod interface;
pub mod lingua_identifier;
pub mod names;

pub use detector::LanguageDetector;
pub use interface::{IdentifierError, LanguageGuess, LanguageIdentifier};
