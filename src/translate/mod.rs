pub mod factory;
pub mod interface;
pub mod languages;
#[cfg(feature = "m2m100")]
pub mod m2m100;
pub mod service;

pub use interface::{BackendError, GenerationOptions, TranslationBackend};
pub use service::TranslationService;
