use std::sync::Arc;

use crate::config::Config;
use crate::registry::ModelRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub models: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(config: Config, models: ModelRegistry) -> Self {
        Self {
            config: Arc::new(config),
            models: Arc::new(models),
        }
    }

    pub fn debug(&self) -> bool {
        self.config.debug
    }
}
