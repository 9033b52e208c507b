use tokio::sync::Mutex;

use crate::cache::PreviewCache;
use crate::chart_api::{ModelClient, PatternCatalog};
use crate::config::AppConfig;
use crate::session::Session;

pub struct AppState {
    pub config: AppConfig,
    pub catalog: PatternCatalog,
    pub groq: ModelClient,
    pub openai: Option<ModelClient>,
    pub session: Mutex<Session>,
    pub previews: PreviewCache,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: PatternCatalog) -> Self {
        let groq = ModelClient::new(config.groq.clone());
        let openai = config.openai.clone().map(ModelClient::new);
        let session = Mutex::new(Session::new(&catalog));

        Self {
            config,
            catalog,
            groq,
            openai,
            session,
            previews: PreviewCache::new(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state(pairs: &[(&str, &str)]) -> AppState {
    test_state_with_catalog(pairs, PatternCatalog::builtin().unwrap())
}

#[cfg(test)]
pub(crate) fn test_state_with_catalog(pairs: &[(&str, &str)], catalog: PatternCatalog) -> AppState {
    let vars = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = AppConfig::from_vars(&vars).unwrap();
    AppState::new(config, catalog)
}
