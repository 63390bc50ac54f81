use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::Cache;
use crate::config::{self, Config, MSG_API_KEY_MISSING};
use crate::error::{AppError, AppResult};
use crate::services::catalog::{CatalogProvider, OmdbCatalog};
use crate::services::pairing::{PairingResolver, RemotePairingResolver, TablePairingResolver};
use crate::services::workflow::SessionMap;

/// Shared application state
///
/// Sessions are strictly session-scoped; the catalog client (and the search
/// cache inside it) is the only state shared across sessions.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionMap,
    catalog: Option<Arc<dyn CatalogProvider>>,
    resolver: Arc<dyn PairingResolver>,
}

impl AppState {
    pub fn new(
        catalog: Option<Arc<dyn CatalogProvider>>,
        resolver: Arc<dyn PairingResolver>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            catalog,
            resolver,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let catalog = match config::resolve_omdb_api_key(&config.secrets_path) {
            Some(api_key) => Some(Arc::new(OmdbCatalog::new(
                Cache::new(),
                api_key,
                config.omdb_api_url.clone(),
                config.search_cache_ttl_secs,
            )) as Arc<dyn CatalogProvider>),
            None => {
                // Startup proceeds; every search reports the missing key
                tracing::warn!("OMDb API key not configured, searches will fail until one is set");
                None
            }
        };

        let resolver: Arc<dyn PairingResolver> = match &config.pairing_service_url {
            Some(url) => {
                tracing::info!(url = %url, "Using external pairing service with local table fallback");
                Arc::new(RemotePairingResolver::new(url.clone()))
            }
            None => Arc::new(TablePairingResolver),
        };

        Self::new(catalog, resolver)
    }

    /// The configured catalog client, or the configuration error surfaced to
    /// the user before any search is attempted.
    pub fn catalog(&self) -> AppResult<&Arc<dyn CatalogProvider>> {
        self.catalog
            .as_ref()
            .ok_or_else(|| AppError::Config(MSG_API_KEY_MISSING.to_string()))
    }

    pub fn resolver(&self) -> &Arc<dyn PairingResolver> {
        &self.resolver
    }
}
