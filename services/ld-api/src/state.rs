//! Application state for the linked-data API.

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use profile_negotiation::{NegotiationEngine, RenderDispatcher};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::entity::{CatalogStore, Entity, EntityStore};
use crate::serializers::build_dispatcher;

/// Shared application state.
pub struct AppState {
    /// Negotiation engine over the profile registry.
    pub engine: NegotiationEngine,

    /// Serializers for every implemented (kind, profile, media type).
    pub dispatcher: RenderDispatcher<Entity>,

    /// Where items are fetched from.
    pub store: Arc<dyn EntityStore>,

    pub config: ApiConfig,

    /// Base URL for building links.
    pub base_url: String,

    /// Prometheus recorder handle, when metrics are installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from loaded configuration and an entity store.
    ///
    /// Fails if the configured profiles violate the registry invariants.
    pub fn new(config: ApiConfig, store: Arc<dyn EntityStore>, base_url: impl Into<String>) -> Result<Self> {
        let registry = config.build_registry()?;
        let dispatcher = build_dispatcher(&registry);

        for (kind, token, media_type) in dispatcher.unimplemented_pairs(&registry) {
            warn!(
                resource_kind = %kind,
                profile = %token,
                media_type = %media_type,
                "Profile declares a media type with no serializer"
            );
        }

        for collection in &config.collections.collections {
            if !registry.contains(&collection.resource_kind) {
                warn!(
                    collection = %collection.id,
                    resource_kind = %collection.resource_kind,
                    "Collection resource kind has no registered profiles"
                );
            }
        }

        info!(
            resource_kinds = registry.len(),
            serializers = dispatcher.len(),
            "Profile registry ready"
        );

        Ok(Self {
            engine: NegotiationEngine::new(Arc::new(registry)),
            dispatcher,
            store,
            config,
            base_url: base_url.into(),
            metrics: None,
        })
    }

    /// Load configuration and collection data from a config directory.
    pub fn load(config_dir: &str, base_url: impl Into<String>) -> Result<Self> {
        let config = ApiConfig::load_from_dir(config_dir)?;
        let store = CatalogStore::load(&config)?;
        info!(items = store.len(), "Entity store loaded");
        Self::new(config, Arc::new(store), base_url)
    }

    /// Attach the Prometheus handle rendered by `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
