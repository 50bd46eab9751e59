use std::sync::Arc;

use crate::cameras::CameraRegistry;
use crate::config::Config;
use crate::observability::Metrics;
use crate::snapshot::SnapshotFetcher;
use crate::storage::PathResolver;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<CameraRegistry>,
    pub resolver: Arc<PathResolver>,
    pub fetcher: Arc<dyn SnapshotFetcher>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: CameraRegistry,
        fetcher: Arc<dyn SnapshotFetcher>,
    ) -> Self {
        let registry = Arc::new(registry);
        let resolver = PathResolver::new(config.storage.output_root.clone(), registry.clone());

        Self {
            config: Arc::new(config),
            registry,
            resolver: Arc::new(resolver),
            fetcher,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
