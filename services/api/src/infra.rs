use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use depot_lifecycle::error::AppError;
use depot_lifecycle::lifecycle::{seed, DepotLifecycleService, InMemoryDepotStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Lifecycle service over a fresh in-memory store, optionally seeded with the example graph.
pub(crate) fn lifecycle_service(
    seed_fixtures: bool,
) -> Result<Arc<DepotLifecycleService<InMemoryDepotStore>>, AppError> {
    let service = DepotLifecycleService::new(Arc::new(InMemoryDepotStore::new()));
    if seed_fixtures {
        let outcome = seed(&service)?;
        info!(
            parties = outcome.parties,
            releases = outcome.releases,
            redeliveries = outcome.redeliveries,
            "example fixtures loaded"
        );
    }
    Ok(Arc::new(service))
}
