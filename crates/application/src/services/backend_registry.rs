use ferrous_ptr_domain::{BackendKind, BackendOutcome};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::ports::PtrBackend;

/// Maps each `BackendKind` to the adapter that serves it and bounds every
/// lookup with a timeout.
pub struct BackendRegistry {
    persistent_store: Option<Arc<dyn PtrBackend>>,
    dynamic_discovery: Option<Arc<dyn PtrBackend>>,
    timeout: Duration,
}

impl BackendRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            persistent_store: None,
            dynamic_discovery: None,
            timeout,
        }
    }

    pub fn with_persistent_store(mut self, backend: Arc<dyn PtrBackend>) -> Self {
        self.persistent_store = Some(backend);
        self
    }

    pub fn with_dynamic_discovery(mut self, backend: Arc<dyn PtrBackend>) -> Self {
        self.dynamic_discovery = Some(backend);
        self
    }

    pub fn has_adapter(&self, kind: &BackendKind) -> bool {
        match kind {
            BackendKind::Hardcoded(_) => true,
            BackendKind::PersistentStore => self.persistent_store.is_some(),
            BackendKind::DynamicDiscovery => self.dynamic_discovery.is_some(),
        }
    }

    pub async fn resolve(&self, kind: &BackendKind, ip: IpAddr) -> BackendOutcome {
        let adapter = match kind {
            BackendKind::Hardcoded(name) => return BackendOutcome::Found(Arc::clone(name)),
            BackendKind::PersistentStore => self.persistent_store.as_ref(),
            BackendKind::DynamicDiscovery => self.dynamic_discovery.as_ref(),
        };

        let Some(adapter) = adapter else {
            return BackendOutcome::Unavailable(format!("{} is not configured", kind));
        };

        match tokio::time::timeout(self.timeout, adapter.lookup(ip)).await {
            Ok(Ok(Some(name))) => BackendOutcome::Found(name),
            Ok(Ok(None)) => BackendOutcome::Empty,
            Ok(Err(e)) => BackendOutcome::Unavailable(e.to_string()),
            Err(_) => BackendOutcome::Unavailable(format!(
                "timed out after {}ms",
                self.timeout.as_millis()
            )),
        }
    }
}
