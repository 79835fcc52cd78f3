use super::Backends;
use arc_swap::ArcSwap;
use ferrous_ptr_application::ports::UpstreamForwarder;
use ferrous_ptr_application::use_cases::{
    HandlePtrQueryUseCase, ResolvePtrUseCase, SynthesizePtrUseCase,
};
use ferrous_ptr_domain::{Config, PolicyTable};
use ferrous_ptr_infrastructure::dns::{PtrServerHandler, UpstreamRelay};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DnsServices {
    pub policy: Arc<ArcSwap<PolicyTable>>,
    pub handler: PtrServerHandler,
}

impl DnsServices {
    pub fn new(config: &Config, backends: &Backends) -> anyhow::Result<Self> {
        let table = config.policy_table()?;
        info!(
            groups = table.groups().len(),
            rules = table.rule_count(),
            "Policy table loaded"
        );
        let policy = Arc::new(ArcSwap::from_pointee(table));

        let handler_use_case = Arc::new(HandlePtrQueryUseCase::new(
            policy.clone(),
            ResolvePtrUseCase::new(backends.registry.clone()),
            SynthesizePtrUseCase::new(config.synthesis.static_ttl, config.synthesis.dynamic_ttl),
        ));

        let upstream = Self::build_upstream(config)?;
        let handler = PtrServerHandler::new(handler_use_case, upstream);

        Ok(Self { policy, handler })
    }

    fn build_upstream(config: &Config) -> anyhow::Result<Arc<dyn UpstreamForwarder>> {
        let protocol = config.upstream_protocol()?;
        let relay = UpstreamRelay::new(
            protocol,
            Duration::from_millis(config.upstream.timeout_ms),
            config.upstream.max_idle_connections,
        );

        info!(
            upstream = %relay.server_name(),
            timeout_ms = config.upstream.timeout_ms,
            max_idle = config.upstream.max_idle_connections,
            "Upstream relay configured"
        );

        Ok(Arc::new(relay))
    }
}
