use ferrous_ptr_domain::{
    BackendOutcome, PolicyGroup, PrecedenceMode, Resolution, ResolutionSource, SubnetRule,
};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::services::BackendRegistry;

/// Runs a matched rule's backend chain in the rule's precedence mode.
pub struct ResolvePtrUseCase {
    registry: Arc<BackendRegistry>,
}

impl ResolvePtrUseCase {
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self { registry }
    }

    #[instrument(skip(self, rule, group), fields(rule = %rule))]
    pub async fn execute(&self, ip: IpAddr, rule: &SubnetRule, group: &PolicyGroup) -> Resolution {
        if rule.mode == PrecedenceMode::DefaultFirst {
            if let Some(name) = &rule.default_name {
                return Resolution::resolved(Arc::clone(name), ResolutionSource::RuleDefault);
            }
        }

        for kind in &group.backends {
            match self.registry.resolve(kind, ip).await {
                BackendOutcome::Found(name) => {
                    debug!(backend = %kind, name = %name, "Backend resolved address");
                    return Resolution::resolved(name, ResolutionSource::Backend(kind.clone()));
                }
                BackendOutcome::Empty => {
                    debug!(backend = %kind, "Backend has no entry");
                }
                BackendOutcome::Unavailable(reason) => {
                    warn!(backend = %kind, address = %ip, reason = %reason, "Backend unavailable");
                }
            }
        }

        match &rule.default_name {
            Some(name) => Resolution::resolved(Arc::clone(name), ResolutionSource::RuleDefault),
            None => Resolution::NoAnswer,
        }
    }
}
