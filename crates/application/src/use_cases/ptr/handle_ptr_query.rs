use arc_swap::ArcSwap;
use ferrous_ptr_domain::{PolicyTable, PtrQuery, ReverseLookupError, ReverseName, Synthesis};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{ResolvePtrUseCase, SynthesizePtrUseCase};

/// Full decision for one inbound question: answer it locally or let the
/// relay forward it.
pub struct HandlePtrQueryUseCase {
    policy: Arc<ArcSwap<PolicyTable>>,
    resolver: ResolvePtrUseCase,
    synthesizer: SynthesizePtrUseCase,
}

impl HandlePtrQueryUseCase {
    pub fn new(
        policy: Arc<ArcSwap<PolicyTable>>,
        resolver: ResolvePtrUseCase,
        synthesizer: SynthesizePtrUseCase,
    ) -> Self {
        Self {
            policy,
            resolver,
            synthesizer,
        }
    }

    #[instrument(skip(self, query), fields(name = %query.name, client = %query.client_ip))]
    pub async fn execute(&self, query: &PtrQuery) -> Synthesis {
        let ip = match ReverseName::parse(&query.name, query.record_type) {
            Ok(ip) => ip,
            Err(ReverseLookupError::NotReversible) => return Synthesis::Fallthrough,
            Err(ReverseLookupError::InvalidAddress(reason)) => {
                debug!(reason = %reason, "Malformed reverse name");
                return Synthesis::Fallthrough;
            }
        };

        let policy = self.policy.load_full();

        let Some(matched) = policy.find(ip) else {
            debug!(address = %ip, "No policy rule matches");
            return Synthesis::Fallthrough;
        };

        let resolution = self
            .resolver
            .execute(ip, matched.rule, matched.group)
            .await;

        let synthesis = self.synthesizer.execute(&query.name, &resolution);
        if synthesis.is_fallthrough() {
            debug!(address = %ip, rule = %matched.rule, "No name resolved");
        }
        synthesis
    }
}
