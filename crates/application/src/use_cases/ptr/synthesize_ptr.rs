use ferrous_ptr_domain::domain_name::qualify;
use ferrous_ptr_domain::{PtrAnswer, Resolution, Synthesis};
use std::sync::Arc;
use tracing::warn;

/// Turns a resolution into a PTR answer, or into a fallthrough signal.
pub struct SynthesizePtrUseCase {
    static_ttl: u32,
    dynamic_ttl: u32,
}

impl SynthesizePtrUseCase {
    pub fn new(static_ttl: u32, dynamic_ttl: u32) -> Self {
        Self {
            static_ttl,
            dynamic_ttl,
        }
    }

    pub fn execute(&self, query_name: &str, resolution: &Resolution) -> Synthesis {
        let Resolution::Resolved { name, source } = resolution else {
            return Synthesis::Fallthrough;
        };

        let Some(target) = qualify(name) else {
            warn!(query = %query_name, target = %name, "Resolved name is not a valid DNS name");
            return Synthesis::Fallthrough;
        };

        let ttl = if source.is_static() {
            self.static_ttl
        } else {
            self.dynamic_ttl
        };

        Synthesis::Answer(PtrAnswer {
            owner: Arc::from(query_name),
            ttl,
            target,
        })
    }
}
