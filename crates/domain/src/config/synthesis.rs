use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
    /// TTL for names taken from rule defaults or hardcoded backends.
    #[serde(default = "default_static_ttl")]
    pub static_ttl: u32,

    /// TTL for names found in a persistent store or the discovery cache.
    #[serde(default = "default_dynamic_ttl")]
    pub dynamic_ttl: u32,

    /// Upper bound for a single backend lookup.
    #[serde(default = "default_backend_timeout_ms")]
    pub backend_timeout_ms: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            static_ttl: default_static_ttl(),
            dynamic_ttl: default_dynamic_ttl(),
            backend_timeout_ms: default_backend_timeout_ms(),
        }
    }
}

fn default_static_ttl() -> u32 {
    60
}

fn default_dynamic_ttl() -> u32 {
    30
}

fn default_backend_timeout_ms() -> u64 {
    500
}
