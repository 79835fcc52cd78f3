use serde::{Deserialize, Serialize};

/// Connection settings for the store-backed backends. A section only needs
/// to be present when some policy group lists that backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendsConfig {
    #[serde(default, alias = "sqlite")]
    pub persistent_store: Option<PersistentStoreConfig>,

    #[serde(default, alias = "shodohflo")]
    pub dynamic_discovery: Option<DynamicDiscoveryConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersistentStoreConfig {
    /// Path to the SQLite file holding the `Address` table.
    #[serde(alias = "db")]
    pub path: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DynamicDiscoveryConfig {
    /// `host:port` of the Redis-protocol cache.
    #[serde(alias = "redis_server")]
    pub address: String,

    /// Prepended to every lookup key.
    #[serde(default)]
    pub key_prefix: String,

    /// Alias hops followed before giving up.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,
}

fn default_max_connections() -> u32 {
    4
}

fn default_max_hops() -> usize {
    8
}

fn default_max_idle_connections() -> usize {
    4
}
