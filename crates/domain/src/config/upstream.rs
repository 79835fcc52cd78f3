use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// `tcp://IP:PORT`, `tls://HOSTNAME@IP:PORT` or plain `IP:PORT` (TCP).
    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Idle connections kept open for reuse.
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timeout_ms: default_timeout_ms(),
            max_idle_connections: default_max_idle_connections(),
        }
    }
}

fn default_server() -> String {
    "tls://dns.quad9.net@9.9.9.9:853".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_max_idle_connections() -> usize {
    2
}
