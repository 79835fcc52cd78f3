use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The closed set of name sources a policy group can consult.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Fixed name from configuration.
    Hardcoded(Arc<str>),

    /// Local read-only address → name file store.
    #[serde(alias = "sqlite")]
    PersistentStore,

    /// Remote cache fed by a discovery process, with alias collapsing.
    #[serde(alias = "shodohflo")]
    DynamicDiscovery,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Hardcoded(_) => "hardcoded",
            BackendKind::PersistentStore => "persistent_store",
            BackendKind::DynamicDiscovery => "dynamic_discovery",
        }
    }

    /// Names from hardcoded sources are static and get the long TTL.
    pub fn is_static(&self) -> bool {
        matches!(self, BackendKind::Hardcoded(_))
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Hardcoded(name) => write!(f, "hardcoded({})", name),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Result of asking a single backend about an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    Found(Arc<str>),
    Empty,
    /// The backend could not answer (unreachable, timed out, protocol error).
    Unavailable(String),
}
