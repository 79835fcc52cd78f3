pub mod backends;
pub mod errors;
pub mod logging;
pub mod policy;
pub mod root;
pub mod server;
pub mod synthesis;
pub mod upstream;

pub use backends::{BackendsConfig, DynamicDiscoveryConfig, PersistentStoreConfig};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use policy::{PolicyGroupConfig, RuleSpec};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use synthesis::SynthesisConfig;
pub use upstream::UpstreamConfig;
