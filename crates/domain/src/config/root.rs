use serde::{Deserialize, Serialize};

use super::backends::BackendsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::policy::PolicyGroupConfig;
use super::server::ServerConfig;
use super::synthesis::SynthesisConfig;
use super::upstream::UpstreamConfig;
use crate::{BackendKind, DnsProtocol, PolicyTable};

const LOCAL_CONFIG_PATH: &str = "ferrous-ptr.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-ptr/config.toml";

/// Main configuration structure for Ferrous PTR
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Where fallthrough queries are relayed
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// TTLs and backend timeouts for synthesized answers
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Store connection settings
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Ordered policy groups
    #[serde(default)]
    pub policy: Vec<PolicyGroupConfig>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-ptr.toml in current directory
    /// 3. /etc/ferrous-ptr/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.server = upstream;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn upstream_protocol(&self) -> Result<DnsProtocol, ConfigError> {
        self.upstream
            .server
            .parse()
            .map_err(ConfigError::Validation)
    }

    /// Compile the `[[policy]]` section into a lookup table.
    pub fn policy_table(&self) -> Result<PolicyTable, ConfigError> {
        PolicyTable::from_config(&self.policy).map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        self.upstream_protocol()?;

        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout cannot be 0".to_string(),
            ));
        }

        if self.synthesis.static_ttl == 0 || self.synthesis.dynamic_ttl == 0 {
            return Err(ConfigError::Validation(
                "Synthesized TTLs must be greater than 0".to_string(),
            ));
        }

        if self.synthesis.backend_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Backend timeout cannot be 0".to_string(),
            ));
        }

        let table = self.policy_table()?;

        for (index, group) in table.groups().iter().enumerate() {
            if group.uses(&BackendKind::PersistentStore) && self.backends.persistent_store.is_none()
            {
                return Err(ConfigError::Validation(format!(
                    "Policy group {} uses persistent_store but [backends.persistent_store] is missing",
                    index + 1
                )));
            }
            if group.uses(&BackendKind::DynamicDiscovery)
                && self.backends.dynamic_discovery.is_none()
            {
                return Err(ConfigError::Validation(format!(
                    "Policy group {} uses dynamic_discovery but [backends.dynamic_discovery] is missing",
                    index + 1
                )));
            }
        }

        if let Some(discovery) = &self.backends.dynamic_discovery {
            if discovery.max_hops == 0 {
                return Err(ConfigError::Validation(
                    "dynamic_discovery.max_hops must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream: Option<String>,
    pub log_level: Option<String>,
}
