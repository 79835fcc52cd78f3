use arc_swap::ArcSwap;
use ferrous_ptr_domain::{Config, DomainError, PolicyTable};
use std::sync::Arc;
use tracing::info;

/// Re-reads the configuration file and swaps in a freshly built policy
/// table. On any error the running table is left untouched.
pub struct ReloadPolicyUseCase {
    policy: Arc<ArcSwap<PolicyTable>>,
    config_path: Option<String>,
}

impl ReloadPolicyUseCase {
    pub fn new(policy: Arc<ArcSwap<PolicyTable>>, config_path: Option<String>) -> Self {
        Self {
            policy,
            config_path,
        }
    }

    pub fn execute(&self) -> Result<usize, DomainError> {
        let config = Config::load(self.config_path.as_deref(), Default::default())
            .map_err(|e| DomainError::ConfigError(format!("Config load error: {}", e)))?;

        config
            .validate()
            .map_err(|e| DomainError::ConfigError(format!("Config validation error: {}", e)))?;

        let table = config
            .policy_table()
            .map_err(|e| DomainError::ConfigError(e.to_string()))?;
        let rules = table.rule_count();

        self.policy.store(Arc::new(table));

        info!(
            rules,
            path = self.config_path.as_deref().unwrap_or("<default>"),
            "Policy table reloaded"
        );

        Ok(rules)
    }
}
