use super::DnsServices;
use ferrous_ptr_application::use_cases::ReloadPolicyUseCase;
use std::sync::Arc;

pub struct UseCases {
    pub reload_policy: Arc<ReloadPolicyUseCase>,
}

impl UseCases {
    pub fn new(dns_services: &DnsServices, config_path: Option<String>) -> Self {
        Self {
            reload_policy: Arc::new(ReloadPolicyUseCase::new(
                dns_services.policy.clone(),
                config_path,
            )),
        }
    }
}
