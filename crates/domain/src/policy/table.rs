use super::{PolicyGroup, SubnetRule};
use crate::config::PolicyGroupConfig;
use crate::domain_name::require_valid;
use crate::{BackendKind, DomainError};
use std::net::IpAddr;

/// The rule that governs an address, and the group it was declared in.
#[derive(Debug, Clone, Copy)]
pub struct PolicyMatch<'a> {
    pub rule: &'a SubnetRule,
    pub group: &'a PolicyGroup,
}

/// Immutable subnet policy, built once from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyTable {
    groups: Vec<PolicyGroup>,
}

impl PolicyTable {
    pub fn new(groups: Vec<PolicyGroup>) -> Self {
        Self { groups }
    }

    pub fn from_config(groups: &[PolicyGroupConfig]) -> Result<Self, DomainError> {
        let mut built = Vec::with_capacity(groups.len());

        for (index, group) in groups.iter().enumerate() {
            let mut rules = Vec::with_capacity(group.rules.len());
            for spec in &group.rules {
                let rule = spec.to_rule().map_err(|e| {
                    DomainError::ConfigError(format!("policy group {}: {}", index + 1, e))
                })?;
                rules.push(rule);
            }
            for backend in &group.backends {
                if let BackendKind::Hardcoded(name) = backend {
                    require_valid(name, &format!("hardcoded backend in policy group {}", index + 1))?;
                }
            }
            built.push(PolicyGroup::new(group.backends.clone(), rules));
        }

        Ok(Self::new(built))
    }

    pub fn groups(&self) -> &[PolicyGroup] {
        &self.groups
    }

    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    /// Longest-prefix match across every group. On equal prefix length the
    /// rule declared first wins.
    pub fn find(&self, ip: IpAddr) -> Option<PolicyMatch<'_>> {
        let mut best_match: Option<PolicyMatch<'_>> = None;

        for group in &self.groups {
            for rule in &group.rules {
                if !rule.contains(ip) {
                    continue;
                }

                match best_match {
                    None => best_match = Some(PolicyMatch { rule, group }),
                    Some(existing) if rule.prefix() > existing.rule.prefix() => {
                        best_match = Some(PolicyMatch { rule, group });
                    }
                    _ => {}
                }
            }
        }

        best_match
    }
}
