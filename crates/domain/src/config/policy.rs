use crate::{BackendKind, DomainError, PrecedenceMode, SubnetRule};
use serde::{Deserialize, Serialize};

/// One `[[policy]]` entry: an ordered backend chain and the subnets it covers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyGroupConfig {
    #[serde(default)]
    pub backends: Vec<BackendKind>,

    pub rules: Vec<RuleSpec>,
}

/// A rule is either a `{ net, mode, fqdn }` table or the compact
/// `"net mode [fqdn]"` string.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleSpec {
    Line(String),
    Table {
        net: String,
        mode: PrecedenceMode,
        #[serde(default)]
        fqdn: Option<String>,
    },
}

impl RuleSpec {
    pub fn to_rule(&self) -> Result<SubnetRule, DomainError> {
        match self {
            RuleSpec::Line(line) => line.parse(),
            RuleSpec::Table { net, mode, fqdn } => SubnetRule::parse(net, *mode, fqdn.as_deref()),
        }
    }
}
