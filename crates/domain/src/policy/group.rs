use super::SubnetRule;
use crate::BackendKind;

/// A set of subnet rules that share one ordered backend chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyGroup {
    pub backends: Vec<BackendKind>,
    pub rules: Vec<SubnetRule>,
}

impl PolicyGroup {
    pub fn new(backends: Vec<BackendKind>, rules: Vec<SubnetRule>) -> Self {
        Self { backends, rules }
    }

    pub fn uses(&self, kind: &BackendKind) -> bool {
        self.backends.iter().any(|b| b == kind)
    }
}
