use crate::BackendKind;
use std::sync::Arc;

/// Where a resolved name came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    RuleDefault,
    Backend(BackendKind),
}

impl ResolutionSource {
    /// Static names are configuration-owned and may carry a longer TTL.
    pub fn is_static(&self) -> bool {
        match self {
            ResolutionSource::RuleDefault => true,
            ResolutionSource::Backend(kind) => kind.is_static(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        name: Arc<str>,
        source: ResolutionSource,
    },
    NoAnswer,
}

impl Resolution {
    pub fn resolved(name: impl Into<Arc<str>>, source: ResolutionSource) -> Self {
        Resolution::Resolved {
            name: name.into(),
            source,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Resolution::Resolved { name, .. } => Some(name),
            Resolution::NoAnswer => None,
        }
    }
}

/// A synthesized PTR record, ready for the responder to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtrAnswer {
    /// The query name the record answers, as asked.
    pub owner: Arc<str>,
    pub ttl: u32,
    /// Fully qualified target name.
    pub target: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesis {
    Answer(PtrAnswer),
    /// Nothing local applies; relay the original query upstream.
    Fallthrough,
}

impl Synthesis {
    pub fn is_fallthrough(&self) -> bool {
        matches!(self, Synthesis::Fallthrough)
    }
}
