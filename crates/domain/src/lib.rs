//! Ferrous PTR Domain Layer
pub mod backend;
pub mod config;
pub mod dns_protocol;
pub mod domain_name;
pub mod errors;
pub mod policy;
pub mod ptr_query;
pub mod record_type;
pub mod resolution;
pub mod reverse_name;

pub use backend::{BackendKind, BackendOutcome};
pub use config::{CliOverrides, Config, ConfigError};
pub use dns_protocol::DnsProtocol;
pub use errors::{DomainError, ReverseLookupError};
pub use policy::{PolicyGroup, PolicyMatch, PolicyTable, PrecedenceMode, SubnetRule};
pub use ptr_query::PtrQuery;
pub use record_type::RecordType;
pub use resolution::{PtrAnswer, Resolution, ResolutionSource, Synthesis};
pub use reverse_name::ReverseName;
