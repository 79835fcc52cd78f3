pub mod alias_collapser;
pub mod backend_registry;

pub use alias_collapser::AliasCollapser;
pub use backend_registry::BackendRegistry;
