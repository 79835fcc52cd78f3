mod discovery_store;
mod ptr_backend;
mod upstream_forwarder;

pub use discovery_store::DiscoveryStore;
pub use ptr_backend::PtrBackend;
pub use upstream_forwarder::UpstreamForwarder;
