pub mod message;
pub mod server;
pub mod transport;
pub mod wire;

pub use server::PtrServerHandler;
pub use transport::UpstreamRelay;
