mod backends;
mod dns;
mod use_cases;

pub use backends::Backends;
pub use dns::DnsServices;
pub use use_cases::UseCases;
