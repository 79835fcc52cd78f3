pub mod redis_store;
pub mod resp;

pub use redis_store::RedisDiscoveryStore;
