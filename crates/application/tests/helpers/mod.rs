#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_ptr_application::ports::{DiscoveryStore, PtrBackend};
use ferrous_ptr_domain::DomainError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// In-memory backend with call counting and failure switches.
#[derive(Clone, Default)]
pub struct MockPtrBackend {
    entries: Arc<RwLock<HashMap<IpAddr, Arc<str>>>>,
    should_fail: Arc<RwLock<bool>>,
    delay: Arc<RwLock<Option<Duration>>>,
    calls: Arc<AtomicUsize>,
}

impl MockPtrBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, ip: &str, name: &str) -> Self {
        self.entries
            .write()
            .unwrap()
            .insert(ip.parse().unwrap(), Arc::from(name));
        self
    }

    pub fn failing() -> Self {
        let backend = Self::new();
        *backend.should_fail.write().unwrap() = true;
        backend
    }

    pub fn slow(delay: Duration) -> Self {
        let backend = Self::new();
        *backend.delay.write().unwrap() = Some(delay);
        backend
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PtrBackend for MockPtrBackend {
    async fn lookup(&self, ip: IpAddr) -> Result<Option<Arc<str>>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.should_fail.read().unwrap() {
            return Err(DomainError::DatabaseError("mock store offline".to_string()));
        }

        Ok(self.entries.read().unwrap().get(&ip).cloned())
    }
}

/// Backend that must never be reached.
pub struct PanickingBackend;

#[async_trait]
impl PtrBackend for PanickingBackend {
    async fn lookup(&self, ip: IpAddr) -> Result<Option<Arc<str>>, DomainError> {
        panic!("backend invoked for {ip} although the rule default should win");
    }
}

/// In-memory key/value discovery cache.
#[derive(Clone, Default)]
pub struct MockDiscoveryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    fail_on: Arc<RwLock<Option<String>>>,
    gets: Arc<AtomicUsize>,
}

impl MockDiscoveryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.values
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Every `get` for `key` returns an error.
    pub fn failing_on(self, key: &str) -> Self {
        *self.fail_on.write().unwrap() = Some(key.to_string());
        self
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryStore for MockDiscoveryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.gets.fetch_add(1, Ordering::SeqCst);

        if self.fail_on.read().unwrap().as_deref() == Some(key) {
            return Err(DomainError::DiscoveryError("connection reset".to_string()));
        }

        Ok(self.values.read().unwrap().get(key).cloned())
    }
}
