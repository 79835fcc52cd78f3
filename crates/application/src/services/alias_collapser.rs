use async_trait::async_trait;
use ferrous_ptr_domain::DomainError;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::ports::{DiscoveryStore, PtrBackend};

/// Resolves an address through the discovery cache and follows alias
/// values until a name with no further entry is reached.
///
/// The walk is bounded: more than `max_hops` aliases, or a name seen twice,
/// ends the walk with no answer.
pub struct AliasCollapser {
    store: Arc<dyn DiscoveryStore>,
    key_prefix: Arc<str>,
    max_hops: usize,
}

impl AliasCollapser {
    pub fn new(
        store: Arc<dyn DiscoveryStore>,
        key_prefix: impl Into<Arc<str>>,
        max_hops: usize,
    ) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            max_hops,
        }
    }

    fn key(&self, item: &str) -> String {
        format!("{}{}", self.key_prefix, item)
    }

    #[instrument(skip(self))]
    pub async fn collapse(&self, ip: IpAddr) -> Result<Option<Arc<str>>, DomainError> {
        let Some(mut current) = self.store.get(&self.key(&ip.to_string())).await? else {
            return Ok(None);
        };

        let mut visited = HashSet::new();
        visited.insert(normalize(&current));
        let mut hops = 0usize;

        loop {
            let next = match self.store.get(&self.key(&normalize(&current))).await? {
                Some(next) => next,
                None => return Ok(Some(Arc::from(current))),
            };

            hops += 1;
            if hops > self.max_hops {
                debug!(name = %current, max_hops = self.max_hops, "Alias chain too long");
                return Ok(None);
            }

            if !visited.insert(normalize(&next)) {
                debug!(name = %next, "Alias chain loops back on itself");
                return Ok(None);
            }

            current = next;
        }
    }
}

#[async_trait]
impl PtrBackend for AliasCollapser {
    async fn lookup(&self, ip: IpAddr) -> Result<Option<Arc<str>>, DomainError> {
        self.collapse(ip).await
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}
