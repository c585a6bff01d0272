// Topology snapshot: delivery service resolution, cachegroup/type membership, registrations.
// Owned and replaced wholesale by the loader; handlers and queries only read a snapshot.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{CacheName, DeliveryServiceName, MonitorConfig};

/// Read-only lookups the aggregator needs from the topology store.
pub trait TopologyLookup {
    /// Delivery service serving `subsubdomain.subdomain.domain`.
    fn delivery_service(&self, domain: &str, subdomain: &str, subsubdomain: &str)
    -> Option<&str>;
    fn cachegroup(&self, cache: &str) -> Option<&str>;
    fn cache_type(&self, cache: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Topology {
    pub server_cachegroups: HashMap<CacheName, String>,
    pub server_types: HashMap<CacheName, String>,
    /// Exact FQDN matches (DNS routed services, e.g. `edge.ds.example.com`).
    pub delivery_service_fqdns: HashMap<String, DeliveryServiceName>,
    /// `subdomain.domain` keys matching any first label (HTTP routed services, where the
    /// first label is the serving cache's hostname).
    pub delivery_service_wildcards: HashMap<String, DeliveryServiceName>,
    pub monitor_config: MonitorConfig,
}

impl TopologyLookup for Topology {
    fn delivery_service(
        &self,
        domain: &str,
        subdomain: &str,
        subsubdomain: &str,
    ) -> Option<&str> {
        let fqdn = format!("{subsubdomain}.{subdomain}.{domain}");
        if let Some(ds) = self.delivery_service_fqdns.get(&fqdn) {
            return Some(ds);
        }
        self.delivery_service_wildcards
            .get(&format!("{subdomain}.{domain}"))
            .map(String::as_str)
    }

    fn cachegroup(&self, cache: &str) -> Option<&str> {
        self.server_cachegroups.get(cache).map(String::as_str)
    }

    fn cache_type(&self, cache: &str) -> Option<&str> {
        self.server_types.get(cache).map(String::as_str)
    }
}

impl Topology {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub async fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let s = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("reading topology {}: {}", path, e))?;
        Self::from_json(&s)
    }
}

/// Topology shared between many concurrent readers and one owner that swaps in new views.
#[derive(Clone)]
pub struct SharedTopology(Arc<ArcSwap<Topology>>);

impl Default for SharedTopology {
    fn default() -> Self {
        Self::new(Topology::default())
    }
}

impl SharedTopology {
    pub fn new(topology: Topology) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(topology)))
    }

    /// Current view. Stays valid (and unchanged) for as long as the caller holds it.
    pub fn load(&self) -> Arc<Topology> {
        self.0.load_full()
    }

    pub fn store(&self, topology: Topology) {
        self.0.store(Arc::new(topology));
    }
}
