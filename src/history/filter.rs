// Query filters: which stats, which caches, and how deep into history.

use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::topology::{Topology, TopologyLookup};

pub trait Filter {
    fn use_stat(&self, name: &str) -> bool;
    fn use_cache(&self, name: &str) -> bool;
    /// Whether history position `n` (1 = newest sample) is within the requested depth.
    fn within_stat_history_max(&self, n: usize) -> bool;
}

/// Query string of the cache stats endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheStatsParams {
    /// History count; 0 means unlimited, absent means 1.
    pub hc: Option<usize>,
    /// Comma separated stat names (substrings when `wildcard` is set).
    pub stats: Option<String>,
    pub wildcard: Option<bool>,
    #[serde(rename = "type")]
    pub cache_type: Option<String>,
    /// Comma separated cache names.
    pub hosts: Option<String>,
}

pub struct CacheStatFilter {
    history_count: usize,
    stats_to_use: HashSet<String>,
    wildcard: bool,
    cache_type: Option<String>,
    hosts: HashSet<String>,
    topology: Arc<Topology>,
}

impl CacheStatFilter {
    pub fn new(params: &CacheStatsParams, topology: Arc<Topology>) -> Self {
        Self {
            history_count: params.hc.unwrap_or(1),
            stats_to_use: split_list(params.stats.as_deref()),
            wildcard: params.wildcard.unwrap_or(false),
            cache_type: params.cache_type.clone().filter(|t| !t.is_empty()),
            hosts: split_list(params.hosts.as_deref()),
            topology,
        }
    }
}

impl Filter for CacheStatFilter {
    fn use_stat(&self, name: &str) -> bool {
        if self.stats_to_use.is_empty() {
            return true;
        }
        if !self.wildcard {
            return self.stats_to_use.contains(name);
        }
        self.stats_to_use.iter().any(|s| name.contains(s.as_str()))
    }

    fn use_cache(&self, name: &str) -> bool {
        if !self.hosts.is_empty() && !self.hosts.contains(name) {
            return false;
        }
        match &self.cache_type {
            Some(t) => self.topology.cache_type(name) == Some(t.as_str()),
            None => true,
        }
    }

    fn within_stat_history_max(&self, n: usize) -> bool {
        self.history_count == 0 || n <= self.history_count
    }
}

fn split_list(s: Option<&str>) -> HashSet<String> {
    s.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
