// Per-delivery-service aggregates built by one precompute pass

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::CacheName;

/// Counters reported under `plugin.remap_stats.<fqdn>.<name>`, merged per stat name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTotals {
    pub status_2xx: i64,
    pub status_3xx: i64,
    pub status_4xx: i64,
    pub status_5xx: i64,
    pub out_bytes: i64,
    pub in_bytes: f64,
    pub tps_2xx: f64,
    pub tps_3xx: f64,
    pub tps_4xx: f64,
    pub tps_5xx: f64,
    pub tps_total: f64,
    pub is_available: bool,
    pub error_string: String,
}

/// One delivery service's aggregate for one poll. The scoped maps hold copies of `total`
/// for the single reporting cache; they are not sums across caches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsStat {
    pub total: StatTotals,
    pub cache_groups: HashMap<String, StatTotals>,
    pub types: HashMap<String, StatTotals>,
    pub caches: HashMap<CacheName, StatTotals>,
    pub caches_time_received: HashMap<CacheName, DateTime<Utc>>,
}
