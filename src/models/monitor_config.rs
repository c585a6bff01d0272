// Cache registration and profile records, as handed over by the topology store

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::CacheName;

/// Administrative cache status; parses from the upper-case strings the topology store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Online,
    Offline,
    Reported,
    AdminDown,
    Invalid,
}

impl CacheStatus {
    pub fn from_status(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "ONLINE" => CacheStatus::Online,
            "OFFLINE" => CacheStatus::Offline,
            "REPORTED" => CacheStatus::Reported,
            "ADMIN_DOWN" => CacheStatus::AdminDown,
            _ => CacheStatus::Invalid,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrafficServer {
    pub host_name: String,
    pub profile: String,
    #[serde(rename = "status")]
    pub server_status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TmParameters {
    #[serde(rename = "health.polling.url")]
    pub health_polling_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TmProfile {
    pub name: String,
    pub parameters: TmParameters,
}

/// Registration (by cache name) and profile (by profile name) tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    pub traffic_servers: HashMap<CacheName, TrafficServer>,
    pub profiles: HashMap<String, TmProfile>,
}

/// Combined availability of a cache as last recorded by the history store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsAvailable {
    pub is_available: bool,
}
