// Stats poll payload as served by a cache's stats plugin

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Decoded poll body: the `system` block plus the open-ended `ats` stat map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Astats {
    pub ats: HashMap<String, StatValue>,
    pub system: AstatsSystem,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AstatsSystem {
    #[serde(rename = "inf.name")]
    pub inf_name: String,
    /// Interface speed in Mbps.
    #[serde(rename = "inf.speed")]
    pub inf_speed: i64,
    /// Raw /proc/net/dev text of the cache.
    #[serde(rename = "proc.net.dev")]
    pub proc_net_dev: String,
    #[serde(rename = "proc.loadavg")]
    pub proc_loadavg: String,
    pub config_reload_requests: i64,
    pub last_reload_request: i64,
    pub config_reloads: i64,
    pub last_reload: i64,
    pub astats_load: i64,
    pub not_available: bool,
}

/// Untyped stat value. Anything that is not a number, boolean or string lands in `Other`
/// so one odd stat never fails decoding of the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Bool(bool),
    /// Kept as reported so integers are served back as integers.
    Number(serde_json::Number),
    String(String),
    Other(serde_json::Value),
}

impl StatValue {
    /// Numeric value as `f64`, for merging into totals.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StatValue::Bool(_) => "bool",
            StatValue::Number(_) => "number",
            StatValue::String(_) => "string",
            StatValue::Other(_) => "other",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            StatValue::Bool(b) => serde_json::Value::Bool(*b),
            StatValue::Number(n) => serde_json::Value::Number(n.clone()),
            StatValue::String(s) => serde_json::Value::String(s.clone()),
            StatValue::Other(v) => v.clone(),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Bool(b) => write!(f, "{b}"),
            StatValue::Number(n) => write!(f, "{n}"),
            StatValue::String(s) => write!(f, "'{s}'"),
            StatValue::Other(v) => write!(f, "{v}"),
        }
    }
}
