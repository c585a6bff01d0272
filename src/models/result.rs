// Poll result emitted by the cache handler, and the trimmed snapshot kept in history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

use super::{Astats, AstatsSystem, CacheName, DeliveryServiceName, DsStat};
use crate::error::{PollError, StatError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    pub load_avg: f64,
    pub bytes_out: i64,
    pub bytes_in: i64,
    pub kbps_out: i64,
    pub max_kbps_out: i64,
}

/// Output of a precomputing handler; left at its default otherwise.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedData {
    pub delivery_service_stats: HashMap<DeliveryServiceName, DsStat>,
    pub out_bytes: u64,
    pub max_kbps: i64,
    pub errors: Vec<StatError>,
    pub reporting: bool,
    pub time: DateTime<Utc>,
}

/// One cache's outcome for one poll attempt. Sent exactly once, never mutated afterwards.
#[derive(Debug)]
pub struct PollResult {
    pub id: CacheName,
    pub error: Option<PollError>,
    pub astats: Astats,
    pub time: DateTime<Utc>,
    pub request_time: Duration,
    pub vitals: Vitals,
    pub poll_id: u64,
    /// Receives `poll_id` once the consumer has finished with this result.
    pub poll_finished: Option<mpsc::UnboundedSender<u64>>,
    pub precomputed: PrecomputedData,
    pub available: bool,
}

/// The parts of a [`PollResult`] retained per poll for computed stats.
#[derive(Debug, Clone, Default)]
pub struct ResultInfo {
    pub id: CacheName,
    pub error: Option<String>,
    pub time: DateTime<Utc>,
    pub request_time: Duration,
    pub vitals: Vitals,
    pub poll_id: u64,
    pub available: bool,
    pub system: AstatsSystem,
}

impl ResultInfo {
    pub fn from_result(result: &PollResult, vitals: Vitals) -> Self {
        Self {
            id: result.id.clone(),
            error: result.error.as_ref().map(|e| e.to_string()),
            time: result.time,
            request_time: result.request_time,
            vitals,
            poll_id: result.poll_id,
            available: result.available,
            system: result.astats.system.clone(),
        }
    }
}
