// Cache poll handler: decode one poll payload, optionally precompute aggregates, and hand
// exactly one PollResult to the consumer over a bounded channel.

pub mod aggregate;
pub mod classify;
pub mod computed;
pub mod proc_net_dev;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::instrument;

use crate::error::PollError;
use crate::models::{Astats, CacheName, PollResult, PrecomputedData, Vitals};
use crate::topology::SharedTopology;

/// Everything the poller knows about one finished poll attempt.
#[derive(Debug)]
pub struct PollResponse {
    pub cache_id: CacheName,
    /// Raw response body; `None` when the poller got nothing to decode.
    pub body: Option<Bytes>,
    pub request_time: Duration,
    pub completed_at: DateTime<Utc>,
    /// Transport failure reported by the poller.
    pub error: Option<String>,
    pub poll_id: u64,
    pub poll_finished: Option<mpsc::UnboundedSender<u64>>,
}

#[derive(Clone)]
pub struct Handler {
    result_tx: mpsc::Sender<PollResult>,
    topology: Option<SharedTopology>,
}

impl Handler {
    /// Handler that passes results through without precomputing; `precomputed` stays default.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<PollResult>) {
        let (result_tx, result_rx) = mpsc::channel(capacity);
        (
            Self {
                result_tx,
                topology: None,
            },
            result_rx,
        )
    }

    /// Handler that fills `PollResult::precomputed` before sending.
    pub fn new_precompute(
        capacity: usize,
        topology: SharedTopology,
    ) -> (Self, mpsc::Receiver<PollResult>) {
        let (result_tx, result_rx) = mpsc::channel(capacity);
        (
            Self {
                result_tx,
                topology: Some(topology),
            },
            result_rx,
        )
    }

    pub fn precompute(&self) -> bool {
        self.topology.is_some()
    }

    /// Builds the result for `poll` and sends it. Waits while the channel is full; this is
    /// the only point where a slow consumer holds up the poller.
    #[instrument(skip_all, fields(cache = %poll.cache_id, poll_id = poll.poll_id))]
    pub async fn handle(&self, poll: PollResponse) {
        let result = self.process(poll);
        if self.result_tx.send(result).await.is_err() {
            tracing::debug!("result channel closed, dropping result");
        }
    }

    /// Decodes and (if configured) precomputes one poll. Never fails: errors ride on the result.
    pub fn process(&self, poll: PollResponse) -> PollResult {
        tracing::debug!(cache = %poll.cache_id, poll_id = poll.poll_id, "handle start");
        let mut result = PollResult {
            id: poll.cache_id,
            error: None,
            astats: Astats::default(),
            time: poll.completed_at,
            request_time: poll.request_time,
            vitals: Vitals::default(),
            poll_id: poll.poll_id,
            poll_finished: poll.poll_finished,
            precomputed: PrecomputedData::default(),
            available: false,
        };

        if let Some(e) = poll.error {
            tracing::warn!(cache = %result.id, error = %e, "handler given poll error");
            result.error = Some(PollError::Transport(e));
            return result;
        }

        let Some(body) = poll.body else {
            tracing::warn!(cache = %result.id, "handler got no payload");
            result.error = Some(PollError::NoPayload);
            return result;
        };

        result.precomputed.reporting = true;
        result.precomputed.time = result.time;

        result.astats = match serde_json::from_slice(&body) {
            Ok(astats) => astats,
            Err(e) => {
                tracing::warn!(cache = %result.id, error = %e, "stats payload decode error");
                result.error = Some(PollError::Decode(e));
                return result;
            }
        };

        if result.astats.system.proc_net_dev.is_empty() {
            tracing::warn!(cache = %result.id, "proc.net.dev empty");
        }
        if result.astats.system.inf_name.is_empty() {
            tracing::warn!(cache = %result.id, "inf.name empty");
        }
        if result.astats.system.inf_speed == 0 {
            tracing::warn!(cache = %result.id, "inf.speed empty");
        }

        result.available = true;

        if let Some(topology) = &self.topology {
            aggregate::precompute(&mut result, &*topology.load());
        }

        result
    }
}
