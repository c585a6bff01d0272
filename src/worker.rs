// Background tasks: the result consumer that feeds the history store, and the topology reloader.
// The consumer is the only reader of the handler's result channel.

use crate::history::HistoryStore;
use crate::models::PollResult;
use crate::topology::{SharedTopology, Topology};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, interval};

/// Consumer timing and logging config.
pub struct ConsumerConfig {
    /// How often to log consumer counters (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Spawns the task that drains `result_rx` into `history`.
/// Each result is recorded before its completion signal is sent. Exits when every handler
/// clone is dropped, or on shutdown.
pub fn spawn_result_consumer(
    mut result_rx: mpsc::Receiver<PollResult>,
    history: Arc<HistoryStore>,
    config: ConsumerConfig,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    let stats_log_interval = Duration::from_secs(config.stats_log_interval_secs);
    tokio::spawn(async move {
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut results_total: u64 = 0;
        let mut results_failed_total: u64 = 0;
        let mut stat_errors_total: u64 = 0;

        loop {
            tokio::select! {
                result = result_rx.recv() => {
                    let Some(result) = result else { break };
                    results_total += 1;
                    if result.error.is_some() {
                        results_failed_total += 1;
                    }
                    stat_errors_total += result.precomputed.errors.len() as u64;
                    history.record(&result);
                    if let Some(done) = &result.poll_finished
                        && done.send(result.poll_id).is_err()
                    {
                        tracing::debug!(
                            cache = %result.id,
                            poll_id = result.poll_id,
                            "poll finished receiver gone"
                        );
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Result consumer shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        caches = history.cache_count(),
                        results_total,
                        results_failed_total,
                        stat_errors_total,
                        "consumer stats"
                    );
                }
            }
        }
        tracing::debug!(results_total, "Result consumer stopped");
    })
}

/// Spawns the task that re-reads the topology file every `interval_secs` and swaps it in.
/// A failed read keeps the current view.
pub fn spawn_topology_reload(
    topology: SharedTopology,
    path: String,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick completes immediately; the startup load already happened.
        tick.tick().await;
        loop {
            tick.tick().await;
            match Topology::load_from_file(&path).await {
                Ok(t) => {
                    tracing::debug!(
                        operation = "reload_topology",
                        caches = t.server_types.len(),
                        "topology reloaded"
                    );
                    topology.store(t);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        operation = "reload_topology",
                        path = %path,
                        "topology reload failed, keeping current view"
                    );
                }
            }
        }
    })
}
