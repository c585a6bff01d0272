// In-memory stat history fed by the result consumer and read by the cache stats query.

pub mod filter;
pub mod marshal;
pub mod vitals;

use std::collections::{HashMap, VecDeque};
use std::sync::{PoisonError, RwLock};
use tracing::instrument;

use crate::models::{CacheName, IsAvailable, MonitorConfig, PollResult, ResultInfo, ResultStatVal};
use filter::Filter;

/// Raw stat history per cache and stat name, newest first.
pub type ResultStatHistory = HashMap<CacheName, HashMap<String, VecDeque<ResultStatVal>>>;
/// Retained result snapshots per cache, newest first.
pub type ResultInfoHistory = HashMap<CacheName, VecDeque<ResultInfo>>;
pub type CombinedStates = HashMap<CacheName, IsAvailable>;

#[derive(Debug, Default)]
struct Histories {
    stats: ResultStatHistory,
    infos: ResultInfoHistory,
    combined_states: CombinedStates,
}

pub struct HistoryStore {
    inner: RwLock<Histories>,
    max_history: usize,
}

impl HistoryStore {
    /// `max_history` bounds both the snapshots kept per cache and the entries kept per stat.
    pub fn new(max_history: usize) -> Self {
        Self {
            inner: RwLock::new(Histories::default()),
            max_history: max_history.max(1),
        }
    }

    #[instrument(skip_all, fields(cache = %result.id, poll_id = result.poll_id))]
    pub fn record(&self, result: &PollResult) {
        let mut h = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let infos = h.infos.entry(result.id.clone()).or_default();
        let vitals = vitals::compute_vitals(result, infos.front());
        infos.push_front(ResultInfo::from_result(result, vitals));
        infos.truncate(self.max_history);

        let is_available = result.error.is_none()
            && result.available
            && !result.astats.system.not_available;
        h.combined_states
            .insert(result.id.clone(), IsAvailable { is_available });

        if !result.available {
            tracing::debug!("result unavailable, raw stats not recorded");
            return;
        }
        let stats = h.stats.entry(result.id.clone()).or_default();
        for (name, value) in &result.astats.ats {
            let history = stats.entry(name.clone()).or_default();
            push_stat(history, value.to_json(), result.time, self.max_history);
        }
    }

    /// Runs the cache stats query against the current history.
    pub fn marshal<F>(
        &self,
        monitor_config: &MonitorConfig,
        filter: &F,
        params: &str,
    ) -> serde_json::Result<Vec<u8>>
    where
        F: Filter + ?Sized,
    {
        let h = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        marshal::stats_marshal(
            &h.stats,
            &h.infos,
            &h.combined_states,
            monitor_config,
            filter,
            params,
        )
    }

    pub fn combined_state(&self, cache: &str) -> Option<IsAvailable> {
        let h = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        h.combined_states.get(cache).copied()
    }

    /// Newest retained snapshot of `cache`.
    pub fn latest_info(&self, cache: &str) -> Option<ResultInfo> {
        let h = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        h.infos.get(cache).and_then(|i| i.front().cloned())
    }

    /// Stat history of `cache`, newest first.
    pub fn stat_history(&self, cache: &str, stat: &str) -> Vec<ResultStatVal> {
        let h = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        h.stats
            .get(cache)
            .and_then(|s| s.get(stat))
            .map(|v| v.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn cache_count(&self) -> usize {
        let h = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        h.combined_states.len()
    }
}

/// Pushes a sample onto a newest-first history. A value equal to the newest entry extends
/// that entry's span and moves its time forward instead of adding an entry.
fn push_stat(
    history: &mut VecDeque<ResultStatVal>,
    value: serde_json::Value,
    time: chrono::DateTime<chrono::Utc>,
    max_history: usize,
) {
    if let Some(newest) = history.front_mut()
        && newest.value == value
    {
        newest.span += 1;
        newest.time = time;
        return;
    }
    history.push_front(ResultStatVal {
        value,
        time,
        span: 1,
    });
    history.truncate(max_history);
}
