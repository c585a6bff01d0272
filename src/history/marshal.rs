// Cache stats query: filter raw and computed history into the API document.

use chrono::Utc;
use std::collections::{BTreeMap, VecDeque};

use super::filter::Filter;
use super::{CombinedStates, ResultInfoHistory, ResultStatHistory};
use crate::cache::computed::COMPUTED_STATS;
use crate::models::{
    CacheName, CacheStatsResponse, CommonApiData, MonitorConfig, ResultStatVal, TmProfile,
    TrafficServer,
};

/// Prefix of raw stats in the output document.
const RAW_STAT_PREFIX: &str = "ats.";

type CacheHistories = BTreeMap<CacheName, BTreeMap<String, Vec<ResultStatVal>>>;

/// Serializes [`cache_stats`] to JSON bytes.
pub fn stats_marshal<F>(
    raw: &ResultStatHistory,
    infos: &ResultInfoHistory,
    combined_states: &CombinedStates,
    monitor_config: &MonitorConfig,
    filter: &F,
    params: &str,
) -> serde_json::Result<Vec<u8>>
where
    F: Filter + ?Sized,
{
    let response = cache_stats(raw, infos, combined_states, monitor_config, filter, params);
    serde_json::to_vec(&response)
}

/// Builds the response for every cache with a combined state that passes `filter`.
/// A cache appears once a raw value was emitted for it or one of its snapshots is within
/// the requested depth, even if every computed stat is filtered out.
pub fn cache_stats<F>(
    raw: &ResultStatHistory,
    infos: &ResultInfoHistory,
    combined_states: &CombinedStates,
    monitor_config: &MonitorConfig,
    filter: &F,
    params: &str,
) -> CacheStatsResponse
where
    F: Filter + ?Sized,
{
    let mut caches: CacheHistories = BTreeMap::new();

    for (cache, state) in combined_states {
        if !filter.use_cache(cache) {
            continue;
        }

        if let Some(stats) = raw.get(cache) {
            for (name, history) in stats {
                let name = format!("{RAW_STAT_PREFIX}{name}");
                if !filter.use_stat(&name) {
                    continue;
                }
                for val in within_depth(history, filter) {
                    push(&mut caches, cache, &name, val.clone());
                }
            }
        }

        let Some(cache_infos) = infos.get(cache) else {
            continue;
        };
        if !cache_infos.is_empty() && filter.within_stat_history_max(1) {
            caches.entry(cache.clone()).or_default();
        }
        let (server, profile) = registration(monitor_config, cache);
        for (name, compute) in COMPUTED_STATS {
            if !filter.use_stat(name) {
                continue;
            }
            for (i, info) in cache_infos.iter().enumerate() {
                if !filter.within_stat_history_max(i + 1) {
                    break;
                }
                let val = ResultStatVal {
                    value: compute(info, &server, &profile, state),
                    time: info.time,
                    span: 1,
                };
                push(&mut caches, cache, name, val);
            }
        }
    }

    CacheStatsResponse {
        common: CommonApiData::new(params, Utc::now()),
        caches,
    }
}

/// Newest-first entries of one stat whose position, counted in samples, stays within the
/// requested depth. A collapsed entry at position `n` with span `s` moves the next entry
/// to position `n + s`.
fn within_depth<'a, F>(
    history: &'a VecDeque<ResultStatVal>,
    filter: &'a F,
) -> impl Iterator<Item = &'a ResultStatVal>
where
    F: Filter + ?Sized,
{
    history
        .iter()
        .scan(1usize, |depth, val| {
            if !filter.within_stat_history_max(*depth) {
                return None;
            }
            *depth += val.span as usize;
            Some(val)
        })
}

fn registration(monitor_config: &MonitorConfig, cache: &str) -> (TrafficServer, TmProfile) {
    let Some(server) = monitor_config.traffic_servers.get(cache) else {
        tracing::warn!(
            cache = %cache,
            "cache stats: cache not in monitor config, using defaults"
        );
        return (TrafficServer::default(), TmProfile::default());
    };
    let profile = match monitor_config.profiles.get(&server.profile) {
        Some(p) => p.clone(),
        None => {
            tracing::warn!(
                cache = %cache,
                profile = %server.profile,
                "cache stats: profile not in monitor config, using defaults"
            );
            TmProfile::default()
        }
    };
    (server.clone(), profile)
}

fn push(caches: &mut CacheHistories, cache: &str, name: &str, val: ResultStatVal) {
    caches
        .entry(cache.to_string())
        .or_default()
        .entry(name.to_string())
        .or_default()
        .push(val);
}
