// Per-poll aggregation: merge classified remap stats into per-delivery-service totals.
// Everything here works on a map owned by one precompute pass; nothing is shared.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::classify::{Classification, classify};
use super::proc_net_dev;
use crate::error::StatError;
use crate::models::{DeliveryServiceName, DsStat, PollResult, StatTotals, StatValue};
use crate::topology::TopologyLookup;

const KBPS_PER_MBPS: i64 = 1000;

/// Whether a stat line changed the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    Merged,
    Ignored,
}

/// Fills `result.precomputed` from the result's own payload. Per-stat failures are
/// collected in `precomputed.errors`.
pub fn precompute<T>(result: &mut PollResult, topology: &T)
where
    T: TopologyLookup + ?Sized,
{
    let system = &result.astats.system;
    result.precomputed.out_bytes =
        match proc_net_dev::out_bytes(&system.proc_net_dev, &system.inf_name) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(cache = %result.id, error = %e, "precomputing out bytes");
                0
            }
        };
    result.precomputed.max_kbps = system.inf_speed.saturating_mul(KBPS_PER_MBPS);

    let mut stats: HashMap<DeliveryServiceName, DsStat> = HashMap::new();
    for (stat, value) in &result.astats.ats {
        if let Err(e) = process_stat(&result.id, &mut stats, topology, stat, value, result.time)
        {
            tracing::info!(
                cache = %result.id,
                stat = %stat,
                value = %value,
                error = %e,
                "precomputing stat"
            );
            result.precomputed.errors.push(e);
        }
    }
    result.precomputed.delivery_service_stats = stats;
}

/// Classifies one stat line and merges it into `stats`. On error `stats` is untouched.
pub fn process_stat<T>(
    cache: &str,
    stats: &mut HashMap<DeliveryServiceName, DsStat>,
    topology: &T,
    stat: &str,
    value: &StatValue,
    time_received: DateTime<Utc>,
) -> Result<Merge, StatError>
where
    T: TopologyLookup + ?Sized,
{
    let (delivery_service, name) = match classify(stat, topology)? {
        Classification::RemapStat {
            delivery_service,
            name,
        } => (delivery_service, name),
        Classification::NotProcessed => return Ok(Merge::Ignored),
    };

    let mut total = stats
        .get(&delivery_service)
        .map(|s| s.total.clone())
        .unwrap_or_default();
    if add_cache_stat(&mut total, name, value)? == Merge::Ignored {
        return Ok(Merge::Ignored);
    }

    let cachegroup = topology
        .cachegroup(cache)
        .ok_or_else(|| StatError::MissingCachegroup {
            cache: cache.to_string(),
        })?;
    let cache_type = topology
        .cache_type(cache)
        .ok_or_else(|| StatError::MissingType {
            cache: cache.to_string(),
        })?;

    let ds_stat = stats.entry(delivery_service).or_default();
    ds_stat
        .cache_groups
        .insert(cachegroup.to_string(), total.clone());
    ds_stat.types.insert(cache_type.to_string(), total.clone());
    ds_stat.caches.insert(cache.to_string(), total.clone());
    ds_stat
        .caches_time_received
        .insert(cache.to_string(), time_received);
    ds_stat.total = total;
    Ok(Merge::Merged)
}

/// Adds `value` to the named counter: numbers sum, availability is sticky, error strings
/// append. A value of the wrong shape leaves `totals` unchanged.
pub fn add_cache_stat(
    totals: &mut StatTotals,
    name: &str,
    value: &StatValue,
) -> Result<Merge, StatError> {
    match name {
        "status_2xx" => totals.status_2xx += number(name, value)? as i64,
        "status_3xx" => totals.status_3xx += number(name, value)? as i64,
        "status_4xx" => totals.status_4xx += number(name, value)? as i64,
        "status_5xx" => totals.status_5xx += number(name, value)? as i64,
        "out_bytes" => totals.out_bytes += number(name, value)? as i64,
        "in_bytes" => totals.in_bytes += number(name, value)?,
        "tps_2xx" => totals.tps_2xx += number(name, value)?,
        "tps_3xx" => totals.tps_3xx += number(name, value)?,
        "tps_4xx" => totals.tps_4xx += number(name, value)?,
        "tps_5xx" => totals.tps_5xx += number(name, value)?,
        "tps_total" => totals.tps_total += number(name, value)?,
        "is_available" => {
            if boolean(name, value)? {
                totals.is_available = true;
            }
        }
        "error_string" => {
            let s = string(name, value)?;
            totals.error_string.push_str(s);
            totals.error_string.push_str(", ");
        }
        "status_unknown" => return Ok(Merge::Ignored),
        _ => {
            return Err(StatError::UnknownStat {
                name: name.to_string(),
            });
        }
    }
    Ok(Merge::Merged)
}

fn number(name: &str, value: &StatValue) -> Result<f64, StatError> {
    value
        .as_f64()
        .ok_or_else(|| type_mismatch(name, "number", value))
}

fn boolean(name: &str, value: &StatValue) -> Result<bool, StatError> {
    match value {
        StatValue::Bool(b) => Ok(*b),
        other => Err(type_mismatch(name, "bool", other)),
    }
}

fn string<'a>(name: &str, value: &'a StatValue) -> Result<&'a str, StatError> {
    match value {
        StatValue::String(s) => Ok(s),
        other => Err(type_mismatch(name, "string", other)),
    }
}

fn type_mismatch(name: &str, expected: &'static str, actual: &StatValue) -> StatError {
    StatError::TypeMismatch {
        name: name.to_string(),
        expected,
        actual: format!("{} ({})", actual, actual.kind()),
    }
}
