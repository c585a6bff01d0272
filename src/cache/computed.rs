// Stats computed by the monitor rather than reported by the cache.
// The table is static and every entry is a pure function of its arguments.

use serde_json::{Value, json};

use crate::models::{CacheStatus, IsAvailable, ResultInfo, TmProfile, TrafficServer};

pub type StatComputeFn = fn(&ResultInfo, &TrafficServer, &TmProfile, &IsAvailable) -> Value;

pub static COMPUTED_STATS: &[(&str, StatComputeFn)] = &[
    ("availableBandwidthInKbps", |info, _, _, _| {
        json!(info.vitals.max_kbps_out.saturating_sub(info.vitals.kbps_out))
    }),
    ("availableBandwidthInMbps", |info, _, _, _| {
        json!(info.vitals.max_kbps_out.saturating_sub(info.vitals.kbps_out) / 1000)
    }),
    ("bandwidth", |info, _, _, _| json!(info.vitals.kbps_out)),
    ("error-string", |info, _, _, _| match &info.error {
        Some(e) => json!(e),
        None => json!("false"),
    }),
    // A cache missing from the state table defaults to unavailable.
    ("isAvailable", |_, _, _, state| json!(state.is_available)),
    ("isHealthy", |_, server, _, state| {
        if CacheStatus::from_status(&server.server_status) == CacheStatus::AdminDown {
            return json!(true);
        }
        json!(state.is_available)
    }),
    ("kbps", |info, _, _, _| json!(info.vitals.kbps_out)),
    ("loadavg", |info, _, _, _| json!(info.vitals.load_avg)),
    ("maxKbps", |info, _, _, _| json!(info.vitals.max_kbps_out)),
    ("queryTime", |info, _, _, _| {
        json!(info.request_time.as_millis() as u64)
    }),
    ("stateUrl", |_, _, profile, _| {
        json!(profile.parameters.health_polling_url)
    }),
    ("status", |_, server, _, _| json!(server.server_status)),
    ("system.astatsLoad", |info, _, _, _| json!(info.system.astats_load)),
    ("system.configReloadRequests", |info, _, _, _| {
        json!(info.system.config_reload_requests)
    }),
    ("system.configReloads", |info, _, _, _| {
        json!(info.system.config_reloads)
    }),
    ("system.inf.name", |info, _, _, _| json!(info.system.inf_name)),
    ("system.inf.speed", |info, _, _, _| json!(info.system.inf_speed)),
    ("system.lastReload", |info, _, _, _| json!(info.system.last_reload)),
    ("system.lastReloadRequest", |info, _, _, _| {
        json!(info.system.last_reload_request)
    }),
    ("system.notAvailable", |info, _, _, _| {
        json!(info.system.not_available)
    }),
    ("system.proc.loadavg", |info, _, _, _| {
        json!(info.system.proc_loadavg)
    }),
    ("system.proc.net.dev", |info, _, _, _| {
        json!(info.system.proc_net_dev)
    }),
];
