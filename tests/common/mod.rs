// Shared test helpers

#![allow(dead_code)]

use cachemon::models::{MonitorConfig, TmParameters, TmProfile, TrafficServer};
use cachemon::topology::Topology;

pub const EDGE: &str = "edge1";
pub const MID: &str = "mid1";

/// Two caches, one HTTP routed delivery service (`*.ds-1.example.com`) and one DNS routed
/// (`edge.ds-2.example.com`).
pub fn topology() -> Topology {
    let mut t = Topology::default();
    t.server_cachegroups.insert(EDGE.into(), "cg-east".into());
    t.server_cachegroups.insert(MID.into(), "cg-mid".into());
    t.server_types.insert(EDGE.into(), "EDGE".into());
    t.server_types.insert(MID.into(), "MID".into());
    t.delivery_service_wildcards
        .insert("ds-1.example.com".into(), "ds-1".into());
    t.delivery_service_fqdns
        .insert("edge.ds-2.example.com".into(), "ds-2".into());
    t.monitor_config = monitor_config();
    t
}

pub fn monitor_config() -> MonitorConfig {
    let mut mc = MonitorConfig::default();
    for (host, status) in [(EDGE, "REPORTED"), (MID, "ADMIN_DOWN")] {
        mc.traffic_servers.insert(
            host.into(),
            TrafficServer {
                host_name: host.into(),
                profile: "EDGE_PROFILE".into(),
                server_status: status.into(),
            },
        );
    }
    mc.profiles.insert(
        "EDGE_PROFILE".into(),
        TmProfile {
            name: "EDGE_PROFILE".into(),
            parameters: TmParameters {
                health_polling_url: "http://${hostname}/_astats".into(),
            },
        },
    );
    mc
}

/// A /proc/net/dev dump whose `eth0` line reports `rx` bytes received and `tx` sent.
pub fn proc_net_dev(rx: u64, tx: u64) -> String {
    format!(
        "Inter-|   Receive                                                |  Transmit\n \
         face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n    \
         lo: 100 1 0 0 0 0 0 0 100 1 0 0 0 0 0 0\n  \
         eth0: {rx} 10 0 0 0 0 0 0 {tx} 20 0 0 0 0 0 0"
    )
}

/// Stats payload body as served by a cache, with the given `ats` entries.
pub fn payload(ats: serde_json::Value, tx_bytes: u64) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "ats": ats,
        "system": {
            "inf.name": "eth0",
            "inf.speed": 10000,
            "proc.net.dev": proc_net_dev(1000, tx_bytes),
            "proc.loadavg": "0.30 0.25 0.20 1/500 12345",
            "configReloadRequests": 2,
            "lastReloadRequest": 1700000000,
            "configReloads": 1,
            "lastReload": 1700000001,
            "astatsLoad": 1699999999,
            "notAvailable": false
        }
    }))
    .unwrap()
}

/// `body` with one `system` field replaced.
pub fn with_system(body: Vec<u8>, key: &str, value: serde_json::Value) -> Vec<u8> {
    let mut doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
    doc["system"][key] = value;
    serde_json::to_vec(&doc).unwrap()
}
