// History store tests: vitals, combined state, span collapsing, caps

mod common;

use bytes::Bytes;
use cachemon::cache::{Handler, PollResponse};
use cachemon::history::HistoryStore;
use cachemon::models::PollResult;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::time::Duration;

const CONNS: &str = "proxy.process.http.current_client_connections";

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn result(cache: &str, body: Option<Vec<u8>>, time: DateTime<Utc>) -> PollResult {
    let (handler, _rx) = Handler::new(1);
    handler.process(PollResponse {
        cache_id: cache.into(),
        body: body.map(Bytes::from),
        request_time: Duration::from_millis(20),
        completed_at: time,
        error: None,
        poll_id: 1,
        poll_finished: None,
    })
}

fn conns(n: u64, tx_bytes: u64) -> Vec<u8> {
    common::payload(json!({ CONNS: n }), tx_bytes)
}

#[test]
fn vitals_kbps_from_successive_results() {
    let store = HistoryStore::new(10);
    store.record(&result(common::EDGE, Some(conns(1, 0)), at(0)));
    let first = store.latest_info(common::EDGE).unwrap();
    assert_eq!(first.vitals.kbps_out, 0);
    assert_eq!(first.vitals.load_avg, 0.30);
    assert_eq!(first.vitals.bytes_in, 1000);
    assert_eq!(first.vitals.max_kbps_out, 10_000_000);

    store.record(&result(common::EDGE, Some(conns(1, 1_250_000)), at(10)));
    let second = store.latest_info(common::EDGE).unwrap();
    assert_eq!(second.vitals.bytes_out, 1_250_000);
    assert_eq!(second.vitals.kbps_out, 1000);
}

#[test]
fn vitals_counter_reset_yields_zero_kbps() {
    let store = HistoryStore::new(10);
    store.record(&result(common::EDGE, Some(conns(1, 5_000)), at(0)));
    store.record(&result(common::EDGE, Some(conns(1, 100)), at(10)));
    assert_eq!(store.latest_info(common::EDGE).unwrap().vitals.kbps_out, 0);
}

#[test]
fn equal_values_collapse_into_one_entry() {
    let store = HistoryStore::new(10);
    for (i, n) in [3, 3, 3, 4].into_iter().enumerate() {
        store.record(&result(common::EDGE, Some(conns(n, 0)), at(i as i64)));
    }
    let history = store.stat_history(common::EDGE, CONNS);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].value, json!(4));
    assert_eq!(history[0].span, 1);
    assert_eq!(history[1].value, json!(3));
    assert_eq!(history[1].span, 3);
    assert_eq!(history[1].time, at(2));
}

#[test]
fn history_is_capped() {
    let store = HistoryStore::new(2);
    for i in 0..5 {
        store.record(&result(common::EDGE, Some(conns(i, 0)), at(i as i64)));
    }
    let history = store.stat_history(common::EDGE, CONNS);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].value, json!(4));
}

#[test]
fn failed_poll_records_unavailable_state_without_raw_stats() {
    let store = HistoryStore::new(10);
    store.record(&result(common::MID, None, at(0)));
    assert_eq!(store.combined_state(common::MID).map(|s| s.is_available), Some(false));
    let info = store.latest_info(common::MID).unwrap();
    assert_eq!(info.error.as_deref(), Some("handler got no payload"));
    assert!(store.stat_history(common::MID, CONNS).is_empty());

    store.record(&result(common::MID, Some(conns(1, 0)), at(1)));
    assert_eq!(store.combined_state(common::MID).map(|s| s.is_available), Some(true));
    assert_eq!(store.cache_count(), 1);
}

#[test]
fn cache_reporting_not_available_is_unavailable() {
    let body = common::with_system(conns(1, 0), "notAvailable", json!(true));
    let store = HistoryStore::new(10);
    store.record(&result(common::EDGE, Some(body), at(0)));
    assert_eq!(store.combined_state(common::EDGE).map(|s| s.is_available), Some(false));
}

#[test]
fn integer_stats_are_served_as_integers() {
    let store = HistoryStore::new(10);
    let ats = json!({
        CONNS: 42,
        "proxy.process.http.total_incoming_bytes": 9_007_199_254_740_993u64
    });
    let body = common::payload(ats, 0);
    store.record(&result(common::EDGE, Some(body), at(0)));
    assert_eq!(store.stat_history(common::EDGE, CONNS)[0].value, json!(42));
    let bytes = store.stat_history(common::EDGE, "proxy.process.http.total_incoming_bytes");
    assert_eq!(bytes[0].value, json!(9_007_199_254_740_993u64));
    assert_eq!(serde_json::to_string(&bytes[0].value).unwrap(), "9007199254740993");
}

#[test]
fn recording_continues_after_huge_interface_speed() {
    let store = HistoryStore::new(10);
    let speed = json!(9_300_000_000_000_000i64);
    let body = common::with_system(conns(1, 0), "inf.speed", speed);
    store.record(&result(common::EDGE, Some(body), at(0)));
    store.record(&result(common::EDGE, Some(conns(2, 0)), at(1)));
    let info = store.latest_info(common::EDGE).unwrap();
    assert_eq!(info.vitals.max_kbps_out, 10_000_000);
    assert_eq!(store.cache_count(), 1);
    let history = store.stat_history(common::EDGE, CONNS);
    assert_eq!(history.len(), 2);
}

#[test]
fn huge_interface_speed_recorded_without_overflow() {
    let store = HistoryStore::new(10);
    let speed = json!(9_300_000_000_000_000i64);
    let body = common::with_system(conns(1, 0), "inf.speed", speed);
    store.record(&result(common::EDGE, Some(body), at(0)));
    let info = store.latest_info(common::EDGE).unwrap();
    assert_eq!(info.vitals.max_kbps_out, i64::MAX);
}

#[test]
fn unparsable_proc_net_dev_zeroes_byte_counters() {
    let store = HistoryStore::new(10);
    let body = common::with_system(conns(1, 0), "proc.net.dev", json!("eth0: garbage"));
    store.record(&result(common::EDGE, Some(body), at(0)));
    let info = store.latest_info(common::EDGE).unwrap();
    assert_eq!(info.vitals.bytes_out, 0);
    assert_eq!(info.vitals.bytes_in, 0);
    assert_eq!(store.combined_state(common::EDGE).map(|s| s.is_available), Some(true));
}
