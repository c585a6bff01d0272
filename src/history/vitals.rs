// Vitals derived from a result and the previous retained result of the same cache.

use chrono::{DateTime, Utc};

use crate::cache::proc_net_dev::{self, ProcNetDevError};
use crate::models::{PollResult, ResultInfo, Vitals};

const BITS_PER_BYTE: f64 = 8.0;
const BITS_PER_KILOBIT: f64 = 1000.0;
const KBPS_PER_MBPS: i64 = 1000;

pub fn compute_vitals(result: &PollResult, prev: Option<&ResultInfo>) -> Vitals {
    if result.error.is_some() {
        return Vitals::default();
    }
    let system = &result.astats.system;

    let load_avg = system
        .proc_loadavg
        .split_whitespace()
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or_else(|| {
            tracing::debug!(
                cache = %result.id,
                loadavg = %system.proc_loadavg,
                "unparsable proc.loadavg"
            );
            0.0
        });

    let bytes_out = match result.precomputed.out_bytes {
        0 => counter_or_zero(
            result,
            "out",
            proc_net_dev::out_bytes(&system.proc_net_dev, &system.inf_name),
        ),
        precomputed => precomputed,
    } as i64;
    let bytes_in = counter_or_zero(
        result,
        "in",
        proc_net_dev::in_bytes(&system.proc_net_dev, &system.inf_name),
    ) as i64;

    let kbps_out = prev
        .filter(|p| p.available && p.error.is_none())
        .and_then(|p| kbps_between(p, result.time, bytes_out))
        .unwrap_or(0);

    Vitals {
        load_avg,
        bytes_out,
        bytes_in,
        kbps_out,
        max_kbps_out: system.inf_speed.saturating_mul(KBPS_PER_MBPS),
    }
}

fn counter_or_zero(
    result: &PollResult,
    direction: &'static str,
    counter: Result<u64, ProcNetDevError>,
) -> u64 {
    counter.unwrap_or_else(|e| {
        tracing::error!(
            cache = %result.id,
            direction,
            error = %e,
            "extracting interface bytes"
        );
        0
    })
}

/// Outbound kbps from `prev` to a sample of `bytes_out` at `now`. `None` when time did not
/// advance or the counter went backwards (cache restart, counter wrap).
fn kbps_between(prev: &ResultInfo, now: DateTime<Utc>, bytes_out: i64) -> Option<i64> {
    let elapsed_ms = (now - prev.time).num_milliseconds();
    let delta = bytes_out.checked_sub(prev.vitals.bytes_out)?;
    if elapsed_ms <= 0 || delta < 0 {
        return None;
    }
    let delta_bits = delta as f64 * BITS_PER_BYTE;
    let elapsed_secs = elapsed_ms as f64 / 1000.0;
    Some((delta_bits / BITS_PER_KILOBIT / elapsed_secs) as i64)
}
