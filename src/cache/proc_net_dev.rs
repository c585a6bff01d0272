// Byte counters from a cache's /proc/net/dev dump.
// Layout after "<iface>:" is 8 receive fields then 8 transmit fields; bytes lead each group.

use std::num::ParseIntError;
use thiserror::Error;

const MIN_FIELDS: usize = 10;
const BYTES_IN_FIELD: usize = 0;
const BYTES_OUT_FIELD: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcNetDevError {
    #[error("proc.net.dev empty")]
    Empty,

    #[error("interface name empty")]
    EmptyInterface,

    #[error("interface '{iface}' not found in proc.net.dev")]
    InterfaceNotFound { iface: String },

    #[error("proc.net.dev interface '{iface}' unknown format: {fields} fields")]
    UnknownFormat { iface: String, fields: usize },

    #[error("proc.net.dev interface '{iface}' counter: {source}")]
    InvalidCounter {
        iface: String,
        #[source]
        source: ParseIntError,
    },
}

/// Transmitted bytes of `iface`.
pub fn out_bytes(proc_net_dev: &str, iface: &str) -> Result<u64, ProcNetDevError> {
    counter(proc_net_dev, iface, BYTES_OUT_FIELD)
}

/// Received bytes of `iface`.
pub fn in_bytes(proc_net_dev: &str, iface: &str) -> Result<u64, ProcNetDevError> {
    counter(proc_net_dev, iface, BYTES_IN_FIELD)
}

fn counter(proc_net_dev: &str, iface: &str, field: usize) -> Result<u64, ProcNetDevError> {
    let fields = interface_fields(proc_net_dev, iface)?;
    fields[field]
        .parse::<u64>()
        .map_err(|source| ProcNetDevError::InvalidCounter {
            iface: iface.to_string(),
            source,
        })
}

/// Space separated fields following the interface name on its line. Always at least
/// `MIN_FIELDS` long on success.
fn interface_fields<'a>(
    proc_net_dev: &'a str,
    iface: &str,
) -> Result<Vec<&'a str>, ProcNetDevError> {
    if proc_net_dev.is_empty() {
        return Err(ProcNetDevError::Empty);
    }
    if iface.is_empty() {
        return Err(ProcNetDevError::EmptyInterface);
    }
    let pos = proc_net_dev
        .find(iface)
        .ok_or_else(|| ProcNetDevError::InterfaceNotFound {
            iface: iface.to_string(),
        })?;

    let rest = &proc_net_dev[pos + iface.len()..];
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let line = rest.lines().next().unwrap_or_default();
    let fields: Vec<&str> = line.split(' ').filter(|f| !f.is_empty()).collect();
    if fields.len() < MIN_FIELDS {
        return Err(ProcNetDevError::UnknownFormat {
            iface: iface.to_string(),
            fields: fields.len(),
        });
    }
    Ok(fields)
}
