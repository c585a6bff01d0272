// Wire shapes of the cache stats API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CacheName;

/// HTTP date layout, e.g. "Mon, 02 Jan 2006 15:04:05 GMT".
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Metadata carried by every API response: the echoed query string and the response date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonApiData {
    #[serde(rename = "pp")]
    pub query_params: String,
    #[serde(rename = "date")]
    pub date: String,
}

impl CommonApiData {
    pub fn new(query_params: &str, now: DateTime<Utc>) -> Self {
        Self {
            query_params: query_params.to_string(),
            date: now.format(HTTP_DATE_FORMAT).to_string(),
        }
    }
}

/// One history entry: `span` consecutive identical samples collapsed into one, `time` in
/// Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultStatVal {
    pub value: serde_json::Value,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    pub span: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub common: CommonApiData,
    pub caches: BTreeMap<CacheName, BTreeMap<String, Vec<ResultStatVal>>>,
}
