// Domain models: poll payloads and results, delivery service aggregates, topology records, API

mod api;
mod astats;
mod dsdata;
mod monitor_config;
mod result;

pub use api::{CacheStatsResponse, CommonApiData, ResultStatVal};
pub use astats::{Astats, AstatsSystem, StatValue};
pub use dsdata::{DsStat, StatTotals};
pub use monitor_config::{
    CacheStatus, IsAvailable, MonitorConfig, TmParameters, TmProfile, TrafficServer,
};
pub use result::{PollResult, PrecomputedData, ResultInfo, Vitals};

pub type CacheName = String;
pub type DeliveryServiceName = String;
