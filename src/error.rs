// Error types for poll ingestion and per-stat aggregation.

use thiserror::Error;

/// Failure of a whole poll result. The result is still emitted, carrying this error.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("poll failed: {0}")]
    Transport(String),

    #[error("handler got no payload")]
    NoPayload,

    #[error("decoding stats payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure scoped to a single stat line of one poll. Collected, never fatal to the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    #[error("stat '{stat}' has unknown initial part '{part}'")]
    UnknownInitialPart { stat: String, part: String },

    #[error("stat '{stat}' has no plugin part")]
    MissingPluginPart { stat: String },

    #[error("stat '{stat}' has unknown plugin part '{part}'")]
    UnknownPluginPart { stat: String, part: String },

    #[error("stat '{stat}' has no remap_stats delivery service and name parts")]
    MissingRemapParts { stat: String },

    #[error("no delivery service match for fqdn '{fqdn}' stat '{stat}'")]
    NoDeliveryService { fqdn: String, stat: String },

    #[error("empty delivery service for fqdn '{fqdn}' stat '{stat}'")]
    EmptyDeliveryService { fqdn: String, stat: String },

    #[error("stat '{name}' value expected {expected} actual {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: String,
    },

    #[error("unknown stat '{name}'")]
    UnknownStat { name: String },

    #[error("cache '{cache}' missing from cachegroup table")]
    MissingCachegroup { cache: String },

    #[error("cache '{cache}' missing from type table")]
    MissingType { cache: String },
}
