//! Error types shared across the crate.

use crate::compat::Capability;

/// Failure surfaced by the compatibility shim.
///
/// Only actionable calls (storage reads and writes on a promise-style host)
/// produce this; everything else recovers to a neutral value instead.
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    #[error("{capability} rejected: {message}")]
    Rejected {
        capability: Capability,
        message: String,
    },
    #[error("{capability} returned an unexpected payload: {source}")]
    Payload {
        capability: Capability,
        #[source]
        source: serde_json::Error,
    },
    #[error("no extension api available on this host")]
    NoNativeApi,
}

/// Validation failure in the settings form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("configure a mirror domain before enabling")]
    EnableWithoutDomain,
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
    #[error("{0} is always enabled")]
    ForcedPlatform(String),
}
