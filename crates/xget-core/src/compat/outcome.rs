/// Why a call resolved to a stand-in value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// The capability does not exist in this host.
    Unavailable,
    /// Callback-style call completed with the host's last-error slot set.
    LastError(String),
    /// Promise-style call rejected on a non-actionable capability.
    Rejected(String),
    /// The host dropped the completion callback without calling it.
    Abandoned,
    /// The payload did not have the expected shape.
    Malformed(String),
}

/// Result of a best-effort host call: a real value, or a default that stands
/// in for a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Value(T),
    Recovered { value: T, reason: Recovery },
}

impl<T> ApiOutcome<T> {
    pub fn recovered(value: T, reason: Recovery) -> Self {
        ApiOutcome::Recovered { value, reason }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, ApiOutcome::Recovered { .. })
    }

    pub fn recovery(&self) -> Option<&Recovery> {
        match self {
            ApiOutcome::Value(_) => None,
            ApiOutcome::Recovered { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            ApiOutcome::Value(v) | ApiOutcome::Recovered { value: v, .. } => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            ApiOutcome::Value(v) | ApiOutcome::Recovered { value: v, .. } => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Value(v) => ApiOutcome::Value(f(v)),
            ApiOutcome::Recovered { value, reason } => ApiOutcome::Recovered {
                value: f(value),
                reason,
            },
        }
    }
}
