//! Tri-state result of a validation attempt.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a single validation attempt.
///
/// A failed call to the verification service is `Indeterminate`, never
/// `Invalid`: a transient outage must not be recorded as a permanent
/// address rejection, and the caller decides whether to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// The address matched the verification result.
    Valid,
    /// The address did not match; a correction may have been proposed.
    Invalid,
    /// The address could not be verified (service failure, or verification
    /// disabled); no conclusion was reached.
    Indeterminate,
}

impl ValidationOutcome {
    /// Whether checkout may proceed with this address without customer
    /// intervention.
    ///
    /// Indeterminate outcomes do not block: an external outage must not
    /// stop order placement.
    #[must_use]
    pub const fn allows_checkout(&self) -> bool {
        matches!(self, Self::Valid | Self::Indeterminate)
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}
