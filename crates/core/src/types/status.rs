//! Validation status persisted on an address record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the customer did with a verification result, if anything.
///
/// Only meaningful when the owning status has `is_valid == false`; a valid
/// address never re-enters the review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// Verification flagged the address; the customer has not decided yet.
    #[default]
    Pending,
    /// The customer accepted the corrected address.
    Accept,
    /// The customer kept their address despite the correction.
    Decline,
    /// Validation was deliberately skipped (dismissed, or carrier-managed
    /// address kind).
    Ignore,
}

/// The validation status blob persisted on an address record.
///
/// Created on the first validation attempt for an address, overwritten in
/// place on every later validation call and on every explicit customer
/// decision. Serialized as JSON only at the persistence boundary, with the
/// timestamp as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValidationStatus {
    /// Last known validation outcome.
    pub is_valid: bool,
    /// What the customer did with a suggestion, if any.
    pub user_action: UserAction,
    /// When this status was last set.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl AddressValidationStatus {
    /// Status after verification confirmed the address as submitted.
    #[must_use]
    pub const fn verified_valid(now: DateTime<Utc>) -> Self {
        Self {
            is_valid: true,
            user_action: UserAction::Pending,
            timestamp: now,
        }
    }

    /// Status after verification flagged the address; awaiting a decision.
    #[must_use]
    pub const fn pending_review(now: DateTime<Utc>) -> Self {
        Self {
            is_valid: false,
            user_action: UserAction::Pending,
            timestamp: now,
        }
    }

    /// Status after the customer accepted a corrected address.
    #[must_use]
    pub const fn accepted(now: DateTime<Utc>) -> Self {
        Self {
            is_valid: true,
            user_action: UserAction::Accept,
            timestamp: now,
        }
    }

    /// Status after the customer declined a corrected address.
    #[must_use]
    pub const fn declined(now: DateTime<Utc>) -> Self {
        Self {
            is_valid: false,
            user_action: UserAction::Decline,
            timestamp: now,
        }
    }

    /// Status after validation was deliberately skipped.
    ///
    /// `assumed_validity` is `true` for carrier-managed address kinds, which
    /// are always treated as deliverable, and `false` when the customer
    /// dismissed the review without deciding.
    #[must_use]
    pub const fn ignored(assumed_validity: bool, now: DateTime<Utc>) -> Self {
        Self {
            is_valid: assumed_validity,
            user_action: UserAction::Ignore,
            timestamp: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_constructors_set_expected_fields() {
        let now = Utc::now();

        let status = AddressValidationStatus::verified_valid(now);
        assert!(status.is_valid);
        assert_eq!(status.user_action, UserAction::Pending);

        let status = AddressValidationStatus::pending_review(now);
        assert!(!status.is_valid);
        assert_eq!(status.user_action, UserAction::Pending);

        let status = AddressValidationStatus::accepted(now);
        assert!(status.is_valid);
        assert_eq!(status.user_action, UserAction::Accept);

        let status = AddressValidationStatus::declined(now);
        assert!(!status.is_valid);
        assert_eq!(status.user_action, UserAction::Decline);
        assert_eq!(status.timestamp, now);
    }

    #[test]
    fn test_ignored_carries_assumed_validity() {
        let now = Utc::now();
        assert!(AddressValidationStatus::ignored(true, now).is_valid);
        assert!(!AddressValidationStatus::ignored(false, now).is_valid);
    }

    #[test]
    fn test_timestamp_serializes_as_epoch_millis() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let status = AddressValidationStatus::declined(now);

        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["timestamp"], now.timestamp_millis());
        assert_eq!(json["user_action"], "decline");
        assert_eq!(json["is_valid"], false);
    }

    #[test]
    fn test_serde_roundtrip() {
        let status = AddressValidationStatus::accepted(Utc::now());
        let json = serde_json::to_string(&status).unwrap();
        let parsed: AddressValidationStatus = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.is_valid, status.is_valid);
        assert_eq!(parsed.user_action, status.user_action);
        // Millisecond storage truncates sub-millisecond precision.
        assert_eq!(
            parsed.timestamp.timestamp_millis(),
            status.timestamp.timestamp_millis()
        );
    }
}
