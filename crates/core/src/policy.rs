//! Trigger policy: when a stored address must be (re)verified.

use chrono::{DateTime, Utc};

use crate::types::{AddressValidationStatus, UserAction};

/// Decide whether an address requires (re)validation.
///
/// Pure function of its inputs:
/// - `None` (never validated) always requires validation.
/// - A status with `is_valid == true` never requires validation, whatever
///   the customer action or timestamp.
/// - An invalid status still awaiting a decision (`Pending`) always
///   requires validation.
/// - An invalid status the customer declined or dismissed requires
///   validation only once strictly more than `grace_period_days` whole days
///   have elapsed since the status was set.
#[must_use]
pub fn should_validate(
    status: Option<&AddressValidationStatus>,
    now: DateTime<Utc>,
    grace_period_days: i64,
) -> bool {
    let Some(status) = status else {
        return true;
    };

    if status.is_valid {
        return false;
    }

    match status.user_action {
        UserAction::Pending => true,
        UserAction::Decline | UserAction::Ignore => {
            (now - status.timestamp).num_days() > grace_period_days
        }
        // Accept sets is_valid, so an invalid Accept status cannot arise
        // through legal transitions; treat it as still awaiting review.
        UserAction::Accept => true,
    }
}
