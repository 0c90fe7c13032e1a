//! The address-validation workflow.
//!
//! Ties the trigger policy, the verification client, and the reconciler
//! together, and records customer decisions. This is the single entry point
//! the checkout and account flows use; everything it needs arrives as an
//! explicit parameter or collaborator, never as ambient session state.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use driftwood_core::{
    AddressId, AddressValidationStatus, CandidateError, CorrectedAddress, UserAction,
    ValidationOutcome, reconcile, should_validate,
};

use crate::db::RepositoryError;
use crate::models::CustomerAddress;
use crate::services::verifier::VerifierClient;

/// The host-platform address-book collaborator.
///
/// Read-modify-write of an address record and its status blob; the
/// implementation guarantees the write is atomic with any other same-request
/// writes.
pub trait AddressBook: Send + Sync {
    /// Get an address by its address-book key.
    fn find(
        &self,
        id: &AddressId,
    ) -> impl Future<Output = Result<Option<CustomerAddress>, RepositoryError>> + Send;

    /// Persist an address together with its validation status.
    fn save(
        &self,
        address: &CustomerAddress,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Errors that can occur in the validation workflow.
///
/// A verification-service failure is deliberately *not* an error here: it
/// surfaces as [`ValidationOutcome::Indeterminate`] in the report, because
/// an outage is not an invalid address.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Address-book access failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// The referenced address does not exist.
    #[error("unknown address: {0}")]
    UnknownAddress(AddressId),

    /// The address is missing fields required for verification.
    #[error("invalid address fields: {0}")]
    Candidate(#[from] CandidateError),

    /// A customer decision was recorded on an address with no review
    /// pending.
    #[error("no review pending for address: {0}")]
    NoPendingReview(AddressId),
}

/// Result of a validation attempt, as reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Which address this report is about. Always present, so the caller
    /// can reference the failing address even when no correction was
    /// eligible.
    pub address_id: AddressId,
    /// Tri-state outcome of the attempt.
    pub outcome: ValidationOutcome,
    /// Proposed correction, when the address is invalid and the match was
    /// complete enough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<CorrectedAddress>,
    /// The status now recorded on the address, if any was written or found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AddressValidationStatus>,
}

/// The address-validation service.
pub struct ValidationService<B> {
    verifier: VerifierClient,
    book: B,
    grace_period_days: i64,
    enabled: bool,
}

impl<B: AddressBook> ValidationService<B> {
    /// Create a new validation service.
    pub const fn new(verifier: VerifierClient, book: B, grace_period_days: i64, enabled: bool) -> Self {
        Self {
            verifier,
            book,
            grace_period_days,
            enabled,
        }
    }

    /// Validate a stored address by its address-book key.
    ///
    /// The status is persisted only for logged-in customers; guests have no
    /// address-book record to carry it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAddress`] if the address does not
    /// exist, or a repository/candidate error. A verification-service
    /// failure is not an error; it yields an indeterminate report.
    pub async fn validate_address(
        &self,
        id: &AddressId,
        is_logged_in: bool,
    ) -> Result<ValidationReport, ValidationError> {
        let address = self
            .book
            .find(id)
            .await?
            .ok_or_else(|| ValidationError::UnknownAddress(id.clone()))?;

        self.validate_record(address, is_logged_in).await
    }

    /// Validate an address record, persisting the resulting status when
    /// `persist` is set.
    ///
    /// # Errors
    ///
    /// Returns a repository error if persisting fails, or a candidate error
    /// if required fields are empty.
    pub async fn validate_record(
        &self,
        mut address: CustomerAddress,
        persist: bool,
    ) -> Result<ValidationReport, ValidationError> {
        let now = Utc::now();

        // Verification disabled: no conclusion, nothing written.
        if !self.enabled {
            return Ok(ValidationReport {
                address_id: address.id,
                outcome: ValidationOutcome::Indeterminate,
                suggestion: None,
                status: None,
            });
        }

        // Carrier-managed destinations carry addresses issued by the
        // carrier itself; record the deliberate skip and move on.
        if address.kind.is_carrier_managed() {
            let status = AddressValidationStatus::ignored(true, now);
            address.validation_status = Some(status);
            if persist {
                self.book.save(&address).await?;
            }
            return Ok(ValidationReport {
                address_id: address.id,
                outcome: ValidationOutcome::Valid,
                suggestion: None,
                status: Some(status),
            });
        }

        // Not due per the trigger policy: answer from the stored status.
        if !should_validate(address.validation_status.as_ref(), now, self.grace_period_days) {
            let status = address.validation_status;
            let outcome = if status.is_some_and(|s| s.is_valid) {
                ValidationOutcome::Valid
            } else {
                ValidationOutcome::Invalid
            };
            return Ok(ValidationReport {
                address_id: address.id,
                outcome,
                suggestion: None,
                status,
            });
        }

        let candidate = address.candidate()?;

        let matched = match self.verifier.verify(&candidate).await {
            Ok(matched) => matched,
            Err(e) => {
                // Indeterminate, not invalid: the stored status stays
                // untouched so the next attempt re-verifies.
                tracing::warn!(address_id = %address.id, error = %e, "address verification unavailable");
                return Ok(ValidationReport {
                    address_id: address.id,
                    outcome: ValidationOutcome::Indeterminate,
                    suggestion: None,
                    status: address.validation_status,
                });
            }
        };

        let reconciliation = reconcile(&candidate, &matched);
        let (outcome, status) = if reconciliation.is_valid {
            (
                ValidationOutcome::Valid,
                AddressValidationStatus::verified_valid(now),
            )
        } else {
            (
                ValidationOutcome::Invalid,
                AddressValidationStatus::pending_review(now),
            )
        };

        address.validation_status = Some(status);
        if persist {
            self.book.save(&address).await?;
        }

        tracing::info!(address_id = %address.id, %outcome, "address validated");
        Ok(ValidationReport {
            address_id: address.id,
            outcome,
            suggestion: reconciliation.suggestion,
            status: Some(status),
        })
    }

    /// Record that the customer accepted a corrected address.
    ///
    /// Overwrites the correctable fields with the suggested values and marks
    /// the address valid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAddress`],
    /// [`ValidationError::NoPendingReview`] if no review is awaiting a
    /// decision, or a repository error.
    pub async fn accept_suggestion(
        &self,
        id: &AddressId,
        suggestion: &CorrectedAddress,
    ) -> Result<CustomerAddress, ValidationError> {
        let mut address = self.load(id).await?;
        require_pending_review(&address)?;
        address.apply_correction(suggestion);
        address.validation_status = Some(AddressValidationStatus::accepted(Utc::now()));
        self.book.save(&address).await?;

        tracing::info!(address_id = %id, "correction accepted");
        Ok(address)
    }

    /// Record that the customer kept their address despite a correction.
    ///
    /// Fields stay untouched; the address will not be re-checked until the
    /// grace period elapses.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAddress`],
    /// [`ValidationError::NoPendingReview`] if no review is awaiting a
    /// decision, or a repository error.
    pub async fn decline_suggestion(&self, id: &AddressId) -> Result<CustomerAddress, ValidationError> {
        let mut address = self.load(id).await?;
        require_pending_review(&address)?;
        address.validation_status = Some(AddressValidationStatus::declined(Utc::now()));
        self.book.save(&address).await?;

        tracing::info!(address_id = %id, "correction declined");
        Ok(address)
    }

    /// Record a dismissal of a pending review.
    ///
    /// `assumed_validity` is `false` when the customer dismissed the review
    /// without deciding; carrier-managed kinds record their own
    /// `assumed_validity = true` skip inside the validation flow.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAddress`],
    /// [`ValidationError::NoPendingReview`] if no review is awaiting a
    /// decision, or a repository error.
    pub async fn ignore(
        &self,
        id: &AddressId,
        assumed_validity: bool,
    ) -> Result<CustomerAddress, ValidationError> {
        let mut address = self.load(id).await?;
        require_pending_review(&address)?;
        address.validation_status =
            Some(AddressValidationStatus::ignored(assumed_validity, Utc::now()));
        self.book.save(&address).await?;

        tracing::info!(address_id = %id, assumed_validity, "validation ignored");
        Ok(address)
    }

    async fn load(&self, id: &AddressId) -> Result<CustomerAddress, ValidationError> {
        self.book
            .find(id)
            .await?
            .ok_or_else(|| ValidationError::UnknownAddress(id.clone()))
    }
}

/// Customer decisions are only legal while a review is pending: an invalid
/// status still awaiting an action.
fn require_pending_review(address: &CustomerAddress) -> Result<(), ValidationError> {
    let pending = address
        .validation_status
        .is_some_and(|s| !s.is_valid && s.user_action == UserAction::Pending);
    if pending {
        Ok(())
    } else {
        Err(ValidationError::NoPendingReview(address.id.clone()))
    }
}
