//! Customer address records.

use serde::{Deserialize, Serialize};

use driftwood_core::{
    AddressCandidate, AddressId, AddressKind, AddressValidationStatus, CandidateError,
    CorrectedAddress,
};

/// A customer address as stored in the address book.
///
/// Carries the validation status alongside the fields; the status is
/// serialized to its blob form only at the repository boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAddress {
    /// Address-book key.
    pub id: AddressId,
    /// Owning customer.
    pub customer_id: String,
    /// Street name (without house number).
    pub street: String,
    /// House number, where the locale separates it from the street.
    pub house_number: Option<String>,
    /// City.
    pub city: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
    /// Delivery kind.
    pub kind: AddressKind,
    /// Last known validation status, if the address was ever checked.
    pub validation_status: Option<AddressValidationStatus>,
}

impl CustomerAddress {
    /// Build the verification candidate for this address.
    ///
    /// # Errors
    ///
    /// Returns a [`CandidateError`] if a required field is empty; the form
    /// layer should have rejected such input already.
    pub fn candidate(&self) -> Result<AddressCandidate, CandidateError> {
        AddressCandidate::new(
            &self.street,
            self.house_number.as_deref(),
            &self.city,
            &self.postal_code,
            &self.country_code,
        )
    }

    /// Overwrite the correctable fields with an accepted suggestion.
    ///
    /// Only street, house number, city, and postal code change; the country
    /// and the delivery kind stay as the customer entered them.
    pub fn apply_correction(&mut self, correction: &CorrectedAddress) {
        self.street = correction.street.clone();
        self.house_number = correction.house_number.clone();
        self.city = correction.locality.clone();
        self.postal_code = correction.postal_code.clone();
    }
}
