//! Address identifiers, candidates, and correction suggestions.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an address record in the platform address book.
///
/// Address-book keys are opaque strings assigned by the host platform, so
/// this is a newtype over `String` rather than a numeric ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(String);

impl AddressId {
    /// Create a new address ID from a platform key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AddressId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for AddressId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// The delivery kind of an address.
///
/// Carrier-managed destinations (parcel lockers, post office counters) have
/// addresses issued by the carrier itself, so they are always treated as
/// deliverable and never sent to the verification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// A regular street address.
    #[default]
    Residential,
    /// A carrier-managed parcel locker.
    ParcelLocker,
    /// A post office counter (held for pickup).
    PostOffice,
}

impl AddressKind {
    /// Whether addresses of this kind skip external verification entirely.
    #[must_use]
    pub const fn is_carrier_managed(&self) -> bool {
        matches!(self, Self::ParcelLocker | Self::PostOffice)
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Residential => write!(f, "residential"),
            Self::ParcelLocker => write!(f, "parcel_locker"),
            Self::PostOffice => write!(f, "post_office"),
        }
    }
}

impl std::str::FromStr for AddressKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "residential" => Ok(Self::Residential),
            "parcel_locker" => Ok(Self::ParcelLocker),
            "post_office" => Ok(Self::PostOffice),
            _ => Err(format!("invalid address kind: {s}")),
        }
    }
}

/// Errors that can occur when building an [`AddressCandidate`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum CandidateError {
    /// The street line is empty.
    #[error("street cannot be empty")]
    EmptyStreet,
    /// The locality (city) is empty.
    #[error("locality cannot be empty")]
    EmptyLocality,
    /// The postal code is empty.
    #[error("postal code cannot be empty")]
    EmptyPostalCode,
    /// The country code is empty.
    #[error("country cannot be empty")]
    EmptyCountry,
}

/// A normalized address submitted for verification.
///
/// Ephemeral and per-request: candidates are never persisted independently
/// of the owning address record.
///
/// ## Constraints
///
/// - `street`, `locality`, `postal_code`, and `country_code` must be
///   non-empty (after trimming)
/// - `house_number` is optional; when present it is appended to the street
///   line sent to the verification service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCandidate {
    /// Street name (without house number).
    pub street: String,
    /// House number, where the locale separates it from the street.
    pub house_number: Option<String>,
    /// City or locality.
    pub locality: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
}

impl AddressCandidate {
    /// Build a candidate from raw field values.
    ///
    /// Trims all fields and drops a blank house number.
    ///
    /// # Errors
    ///
    /// Returns a [`CandidateError`] if any required field is empty after
    /// trimming.
    pub fn new(
        street: &str,
        house_number: Option<&str>,
        locality: &str,
        postal_code: &str,
        country_code: &str,
    ) -> Result<Self, CandidateError> {
        let street = street.trim();
        if street.is_empty() {
            return Err(CandidateError::EmptyStreet);
        }
        let locality = locality.trim();
        if locality.is_empty() {
            return Err(CandidateError::EmptyLocality);
        }
        let postal_code = postal_code.trim();
        if postal_code.is_empty() {
            return Err(CandidateError::EmptyPostalCode);
        }
        let country_code = country_code.trim();
        if country_code.is_empty() {
            return Err(CandidateError::EmptyCountry);
        }

        let house_number = house_number
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_owned);

        Ok(Self {
            street: street.to_owned(),
            house_number,
            locality: locality.to_owned(),
            postal_code: postal_code.to_owned(),
            country_code: country_code.to_owned(),
        })
    }

    /// The full street line, with the house number appended when present.
    #[must_use]
    pub fn street_line(&self) -> String {
        match &self.house_number {
            Some(number) => format!("{} {number}", self.street),
            None => self.street.clone(),
        }
    }
}

/// A corrected address proposed by the reconciler.
///
/// Only produced when the verification match is complete enough to stand in
/// for the submitted address (see [`crate::reconcile`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectedAddress {
    /// Corrected street name.
    pub street: String,
    /// Corrected house number, when one was submitted.
    pub house_number: Option<String>,
    /// Corrected city.
    pub locality: String,
    /// Corrected postal code.
    pub postal_code: String,
    /// ISO 3166-2 region code of the match.
    pub region_code: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_requires_street() {
        let result = AddressCandidate::new("  ", None, "Springfield", "12345", "US");
        assert!(matches!(result, Err(CandidateError::EmptyStreet)));
    }

    #[test]
    fn test_candidate_requires_locality() {
        let result = AddressCandidate::new("Main St", None, "", "12345", "US");
        assert!(matches!(result, Err(CandidateError::EmptyLocality)));
    }

    #[test]
    fn test_candidate_requires_postal_code() {
        let result = AddressCandidate::new("Main St", None, "Springfield", " ", "US");
        assert!(matches!(result, Err(CandidateError::EmptyPostalCode)));
    }

    #[test]
    fn test_candidate_requires_country() {
        let result = AddressCandidate::new("Main St", None, "Springfield", "12345", "");
        assert!(matches!(result, Err(CandidateError::EmptyCountry)));
    }

    #[test]
    fn test_candidate_trims_fields() {
        let candidate =
            AddressCandidate::new(" Main St ", Some(" 4 "), " Springfield ", " 12345 ", " US ")
                .unwrap();
        assert_eq!(candidate.street, "Main St");
        assert_eq!(candidate.house_number.as_deref(), Some("4"));
        assert_eq!(candidate.locality, "Springfield");
        assert_eq!(candidate.postal_code, "12345");
        assert_eq!(candidate.country_code, "US");
    }

    #[test]
    fn test_candidate_drops_blank_house_number() {
        let candidate =
            AddressCandidate::new("Main St", Some("  "), "Springfield", "12345", "US").unwrap();
        assert!(candidate.house_number.is_none());
    }

    #[test]
    fn test_street_line_appends_house_number() {
        let candidate =
            AddressCandidate::new("Main St", Some("4"), "Springfield", "12345", "US").unwrap();
        assert_eq!(candidate.street_line(), "Main St 4");
    }

    #[test]
    fn test_street_line_without_house_number() {
        let candidate = AddressCandidate::new("Main St", None, "Springfield", "12345", "US").unwrap();
        assert_eq!(candidate.street_line(), "Main St");
    }

    #[test]
    fn test_kind_carrier_managed() {
        assert!(AddressKind::ParcelLocker.is_carrier_managed());
        assert!(AddressKind::PostOffice.is_carrier_managed());
        assert!(!AddressKind::Residential.is_carrier_managed());
    }

    #[test]
    fn test_kind_display_from_str_roundtrip() {
        for kind in [
            AddressKind::Residential,
            AddressKind::ParcelLocker,
            AddressKind::PostOffice,
        ] {
            let parsed: AddressKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_kind_from_str_invalid() {
        assert!("drone_dropoff".parse::<AddressKind>().is_err());
    }

    #[test]
    fn test_address_id_serde_transparent() {
        let id = AddressId::new("addr-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"addr-42\"");
    }
}
