//! Result reconciliation: comparing a submitted address against a
//! verification match and proposing corrections.

use serde::{Deserialize, Serialize};

use crate::types::{AddressCandidate, CorrectedAddress};

/// One match candidate returned by the verification service, in
/// provider-neutral form.
///
/// The provider reports absent fields as empty strings rather than omitting
/// them, and this type keeps that convention: eligibility checks below are
/// non-emptiness checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedMatch {
    /// Matched street name.
    pub thoroughfare: String,
    /// Matched house number / premise.
    pub premise: String,
    /// Matched city.
    pub locality: String,
    /// Matched postal code.
    pub postal_code: String,
    /// ISO 3166-2 region code of the match.
    pub region_code: String,
    /// Address Quality Indicator: the provider's per-match confidence
    /// marker. Empty when the provider could not grade the match.
    pub aqi: String,
    /// Set when the provider could not match the input at all.
    pub unmatched: bool,
}

/// Result of reconciling a submitted address against a verification match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Whether the submitted address agrees with the match field-by-field.
    pub is_valid: bool,
    /// A corrected address, when the address is invalid and the match is
    /// complete enough to propose one.
    pub suggestion: Option<CorrectedAddress>,
}

/// Compare a submitted address field-by-field against a verification match.
///
/// The address is valid only if the street, postal code, and locality all
/// equal the matched values after normalization, and, when a house number
/// was submitted, the matched premise equals it too.
///
/// When invalid, a correction is proposed only if the match carries a
/// non-empty AQI marker, is not flagged unmatched, and has a non-empty
/// thoroughfare, locality, postal code, and region code - plus a non-empty
/// premise when a house number was submitted. Otherwise `suggestion` is
/// `None` and the caller reports the failure by address ID alone.
///
/// Callers must not invoke this on a failed verification call; that path
/// is an indeterminate outcome, not an invalid address.
#[must_use]
pub fn reconcile(submitted: &AddressCandidate, matched: &VerifiedMatch) -> Reconciliation {
    let streets_match = normalize_text(&submitted.street) == normalize_text(&matched.thoroughfare);
    let postal_match =
        normalize_postal(&submitted.postal_code) == normalize_postal(&matched.postal_code);
    let locality_match = normalize_text(&submitted.locality) == normalize_text(&matched.locality);
    let premise_match = submitted.house_number.as_ref().is_none_or(|house| {
        normalize_text(house) == normalize_text(&matched.premise)
    });

    let is_valid = streets_match && postal_match && locality_match && premise_match;

    let suggestion = if is_valid {
        None
    } else {
        suggestion_from_match(submitted, matched)
    };

    Reconciliation {
        is_valid,
        suggestion,
    }
}

/// Build a corrected address from the match, if it is eligible.
fn suggestion_from_match(
    submitted: &AddressCandidate,
    matched: &VerifiedMatch,
) -> Option<CorrectedAddress> {
    if matched.aqi.is_empty() || matched.unmatched {
        return None;
    }
    if matched.thoroughfare.is_empty()
        || matched.locality.is_empty()
        || matched.postal_code.is_empty()
        || matched.region_code.is_empty()
    {
        return None;
    }

    let house_number = if submitted.house_number.is_some() {
        if matched.premise.is_empty() {
            return None;
        }
        Some(matched.premise.clone())
    } else {
        None
    };

    Some(CorrectedAddress {
        street: matched.thoroughfare.clone(),
        house_number,
        locality: matched.locality.clone(),
        postal_code: matched.postal_code.clone(),
        region_code: matched.region_code.clone(),
    })
}

/// Normalize free-text fields: lowercase, trim, collapse inner whitespace.
fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize postal codes: uppercase with all whitespace removed, so
/// "SW1A 1AA" and "sw1a1aa" compare equal.
fn normalize_postal(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}
