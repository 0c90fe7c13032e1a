//! Integration tests for Driftwood.
//!
//! # Test Categories
//!
//! - `verifier_client` - Verification client against a mock HTTP service
//! - `validation_workflow` - Full validate/accept/decline/ignore cycles
//!
//! This crate provides the shared fixtures: an in-memory address book
//! standing in for the platform address-book collaborator, and builders for
//! addresses and verification-service responses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::{Value, json};

use driftwood_checkout::config::VerifierConfig;
use driftwood_checkout::db::RepositoryError;
use driftwood_checkout::models::CustomerAddress;
use driftwood_checkout::services::validation::AddressBook;
use driftwood_core::{AddressId, AddressKind, AddressValidationStatus};

/// In-memory address book for tests.
///
/// Cheaply cloneable; all clones share the same records, so a test can keep
/// a handle to inspect what the service persisted.
#[derive(Clone, Default)]
pub struct MemoryAddressBook {
    records: Arc<Mutex<HashMap<AddressId, CustomerAddress>>>,
}

impl MemoryAddressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an address record.
    ///
    /// # Panics
    ///
    /// Panics if the record lock is poisoned.
    pub fn insert(&self, address: CustomerAddress) {
        self.records
            .lock()
            .expect("address book lock poisoned")
            .insert(address.id.clone(), address);
    }

    /// Fetch a record directly, bypassing the service.
    ///
    /// # Panics
    ///
    /// Panics if the record lock is poisoned.
    #[must_use]
    pub fn get(&self, id: &AddressId) -> Option<CustomerAddress> {
        self.records
            .lock()
            .expect("address book lock poisoned")
            .get(id)
            .cloned()
    }

    /// Overwrite the stored validation status of a record, e.g. to age a
    /// declined status past the grace period.
    ///
    /// # Panics
    ///
    /// Panics if the record is missing or the lock is poisoned.
    pub fn set_status(&self, id: &AddressId, status: Option<AddressValidationStatus>) {
        let mut records = self.records.lock().expect("address book lock poisoned");
        records
            .get_mut(id)
            .expect("address not seeded")
            .validation_status = status;
    }
}

impl AddressBook for MemoryAddressBook {
    async fn find(&self, id: &AddressId) -> Result<Option<CustomerAddress>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn save(&self, address: &CustomerAddress) -> Result<(), RepositoryError> {
        self.insert(address.clone());
        Ok(())
    }
}

/// A residential address matching [`ok_match_body`] field-for-field.
#[must_use]
pub fn residential_address(id: &str) -> CustomerAddress {
    CustomerAddress {
        id: AddressId::new(id),
        customer_id: "cust-1".to_owned(),
        street: "Main St".to_owned(),
        house_number: Some("4".to_owned()),
        city: "Springfield".to_owned(),
        postal_code: "12345".to_owned(),
        country_code: "US".to_owned(),
        kind: AddressKind::Residential,
        validation_status: None,
    }
}

/// A parcel-locker address, which must never reach the verifier.
#[must_use]
pub fn locker_address(id: &str) -> CustomerAddress {
    CustomerAddress {
        kind: AddressKind::ParcelLocker,
        street: "Locker Plaza".to_owned(),
        house_number: None,
        ..residential_address(id)
    }
}

/// Verifier configuration pointing at a mock server.
///
/// # Panics
///
/// Panics if `endpoint` is not a valid URL.
#[must_use]
pub fn verifier_config(endpoint: &str) -> VerifierConfig {
    VerifierConfig {
        endpoint: endpoint.parse().expect("valid endpoint URL"),
        api_key: SecretString::from("test-verify-key"),
        enabled: true,
    }
}

/// An OK response whose match agrees with [`residential_address`].
#[must_use]
pub fn ok_match_body() -> Value {
    match_body("Main St", "4", "Springfield", "12345")
}

/// An OK response with one fully graded match candidate.
#[must_use]
pub fn match_body(thoroughfare: &str, premise: &str, locality: &str, postal_code: &str) -> Value {
    json!({
        "status": "OK",
        "object": [{
            "Matches": [{
                "Thoroughfare": thoroughfare,
                "Premise": premise,
                "Locality": locality,
                "PostalCode": postal_code,
                "ISO3166-2": "US-IL",
                "AQI": "A",
                "Unmatched": false
            }]
        }]
    })
}
