//! Core types for the Driftwood address-validation workflow.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod outcome;
pub mod status;

pub use address::{AddressCandidate, AddressId, AddressKind, CandidateError, CorrectedAddress};
pub use outcome::ValidationOutcome;
pub use status::{AddressValidationStatus, UserAction};
