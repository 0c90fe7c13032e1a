//! Driftwood Core - Shared address-validation library.
//!
//! This crate provides the domain types and pure decision logic for the
//! Driftwood address-validation workflow, used by:
//! - `checkout` - The address-validation service exposed to checkout and
//!   account flows
//! - `integration-tests` - End-to-end workflow tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Address records, candidates, validation statuses, outcomes
//! - [`policy`] - When a stored address must be (re)verified
//! - [`reconcile`] - Comparing a submitted address against a verification
//!   match and proposing corrections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod policy;
pub mod reconcile;
pub mod types;

pub use policy::should_validate;
pub use reconcile::{Reconciliation, VerifiedMatch, reconcile};
pub use types::*;
