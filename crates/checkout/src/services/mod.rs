//! External service clients and the validation workflow.

pub mod validation;
pub mod verifier;

pub use validation::{ValidationReport, ValidationService};
pub use verifier::VerifierClient;
