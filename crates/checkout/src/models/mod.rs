//! Domain models for the checkout service.

pub mod address;

pub use address::CustomerAddress;
