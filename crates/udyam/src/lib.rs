//! Core library for the two-step Aadhaar/PAN registration service.
//!
//! The `registration` module holds the server-side pieces: the form schema,
//! the per-step validators, the mock OTP issuer, the postal-directory
//! resolver, the persistence trait, and the axum router tying them together.
//! The `wizard` module models the client-side step machine so the
//! validate-then-advance workflow can be exercised without a UI.

pub mod config;
pub mod error;
pub mod registration;
pub mod telemetry;
pub mod wizard;
