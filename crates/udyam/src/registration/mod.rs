//! Server-side registration domain: schema, validators, OTP issuer, postal
//! directory resolver, persistence trait, and the HTTP router.

pub mod otp;
pub mod pincode;
pub mod router;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;

pub use otp::{send_otp, OtpDelivery, OtpError, SENTINEL_OTP};
pub use pincode::{HttpPinDirectory, PinDirectory, PinLocality, PinLookupError};
pub use router::registration_router;
pub use schema::{form_schema, FieldSpec, FormSchema, StepSpec};
pub use service::{RegistrationService, SubmitError, SubmitRejection};
pub use store::{NewRegistration, RegistrationRecord, RegistrationStore, StoreError};
pub use validation::{validate_step1, validate_step2, FieldErrors, Step1Payload, Step2Payload};
