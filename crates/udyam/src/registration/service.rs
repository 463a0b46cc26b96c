use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::otp::{send_otp, OtpDelivery, OtpError};
use super::pincode::{PinDirectory, PinLocality, PinLookupError};
use super::schema::{form_schema, FormSchema};
use super::store::{NewRegistration, RegistrationRecord, RegistrationStore, StoreError};
use super::validation::{validate_step1, validate_step2, FieldErrors, Step1Payload, Step2Payload};

/// Service composing the validators, the persistence seam, and the postal
/// directory. Handlers only ever talk to this facade.
pub struct RegistrationService<S, P> {
    store: Arc<S>,
    pin_directory: Arc<P>,
}

/// Which step(s) the final submission gate rejected. A side is `None` when
/// that step's payload passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRejection {
    pub step1: Option<FieldErrors>,
    pub step2: Option<FieldErrors>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("submission rejected by validation")]
    Rejected(SubmitRejection),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<S, P> RegistrationService<S, P>
where
    S: RegistrationStore + 'static,
    P: PinDirectory + 'static,
{
    pub fn new(store: Arc<S>, pin_directory: Arc<P>) -> Self {
        Self {
            store,
            pin_directory,
        }
    }

    pub fn schema(&self) -> FormSchema {
        form_schema()
    }

    pub fn send_otp(&self, mobile_number: &str) -> Result<OtpDelivery, OtpError> {
        send_otp(mobile_number)
    }

    pub fn validate_step1(&self, payload: Step1Payload) -> Result<Step1Payload, FieldErrors> {
        validate_step1(payload)
    }

    pub fn validate_step2(&self, payload: Step2Payload) -> Result<Step2Payload, FieldErrors> {
        validate_step2(payload)
    }

    pub async fn resolve_pin(&self, pin_code: &str) -> Result<PinLocality, PinLookupError> {
        self.pin_directory.resolve(pin_code).await
    }

    /// Final submission gate. Both payloads are re-validated here regardless
    /// of any earlier per-step calls; nothing is persisted unless both pass.
    pub fn submit(
        &self,
        step1: Step1Payload,
        step2: Step2Payload,
    ) -> Result<RegistrationRecord, SubmitError> {
        let step1 = validate_step1(step1);
        let step2 = validate_step2(step2);

        let (step1, step2) = match (step1, step2) {
            (Ok(step1), Ok(step2)) => (step1, step2),
            (step1, step2) => {
                return Err(SubmitError::Rejected(SubmitRejection {
                    step1: step1.err(),
                    step2: step2.err(),
                }));
            }
        };

        let record = self.store.insert(NewRegistration {
            aadhaar_number: step1.aadhaar_number,
            applicant_name: step1.applicant_name,
            mobile_number: step1.mobile_number,
            otp_verified: true,
            pan_number: step2.pan_number,
            pin_code: step2.pin_code,
            state: step2.state,
            city: step2.city,
        })?;

        info!(id = %record.id, "registration created");
        Ok(record)
    }
}
