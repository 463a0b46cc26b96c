//! Client-side wizard controller.
//!
//! Models the step-wise validate-then-advance workflow as an explicit state
//! machine: rendering reads from it, and every mutation goes through a named
//! transition function. Validation and submission outcomes are fed in by the
//! caller, so the machine itself never performs I/O and can be exercised
//! directly in tests.

use std::collections::BTreeMap;

use crate::registration::pincode::PinLocality;
use crate::registration::schema::FormSchema;
use crate::registration::service::SubmitRejection;
use crate::registration::validation::{is_valid_pin, FieldErrors, Step1Payload, Step2Payload};

/// Field name whose edits trigger the postal-directory lookup.
pub const PIN_FIELD: &str = "pinCode";

/// The wizard's state nodes. Error display does not change the node; it only
/// annotates `Step1`/`Step2` through the controller's error map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Loading,
    Step1,
    Step2,
    Submitting,
    Success { reference_id: String },
}

impl WizardState {
    fn name(&self) -> &'static str {
        match self {
            WizardState::Loading => "loading",
            WizardState::Step1 => "step1",
            WizardState::Step2 => "step2",
            WizardState::Submitting => "submitting",
            WizardState::Success { .. } => "success",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("event '{event}' is not valid in state '{state}'")]
    InvalidTransition {
        event: &'static str,
        state: &'static str,
    },
}

/// Handed to the caller when a pin edit warrants a directory lookup. The
/// token must be passed back with the result; a token that no longer matches
/// the controller's current epoch means the user has edited the field since,
/// and the result is discarded. Last request wins, not last response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinLookupRequest {
    pub token: u64,
    pub pin_code: String,
}

/// Explicit state-machine object owning the form values and error overlay.
pub struct WizardController {
    state: WizardState,
    schema: Option<FormSchema>,
    values: BTreeMap<String, String>,
    errors: BTreeMap<String, String>,
    pin_epoch: u64,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            state: WizardState::Loading,
            schema: None,
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            pin_epoch: 0,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn schema(&self) -> Option<&FormSchema> {
        self.schema.as_ref()
    }

    pub fn field_value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Displayed message for a field, if the last validation attempt flagged it.
    pub fn error_message(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn invalid(&self, event: &'static str) -> TransitionError {
        TransitionError::InvalidTransition {
            event,
            state: self.state.name(),
        }
    }

    /// `Loading -> Step1` once the schema arrives.
    pub fn schema_loaded(&mut self, schema: FormSchema) -> Result<(), TransitionError> {
        if self.state != WizardState::Loading {
            return Err(self.invalid("schema_loaded"));
        }
        self.schema = Some(schema);
        self.state = WizardState::Step1;
        Ok(())
    }

    /// Record a user edit. Editing the pin field supersedes any in-flight
    /// lookup; a well-formed new value requests a fresh one.
    pub fn edit_field(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<Option<PinLookupRequest>, TransitionError> {
        if !matches!(self.state, WizardState::Step1 | WizardState::Step2) {
            return Err(self.invalid("edit_field"));
        }

        self.values.insert(name.to_string(), value.to_string());

        if name != PIN_FIELD {
            return Ok(None);
        }

        self.pin_epoch += 1;
        if is_valid_pin(value) {
            Ok(Some(PinLookupRequest {
                token: self.pin_epoch,
                pin_code: value.to_string(),
            }))
        } else {
            Ok(None)
        }
    }

    /// Apply a resolved lookup. Returns whether anything was filled in; a
    /// stale token, a step change, or fields the user already filled all make
    /// this a no-op. Lookup failures are simply never applied.
    pub fn apply_pin_lookup(&mut self, token: u64, locality: &PinLocality) -> bool {
        if token != self.pin_epoch || self.state != WizardState::Step2 {
            return false;
        }

        let mut applied = false;
        for (field, value) in [("state", &locality.state), ("city", &locality.city)] {
            if value.is_empty() || !self.field_value(field).is_empty() {
                continue;
            }
            self.values.insert(field.to_string(), value.clone());
            applied = true;
        }
        applied
    }

    /// Feed back a per-step validation outcome. Success advances the machine
    /// (`Step1 -> Step2`, `Step2 -> Submitting`) and clears the error overlay;
    /// failure replaces the overlay wholesale and stays put.
    pub fn step_validated(
        &mut self,
        outcome: Result<(), FieldErrors>,
    ) -> Result<(), TransitionError> {
        if !matches!(self.state, WizardState::Step1 | WizardState::Step2) {
            return Err(self.invalid("step_validated"));
        }

        match outcome {
            Ok(()) => {
                self.errors.clear();
                self.state = match self.state {
                    WizardState::Step1 => WizardState::Step2,
                    _ => WizardState::Submitting,
                };
            }
            Err(errors) => {
                self.replace_errors(&errors);
            }
        }
        Ok(())
    }

    /// Feed back the final submission outcome. Rejection lands on `Step2`
    /// even when only the step-1 payload failed; the step-1 messages are
    /// still displayed. Stepping back remains the user's move.
    pub fn submission_resolved(
        &mut self,
        outcome: Result<String, SubmitRejection>,
    ) -> Result<(), TransitionError> {
        if self.state != WizardState::Submitting {
            return Err(self.invalid("submission_resolved"));
        }

        match outcome {
            Ok(reference_id) => {
                self.state = WizardState::Success { reference_id };
            }
            Err(rejection) => {
                self.errors.clear();
                if let Some(errors) = rejection.step1 {
                    self.absorb_errors(&errors);
                }
                if let Some(errors) = rejection.step2 {
                    self.absorb_errors(&errors);
                }
                self.state = WizardState::Step2;
            }
        }
        Ok(())
    }

    /// User-initiated back navigation, `Step2 -> Step1`. Clears nothing:
    /// entered values and any displayed errors survive.
    pub fn back(&mut self) -> Result<(), TransitionError> {
        if self.state != WizardState::Step2 {
            return Err(self.invalid("back"));
        }
        self.state = WizardState::Step1;
        Ok(())
    }

    /// Assemble the step-1 payload from the current form values; fields the
    /// user never touched are submitted as empty strings for the validators
    /// to flag.
    pub fn step1_payload(&self) -> Step1Payload {
        Step1Payload {
            aadhaar_number: self.field_value("aadhaarNumber").to_string(),
            applicant_name: self.field_value("applicantName").to_string(),
            mobile_number: self.field_value("mobileNumber").to_string(),
            otp: self.field_value("otp").to_string(),
        }
    }

    /// Assemble the step-2 payload; optional fields left blank are omitted
    /// rather than sent as empty strings.
    pub fn step2_payload(&self) -> Step2Payload {
        let optional = |name: &str| {
            let value = self.field_value(name);
            (!value.is_empty()).then(|| value.to_string())
        };

        Step2Payload {
            pan_number: self.field_value("panNumber").to_string(),
            pin_code: optional(PIN_FIELD),
            state: optional("state"),
            city: optional("city"),
        }
    }

    fn replace_errors(&mut self, errors: &FieldErrors) {
        self.errors.clear();
        self.absorb_errors(errors);
    }

    fn absorb_errors(&mut self, errors: &FieldErrors) {
        for (field, messages) in &errors.field_errors {
            if let Some(first) = messages.first() {
                self.errors.insert(field.clone(), first.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::schema::form_schema;
    use crate::registration::validation::{validate_step1, validate_step2};

    fn controller_on_step1() -> WizardController {
        let mut wizard = WizardController::new();
        wizard.schema_loaded(form_schema()).expect("schema loads");
        wizard
    }

    fn fill_valid_step1(wizard: &mut WizardController) {
        for (name, value) in [
            ("aadhaarNumber", "123456789012"),
            ("applicantName", "John Doe"),
            ("mobileNumber", "9876543210"),
            ("otp", "123456"),
        ] {
            wizard.edit_field(name, value).expect("edit allowed");
        }
    }

    fn controller_on_step2() -> WizardController {
        let mut wizard = controller_on_step1();
        fill_valid_step1(&mut wizard);
        let outcome = validate_step1(wizard.step1_payload()).map(|_| ());
        wizard.step_validated(outcome).expect("transition allowed");
        assert_eq!(wizard.state(), &WizardState::Step2);
        wizard
    }

    #[test]
    fn starts_loading_and_advances_on_schema() {
        let mut wizard = WizardController::new();
        assert_eq!(wizard.state(), &WizardState::Loading);
        wizard.schema_loaded(form_schema()).expect("schema loads");
        assert_eq!(wizard.state(), &WizardState::Step1);
        assert!(wizard.schema_loaded(form_schema()).is_err());
    }

    #[test]
    fn edits_are_rejected_before_schema_arrives() {
        let mut wizard = WizardController::new();
        assert!(wizard.edit_field("applicantName", "Jo").is_err());
    }

    #[test]
    fn failed_validation_populates_first_message_per_field_and_stays() {
        let mut wizard = controller_on_step1();
        wizard.edit_field("aadhaarNumber", "12").expect("edit");
        let outcome = validate_step1(wizard.step1_payload()).map(|_| ());
        wizard.step_validated(outcome).expect("transition allowed");

        assert_eq!(wizard.state(), &WizardState::Step1);
        assert_eq!(
            wizard.error_message("aadhaarNumber"),
            Some("Aadhaar must be 12 digits"),
        );
        assert_eq!(wizard.error_message("otp"), Some("OTP must be 6 digits"));
    }

    #[test]
    fn successful_step1_validation_advances_and_clears_errors() {
        let mut wizard = controller_on_step1();
        let failing = validate_step1(wizard.step1_payload()).map(|_| ());
        wizard.step_validated(failing).expect("transition allowed");
        assert!(wizard.has_errors());

        fill_valid_step1(&mut wizard);
        let passing = validate_step1(wizard.step1_payload()).map(|_| ());
        wizard.step_validated(passing).expect("transition allowed");

        assert_eq!(wizard.state(), &WizardState::Step2);
        assert!(!wizard.has_errors());
    }

    #[test]
    fn pin_edit_requests_lookup_only_when_well_formed() {
        let mut wizard = controller_on_step2();
        assert_eq!(wizard.edit_field(PIN_FIELD, "1100").expect("edit"), None);
        let request = wizard
            .edit_field(PIN_FIELD, "110001")
            .expect("edit")
            .expect("lookup requested");
        assert_eq!(request.pin_code, "110001");
    }

    #[test]
    fn stale_pin_lookup_is_discarded() {
        let mut wizard = controller_on_step2();
        let first = wizard
            .edit_field(PIN_FIELD, "110001")
            .expect("edit")
            .expect("lookup requested");
        // User keeps typing before the first lookup resolves.
        wizard.edit_field(PIN_FIELD, "560001").expect("edit");

        let stale = PinLocality {
            state: "Delhi".to_string(),
            city: "New Delhi".to_string(),
        };
        assert!(!wizard.apply_pin_lookup(first.token, &stale));
        assert_eq!(wizard.field_value("state"), "");
    }

    #[test]
    fn current_pin_lookup_fills_blank_address_fields() {
        let mut wizard = controller_on_step2();
        let request = wizard
            .edit_field(PIN_FIELD, "560001")
            .expect("edit")
            .expect("lookup requested");

        let locality = PinLocality {
            state: "Karnataka".to_string(),
            city: "Bengaluru".to_string(),
        };
        assert!(wizard.apply_pin_lookup(request.token, &locality));
        assert_eq!(wizard.field_value("state"), "Karnataka");
        assert_eq!(wizard.field_value("city"), "Bengaluru");
    }

    #[test]
    fn pin_lookup_never_overwrites_user_entered_fields() {
        let mut wizard = controller_on_step2();
        wizard.edit_field("city", "Mysuru").expect("edit");
        let request = wizard
            .edit_field(PIN_FIELD, "560001")
            .expect("edit")
            .expect("lookup requested");

        let locality = PinLocality {
            state: "Karnataka".to_string(),
            city: "Bengaluru".to_string(),
        };
        assert!(wizard.apply_pin_lookup(request.token, &locality));
        assert_eq!(wizard.field_value("city"), "Mysuru");
        assert_eq!(wizard.field_value("state"), "Karnataka");
    }

    #[test]
    fn back_keeps_values_and_errors() {
        let mut wizard = controller_on_step2();
        let failing = validate_step2(wizard.step2_payload()).map(|_| ());
        wizard.step_validated(failing).expect("transition allowed");
        assert!(wizard.has_errors());

        wizard.back().expect("back allowed");
        assert_eq!(wizard.state(), &WizardState::Step1);
        assert_eq!(wizard.field_value("aadhaarNumber"), "123456789012");
        assert!(wizard.has_errors());
        assert!(wizard.back().is_err());
    }

    #[test]
    fn blank_optional_fields_are_omitted_from_step2_payload() {
        let mut wizard = controller_on_step2();
        wizard.edit_field("panNumber", "ABCDE1234F").expect("edit");
        let payload = wizard.step2_payload();
        assert_eq!(payload.pin_code, None);
        assert_eq!(payload.state, None);
        assert_eq!(payload.city, None);
    }

    #[test]
    fn successful_submission_reaches_terminal_success() {
        let mut wizard = controller_on_step2();
        wizard.edit_field("panNumber", "ABCDE1234F").expect("edit");
        let passing = validate_step2(wizard.step2_payload()).map(|_| ());
        wizard.step_validated(passing).expect("transition allowed");
        assert_eq!(wizard.state(), &WizardState::Submitting);

        wizard
            .submission_resolved(Ok("ref-001".to_string()))
            .expect("transition allowed");
        assert_eq!(
            wizard.state(),
            &WizardState::Success {
                reference_id: "ref-001".to_string()
            },
        );

        // Terminal: no event is accepted once submitted.
        assert!(wizard.edit_field("panNumber", "FGHIJ5678K").is_err());
        assert!(wizard.step_validated(Ok(())).is_err());
        assert!(wizard.back().is_err());
        assert!(wizard.submission_resolved(Ok("ref-002".to_string())).is_err());
    }

    #[test]
    fn submission_rejection_lands_on_step2_even_for_step1_faults() {
        let mut wizard = controller_on_step2();
        wizard.edit_field("panNumber", "ABCDE1234F").expect("edit");
        let passing = validate_step2(wizard.step2_payload()).map(|_| ());
        wizard.step_validated(passing).expect("transition allowed");

        let mut step1_errors = FieldErrors::default();
        step1_errors.push("otp", "Invalid OTP");
        wizard
            .submission_resolved(Err(SubmitRejection {
                step1: Some(step1_errors),
                step2: None,
            }))
            .expect("transition allowed");

        assert_eq!(wizard.state(), &WizardState::Step2);
        assert_eq!(wizard.error_message("otp"), Some("Invalid OTP"));
    }
}
