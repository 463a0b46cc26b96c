use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::otp::SENTINEL_OTP;

static AADHAAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{12}$").expect("valid regex"));
static MOBILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid regex"));
static OTP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("valid regex"));
static PAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{5}[0-9]{4}[A-Za-z]$").expect("valid regex"));
static PIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("valid regex"));

/// Aadhaar, name, mobile and OTP collected on the first wizard page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step1Payload {
    #[serde(default)]
    pub aadhaar_number: String,
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub otp: String,
}

/// PAN plus the optional address block collected on the second wizard page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step2Payload {
    #[serde(default)]
    pub pan_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Per-field validation messages, ordered; the first message per field is the
/// one clients display. Shared wire shape across all validating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: &str) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// First (authoritative) message for a field, if any.
    pub fn first_message(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

pub(crate) fn is_valid_mobile(value: &str) -> bool {
    MOBILE_RE.is_match(value)
}

pub(crate) fn is_valid_pin(value: &str) -> bool {
    PIN_RE.is_match(value)
}

/// Validate the Aadhaar/OTP step. All failing fields are reported, not just
/// the first; a well-formed but wrong OTP is an authoritative failure on the
/// `otp` field, distinct from the format error.
pub fn validate_step1(payload: Step1Payload) -> Result<Step1Payload, FieldErrors> {
    let mut errors = FieldErrors::default();

    if !AADHAAR_RE.is_match(&payload.aadhaar_number) {
        errors.push("aadhaarNumber", "Aadhaar must be 12 digits");
    }
    if payload.applicant_name.chars().count() < 2 {
        errors.push("applicantName", "Name is required");
    }
    if !MOBILE_RE.is_match(&payload.mobile_number) {
        errors.push("mobileNumber", "Enter valid 10-digit mobile");
    }
    if !OTP_RE.is_match(&payload.otp) {
        errors.push("otp", "OTP must be 6 digits");
    } else if payload.otp != SENTINEL_OTP {
        errors.push("otp", "Invalid OTP");
    }

    if errors.is_empty() {
        Ok(payload)
    } else {
        Err(errors)
    }
}

/// Validate the PAN/address step. PIN is checked only when present; state and
/// city are unconstrained.
pub fn validate_step2(payload: Step2Payload) -> Result<Step2Payload, FieldErrors> {
    let mut errors = FieldErrors::default();

    if !PAN_RE.is_match(&payload.pan_number) {
        errors.push("panNumber", "Invalid PAN format");
    }
    if let Some(pin) = payload.pin_code.as_deref() {
        if !PIN_RE.is_match(pin) {
            errors.push("pinCode", "PIN must be 6 digits");
        }
    }

    if errors.is_empty() {
        Ok(payload)
    } else {
        Err(errors)
    }
}
