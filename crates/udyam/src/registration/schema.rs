use serde::{Deserialize, Serialize};

/// A single named input the client should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldSpec {
    fn text(name: &str, label: &str, required: bool, pattern: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            input_type: "text".to_string(),
            required,
            pattern: pattern.map(str::to_string),
        }
    }
}

/// One page of the wizard, bundling a set of related fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub id: u32,
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

/// The full two-step form definition, steps in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub steps: Vec<StepSpec>,
}

impl FormSchema {
    pub fn step(&self, id: u32) -> Option<&StepSpec> {
        self.steps.iter().find(|step| step.id == id)
    }
}

/// Static schema consumed by the client to render inputs dynamically.
/// Steps are returned in a stable order, step 1 before step 2.
pub fn form_schema() -> FormSchema {
    FormSchema {
        steps: vec![
            StepSpec {
                id: 1,
                title: "Aadhaar & OTP".to_string(),
                fields: vec![
                    FieldSpec::text("aadhaarNumber", "Aadhaar Number", true, Some(r"^\d{12}$")),
                    FieldSpec::text("applicantName", "Applicant Name", true, None),
                    FieldSpec::text("mobileNumber", "Mobile Number", true, Some(r"^[6-9]\d{9}$")),
                    FieldSpec::text("otp", "OTP", true, Some(r"^\d{6}$")),
                ],
            },
            StepSpec {
                id: 2,
                title: "PAN Validation".to_string(),
                fields: vec![
                    FieldSpec::text(
                        "panNumber",
                        "PAN Number",
                        true,
                        Some(r"^[A-Za-z]{5}[0-9]{4}[A-Za-z]{1}$"),
                    ),
                    FieldSpec::text("pinCode", "PIN Code", false, Some(r"^\d{6}$")),
                    FieldSpec::text("state", "State", false, None),
                    FieldSpec::text("city", "City", false, None),
                ],
            },
        ],
    }
}
