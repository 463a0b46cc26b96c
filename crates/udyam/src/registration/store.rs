use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The validated union of both step payloads, ready for persistence. The OTP
/// itself is never stored; only the fact that verification passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub aadhaar_number: String,
    pub applicant_name: String,
    pub mobile_number: String,
    pub otp_verified: bool,
    pub pan_number: String,
    pub pin_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// A persisted registration. Immutable once created; there are no update or
/// delete operations in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: NewRegistration,
}

impl RegistrationRecord {
    /// Stamp a new record with a fresh reference id. Every call yields a
    /// distinct id; submissions are never deduplicated.
    pub fn create(details: NewRegistration) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            details,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("registration store unavailable")]
    Unavailable,
}

/// Persistence seam. Implementations must be atomic per record: the record is
/// created whole or not at all.
pub trait RegistrationStore: Send + Sync {
    fn insert(&self, registration: NewRegistration) -> Result<RegistrationRecord, StoreError>;
}
