use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use udyam::registration::{NewRegistration, RegistrationRecord, RegistrationStore, StoreError};
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local registration store. Each insert stamps a fresh id; records
/// are never updated or removed.
#[derive(Default)]
pub(crate) struct InMemoryRegistrationStore {
    records: Mutex<HashMap<Uuid, RegistrationRecord>>,
}

impl RegistrationStore for InMemoryRegistrationStore {
    fn insert(&self, registration: NewRegistration) -> Result<RegistrationRecord, StoreError> {
        let record = RegistrationRecord::create(registration);
        let mut guard = self.records.lock().map_err(|_| StoreError::Unavailable)?;
        guard.insert(record.id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use udyam::registration::RegistrationStore;

    fn registration() -> NewRegistration {
        NewRegistration {
            aadhaar_number: "123456789012".to_string(),
            applicant_name: "John Doe".to_string(),
            mobile_number: "9876543210".to_string(),
            otp_verified: true,
            pan_number: "ABCDE1234F".to_string(),
            pin_code: None,
            state: None,
            city: None,
        }
    }

    #[test]
    fn repeated_inserts_yield_distinct_ids() {
        let store = InMemoryRegistrationStore::default();
        let first = store.insert(registration()).expect("insert");
        let second = store.insert(registration()).expect("insert");
        assert_ne!(first.id, second.id);
        assert_eq!(store.records.lock().expect("lock").len(), 2);
    }
}
