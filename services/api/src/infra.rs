use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use loan_assistant::scoring::{ApplicationRecord, ApplicationStore, StoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Append log held in process memory. Used when no durable store path is
/// configured and by the one-shot `score` command.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationStore {
    records: Arc<Mutex<Vec<ApplicationRecord>>>,
}

impl ApplicationStore for InMemoryApplicationStore {
    fn insert(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.push(record);
        Ok(())
    }

    fn for_applicant(&self, applicant_id: &str) -> Result<Vec<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.applicant_id == applicant_id)
            .cloned()
            .collect())
    }
}
