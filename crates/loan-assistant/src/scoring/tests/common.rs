use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use crate::scoring::domain::ApplicationRecord;
use crate::scoring::model::{LogisticModel, ModelState, ThresholdModel, FEATURE_COUNT};
use crate::scoring::service::EligibilityScorer;
use crate::scoring::store::{ApplicationStore, StoreError};

/// In-memory append log used by the unit tests.
#[derive(Default)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<Vec<ApplicationRecord>>>,
}

impl MemoryStore {
    pub(super) fn records(&self) -> Vec<ApplicationRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }
}

impl ApplicationStore for MemoryStore {
    fn insert(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(record);
        Ok(())
    }

    fn for_applicant(&self, applicant_id: &str) -> Result<Vec<ApplicationRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .filter(|record| record.applicant_id == applicant_id)
            .cloned()
            .collect())
    }
}

/// Store that fails every operation, for exercising the degraded paths.
pub(super) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn insert(&self, _record: ApplicationRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk on fire".to_string()))
    }

    fn for_applicant(&self, _applicant_id: &str) -> Result<Vec<ApplicationRecord>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".to_string()))
    }
}

/// Logistic model that approves everything with high confidence.
pub(super) fn approving_model() -> ModelState {
    ModelState::ready(LogisticModel {
        weights: [0.0; FEATURE_COUNT],
        intercept: 4.0,
    })
}

/// Logistic model that rejects everything with high confidence.
pub(super) fn rejecting_model() -> ModelState {
    ModelState::ready(LogisticModel {
        weights: [0.0; FEATURE_COUNT],
        intercept: -4.0,
    })
}

/// Stump on the credit-score feature; approves but offers no probability.
pub(super) fn uncalibrated_model() -> ModelState {
    ModelState::ready(ThresholdModel {
        feature: 1,
        cutoff: 650.0,
        approve_above: true,
    })
}

pub(super) fn scorer_with(
    model: ModelState,
) -> (EligibilityScorer<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (EligibilityScorer::new(model, store.clone()), store)
}

pub(super) fn payload_for(user_id: &str) -> Map<String, Value> {
    json!({
        "user_id": user_id,
        "income": 72000.0,
        "credit_score": 710,
        "loan_amount": 25000.0,
        "loan_term": 5,
        "debt_to_income": 0.25,
    })
    .as_object()
    .expect("object literal")
    .clone()
}

pub(super) fn payload() -> Map<String, Value> {
    payload_for("alice")
}
