use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;

use super::domain::{
    ApplicationRecord, ApplicationStatus, InvalidInputError, LoanRequest, RequestParseError,
    ScoringResult,
};
use super::finance::{assess_borrowing_risk, monthly_payment};
use super::model::ModelState;
use super::recommend::generate_recommendations;
use super::store::{ApplicationStore, StoreError};

/// Fixed annual interest rate applied to every quoted payment.
pub const ANNUAL_INTEREST_RATE: f64 = 0.04;

/// Orchestrates one scoring call: validation, feature assembly, inference,
/// derived metrics, persistence, and response assembly.
///
/// The model is injected at construction and read-only afterwards; an
/// unavailable model fails each call explicitly instead of crashing the
/// service.
pub struct EligibilityScorer<S> {
    model: ModelState,
    store: Arc<S>,
}

impl<S> EligibilityScorer<S>
where
    S: ApplicationStore + 'static,
{
    pub fn new(model: ModelState, store: Arc<S>) -> Self {
        Self { model, store }
    }

    pub fn model_ready(&self) -> bool {
        self.model.is_ready()
    }

    /// Score one application from its untyped JSON body.
    ///
    /// Every validated call appends exactly one [`ApplicationRecord`],
    /// rejections included. The record is persisted before recommendations
    /// and risk factors are derived, so a persistence failure abandons the
    /// response.
    pub fn score(&self, payload: &Map<String, Value>) -> Result<ScoringResult, ScoringError> {
        let classifier = match &self.model {
            ModelState::Ready(classifier) => classifier.as_ref(),
            ModelState::Unavailable { reason } => {
                return Err(ScoringError::ModelUnavailable(reason.clone()))
            }
        };

        let request = LoanRequest::from_payload(payload)?;
        let features = request.features();

        let label = classifier.predict(&features);
        let probability = classifier
            .predict_proba(&features)
            .map(|proba| proba[1])
            .unwrap_or(0.0);

        let payment = monthly_payment(request.loan_amount, request.loan_term, ANNUAL_INTEREST_RATE)?;
        let status = if label.is_approved() {
            ApplicationStatus::Approved
        } else {
            ApplicationStatus::Rejected
        };

        let record =
            ApplicationRecord::from_decision(&request, status, probability, payment, Utc::now());
        self.store.insert(record)?;

        let recommendations = generate_recommendations(&request, probability);
        let risk_factors = assess_borrowing_risk(&request, payment);

        info!(
            applicant = %request.applicant_id,
            status = status.label(),
            probability,
            "loan application scored"
        );

        Ok(ScoringResult {
            eligible: label.is_approved(),
            probability,
            monthly_payment: payment,
            recommendations,
            risk_factors,
        })
    }

    /// Read-only view over the applicant's decision history.
    pub fn progress(&self, applicant_id: &str) -> Result<Vec<ApplicationRecord>, ScoringError> {
        Ok(self.store.for_applicant(applicant_id)?)
    }
}

/// Failures raised by the scoring pipeline. The router maps each variant to
/// a structurally complete response exactly once; nothing propagates to the
/// transport as a raw error.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error("loan model not loaded: {0}")]
    ModelUnavailable(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScoringError {
    /// Client errors get the 400-class body; everything else the 500-class
    /// catch-all.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScoringError::MissingField(_) | ScoringError::InvalidInput(_)
        )
    }
}

impl From<RequestParseError> for ScoringError {
    fn from(value: RequestParseError) -> Self {
        match value {
            RequestParseError::MissingField(field) => Self::MissingField(field),
            RequestParseError::Invalid(err) => Self::InvalidInput(err),
        }
    }
}
