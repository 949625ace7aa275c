//! Loan-eligibility scoring pipeline.
//!
//! One scoring call runs validation, feature assembly, model inference,
//! derived-metric computation, and persistence of the decision record. The
//! classifier and the application store are injected collaborators so the
//! pipeline can be exercised end to end with fakes.

pub mod domain;
pub mod finance;
pub mod model;
pub mod recommend;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationRecord, ApplicationStatus, InvalidInputError, LoanRequest, RequestParseError,
    ScoringResult, REQUIRED_FIELDS,
};
pub use finance::{assess_borrowing_risk, monthly_payment};
pub use model::{ClassLabel, LoanClassifier, LogisticModel, ModelSpec, ModelState, ThresholdModel};
pub use recommend::generate_recommendations;
pub use router::scoring_router;
pub use service::{EligibilityScorer, ScoringError, ANNUAL_INTEREST_RATE};
pub use store::{ApplicationStore, JsonlStore, StoreError};
