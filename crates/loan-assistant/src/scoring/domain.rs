use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the classifier consumes, in the order the feature vector expects.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "income",
    "credit_score",
    "loan_amount",
    "loan_term",
    "debt_to_income",
];

/// One loan application as submitted by the caller. Lives only for the
/// duration of a single scoring call.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRequest {
    pub applicant_id: String,
    pub income: f64,
    pub credit_score: i64,
    pub loan_amount: f64,
    pub loan_term: u32,
    pub debt_to_income: f64,
}

impl LoanRequest {
    /// Build a request from the untyped JSON body.
    ///
    /// Presence is checked field by field in declaration order so the first
    /// absent field is the one reported. Values must be numeric; ranges are
    /// deliberately not enforced.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, RequestParseError> {
        for field in REQUIRED_FIELDS {
            if !payload.contains_key(field) {
                return Err(RequestParseError::MissingField(field));
            }
        }

        let applicant_id = payload
            .get("user_id")
            .and_then(Value::as_str)
            .unwrap_or("anonymous")
            .to_string();

        Ok(Self {
            applicant_id,
            income: numeric(payload, "income")?,
            credit_score: numeric(payload, "credit_score")? as i64,
            loan_amount: numeric(payload, "loan_amount")?,
            loan_term: numeric(payload, "loan_term")? as u32,
            debt_to_income: numeric(payload, "debt_to_income")?,
        })
    }

    /// Fixed-order feature vector consumed by the classifier.
    pub fn features(&self) -> [f64; 5] {
        [
            self.income,
            self.credit_score as f64,
            self.loan_amount,
            self.loan_term as f64,
            self.debt_to_income,
        ]
    }

    /// Monthly take-home used by the affordability rules.
    pub fn monthly_income(&self) -> f64 {
        self.income / 12.0
    }
}

fn numeric(payload: &Map<String, Value>, field: &'static str) -> Result<f64, InvalidInputError> {
    payload
        .get(field)
        .and_then(Value::as_f64)
        .ok_or(InvalidInputError::NotNumeric { field })
}

/// Semantically invalid numeric input caught before it can corrupt a
/// downstream computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("loan_term must be greater than zero")]
    ZeroLoanTerm,
    #[error("field '{field}' must be numeric")]
    NotNumeric { field: &'static str },
}

/// Failures raised while turning a JSON body into a [`LoanRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestParseError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Invalid(#[from] InvalidInputError),
}

/// Decision attached to a scored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Response body for a scored application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub eligible: bool,
    pub probability: f64,
    pub monthly_payment: f64,
    pub recommendations: Vec<String>,
    pub risk_factors: Vec<String>,
}

/// Immutable decision record appended to the application store. One record
/// exists per successful scoring call, rejections included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(rename = "user_id")]
    pub applicant_id: String,
    pub income: f64,
    pub credit_score: i64,
    pub loan_amount: f64,
    pub loan_term: u32,
    pub debt_to_income: f64,
    pub status: ApplicationStatus,
    pub probability: f64,
    pub monthly_payment: f64,
    pub timestamp: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn from_decision(
        request: &LoanRequest,
        status: ApplicationStatus,
        probability: f64,
        monthly_payment: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            applicant_id: request.applicant_id.clone(),
            income: request.income,
            credit_score: request.credit_score,
            loan_amount: request.loan_amount,
            loan_term: request.loan_term,
            debt_to_income: request.debt_to_income,
            status,
            probability,
            monthly_payment,
            timestamp,
        }
    }
}
