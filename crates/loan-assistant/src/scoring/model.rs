use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Width of the feature vector: income, credit_score, loan_amount,
/// loan_term, debt_to_income.
pub const FEATURE_COUNT: usize = 5;

/// Output of the binary classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLabel {
    Rejected,
    Approved,
}

impl ClassLabel {
    pub fn is_approved(&self) -> bool {
        matches!(self, ClassLabel::Approved)
    }
}

/// Pre-trained binary classifier over the fixed-order feature vector.
///
/// Inference must be a pure read: one loaded model instance is shared by all
/// concurrent requests.
pub trait LoanClassifier: Send + Sync {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> ClassLabel;

    /// `[p_rejected, p_approved]` for models that estimate probabilities.
    /// Models without calibration return `None` and the pipeline falls back
    /// to a probability of 0.0.
    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Option<[f64; 2]> {
        let _ = features;
        None
    }
}

/// On-disk model artifact. The artifact is plain JSON so deployments can swap
/// coefficients without a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Logistic regression; supports probability estimates.
    Logistic {
        weights: [f64; FEATURE_COUNT],
        intercept: f64,
    },
    /// Single-feature decision stump; label only, no probabilities.
    Threshold {
        feature: usize,
        cutoff: f64,
        approve_above: bool,
    },
}

impl ModelSpec {
    fn into_classifier(self) -> Result<Box<dyn LoanClassifier>, String> {
        match self {
            ModelSpec::Logistic { weights, intercept } => {
                Ok(Box::new(LogisticModel { weights, intercept }))
            }
            ModelSpec::Threshold {
                feature,
                cutoff,
                approve_above,
            } => {
                if feature >= FEATURE_COUNT {
                    return Err(format!(
                        "threshold model references feature {feature}, only {FEATURE_COUNT} exist"
                    ));
                }
                Ok(Box::new(ThresholdModel {
                    feature,
                    cutoff,
                    approve_above,
                }))
            }
        }
    }
}

/// Logistic regression over the raw feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    pub weights: [f64; FEATURE_COUNT],
    pub intercept: f64,
}

impl LogisticModel {
    fn positive_probability(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let z: f64 = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}

impl LoanClassifier for LogisticModel {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> ClassLabel {
        if self.positive_probability(features) >= 0.5 {
            ClassLabel::Approved
        } else {
            ClassLabel::Rejected
        }
    }

    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Option<[f64; 2]> {
        let p = self.positive_probability(features);
        Some([1.0 - p, p])
    }
}

/// Decision stump comparing one feature against a cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdModel {
    pub feature: usize,
    pub cutoff: f64,
    pub approve_above: bool,
}

impl LoanClassifier for ThresholdModel {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> ClassLabel {
        let above = features[self.feature] > self.cutoff;
        if above == self.approve_above {
            ClassLabel::Approved
        } else {
            ClassLabel::Rejected
        }
    }
}

/// Model as seen by the scorer: loaded once at startup, read-only after.
///
/// A missing or malformed artifact never aborts startup; the state records
/// the reason and every scoring call reports it instead.
pub enum ModelState {
    Ready(Box<dyn LoanClassifier>),
    Unavailable { reason: String },
}

impl ModelState {
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "loan model not loaded");
                return Self::unavailable(format!(
                    "model file '{}' could not be read: {err}",
                    path.display()
                ));
            }
        };

        let spec: ModelSpec = match serde_json::from_str(&raw) {
            Ok(spec) => spec,
            Err(err) => {
                warn!(path = %path.display(), %err, "loan model artifact is malformed");
                return Self::unavailable(format!(
                    "model file '{}' is not a valid model spec: {err}",
                    path.display()
                ));
            }
        };

        match spec.into_classifier() {
            Ok(classifier) => {
                info!(path = %path.display(), "loan model loaded");
                Self::Ready(classifier)
            }
            Err(reason) => {
                warn!(path = %path.display(), %reason, "loan model spec rejected");
                Self::unavailable(reason)
            }
        }
    }

    pub fn ready(classifier: impl LoanClassifier + 'static) -> Self {
        Self::Ready(Box::new(classifier))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approving_features() -> [f64; FEATURE_COUNT] {
        [72000.0, 710.0, 25000.0, 5.0, 0.25]
    }

    #[test]
    fn logistic_probabilities_sum_to_one() {
        let model = LogisticModel {
            weights: [0.00001, 0.004, -0.00002, -0.01, -2.0],
            intercept: -1.5,
        };
        let proba = model
            .predict_proba(&approving_features())
            .expect("logistic models are calibrated");
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!(proba[1] > 0.0 && proba[1] < 1.0);
    }

    #[test]
    fn logistic_label_agrees_with_probability() {
        let model = LogisticModel {
            weights: [0.0; FEATURE_COUNT],
            intercept: 2.0,
        };
        assert_eq!(model.predict(&approving_features()), ClassLabel::Approved);

        let pessimist = LogisticModel {
            weights: [0.0; FEATURE_COUNT],
            intercept: -2.0,
        };
        assert_eq!(
            pessimist.predict(&approving_features()),
            ClassLabel::Rejected
        );
    }

    #[test]
    fn threshold_model_has_no_probabilities() {
        let model = ThresholdModel {
            feature: 1,
            cutoff: 650.0,
            approve_above: true,
        };
        assert_eq!(model.predict(&approving_features()), ClassLabel::Approved);
        assert!(model.predict_proba(&approving_features()).is_none());
    }

    #[test]
    fn load_flags_missing_artifact_as_unavailable() {
        let state = ModelState::load(Path::new("/nonexistent/loan_model.json"));
        match state {
            ModelState::Unavailable { reason } => {
                assert!(reason.contains("could not be read"));
            }
            ModelState::Ready(_) => panic!("missing file must not produce a model"),
        }
    }

    #[test]
    fn spec_rejects_out_of_range_feature_index() {
        let spec = ModelSpec::Threshold {
            feature: 9,
            cutoff: 0.5,
            approve_above: true,
        };
        assert!(spec.into_classifier().is_err());
    }

    #[test]
    fn spec_round_trips_through_json() {
        let raw = r#"{"kind":"logistic","weights":[0.1,0.2,0.3,0.4,0.5],"intercept":-1.0}"#;
        let spec: ModelSpec = serde_json::from_str(raw).expect("spec parses");
        assert!(matches!(spec, ModelSpec::Logistic { .. }));
    }
}
