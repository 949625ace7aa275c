use super::domain::LoanRequest;

/// Below this probability the applicant is told to strengthen the whole
/// profile before reapplying.
const LOW_PROBABILITY_BAND: f64 = 0.4;
/// Probabilities up to this mark are treated as borderline.
const BORDERLINE_PROBABILITY_BAND: f64 = 0.7;
/// Credit scores under this mark trigger the credit-building suggestion.
const CREDIT_SCORE_TARGET: i64 = 650;
/// Debt-to-income ratio above which paying down debt is suggested.
const DTI_TARGET: f64 = 0.4;
/// Loan amounts beyond this multiple of annual income are flagged as
/// oversized.
const LOAN_TO_INCOME_MULTIPLE: f64 = 5.0;

/// Actionable suggestions for the applicant, conditioned on the model's
/// probability and on individual request fields.
///
/// Rules fire in declaration order; identical input always produces the same
/// list in the same order.
pub fn generate_recommendations(request: &LoanRequest, probability: f64) -> Vec<String> {
    let mut recommendations = Vec::new();

    if probability < LOW_PROBABILITY_BAND {
        recommendations.push(
            "Your approval odds are low; strengthen your overall financial profile before reapplying"
                .to_string(),
        );
    } else if probability < BORDERLINE_PROBABILITY_BAND {
        recommendations.push(
            "Your application is borderline; small improvements could tip the decision".to_string(),
        );
    }

    if request.credit_score < CREDIT_SCORE_TARGET {
        recommendations.push(format!(
            "Improve your credit score above {CREDIT_SCORE_TARGET} before reapplying"
        ));
    }

    if request.debt_to_income > DTI_TARGET {
        recommendations.push("Reduce existing debt before reapplying".to_string());
    }

    if request.income > 0.0 && request.loan_amount > request.income * LOAN_TO_INCOME_MULTIPLE {
        recommendations.push(
            "Consider requesting a smaller loan amount relative to your income".to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push("Your application profile looks strong".to_string());
    }

    recommendations
}
