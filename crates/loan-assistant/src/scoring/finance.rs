use super::domain::{InvalidInputError, LoanRequest};

/// Debt-to-income ratio above which an application is flagged.
const DTI_RISK_THRESHOLD: f64 = 0.4;
/// Share of monthly income a payment may consume before being flagged.
const PAYMENT_TO_INCOME_THRESHOLD: f64 = 0.35;
/// Credit scores under this mark are considered sub-prime.
const CREDIT_SCORE_FLOOR: i64 = 650;
/// Terms beyond this many years fall outside the typical consumer range.
const LONG_TERM_YEARS: u32 = 20;

/// Monthly payment for a fixed-rate, fully-amortizing loan.
///
/// A zero annual rate degenerates to straight division of the principal over
/// the term; a zero term is rejected outright rather than dividing by zero.
pub fn monthly_payment(
    principal: f64,
    term_years: u32,
    annual_rate: f64,
) -> Result<f64, InvalidInputError> {
    if term_years == 0 {
        return Err(InvalidInputError::ZeroLoanTerm);
    }

    let periods = f64::from(term_years * 12);
    if annual_rate == 0.0 {
        return Ok(principal / periods);
    }

    let monthly_rate = annual_rate / 12.0;
    let growth = (1.0 + monthly_rate).powf(periods);
    Ok(principal * monthly_rate * growth / (growth - 1.0))
}

/// Qualitative risk flags for a request and its computed payment.
///
/// Rules are independent and evaluated in a fixed order so repeated calls
/// produce identical lists. None of them mutate the request.
pub fn assess_borrowing_risk(request: &LoanRequest, monthly_payment: f64) -> Vec<String> {
    let mut factors = Vec::new();

    if request.debt_to_income > DTI_RISK_THRESHOLD {
        factors.push(format!(
            "High debt-to-income ratio ({:.0}%)",
            request.debt_to_income * 100.0
        ));
    }

    let monthly_income = request.monthly_income();
    if monthly_income > 0.0 && monthly_payment > monthly_income * PAYMENT_TO_INCOME_THRESHOLD {
        factors.push(format!(
            "Monthly payment exceeds {:.0}% of monthly income",
            PAYMENT_TO_INCOME_THRESHOLD * 100.0
        ));
    }

    if request.credit_score < CREDIT_SCORE_FLOOR {
        factors.push(format!(
            "Credit score below the prime threshold of {CREDIT_SCORE_FLOOR}"
        ));
    }

    if request.loan_term > LONG_TERM_YEARS {
        factors.push(format!(
            "Loan term exceeds the typical {LONG_TERM_YEARS}-year range"
        ));
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(income: f64, credit_score: i64, term: u32, dti: f64) -> LoanRequest {
        LoanRequest {
            applicant_id: "anonymous".to_string(),
            income,
            credit_score,
            loan_amount: 20000.0,
            loan_term: term,
            debt_to_income: dti,
        }
    }

    #[test]
    fn zero_rate_degenerates_to_straight_division() {
        let payment = monthly_payment(10000.0, 5, 0.0).expect("valid inputs");
        assert!((payment - 10000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn zero_term_is_rejected() {
        assert_eq!(
            monthly_payment(10000.0, 0, 0.04),
            Err(InvalidInputError::ZeroLoanTerm)
        );
    }

    #[test]
    fn matches_closed_form_amortization() {
        let cases = [
            (10000.0, 5u32, 0.04),
            (250000.0, 30, 0.065),
            (1500.0, 1, 0.12),
        ];
        for (principal, term, rate) in cases {
            let n = f64::from(term * 12);
            let r: f64 = rate / 12.0;
            let expected = principal * r * (1.0 + r).powf(n) / ((1.0 + r).powf(n) - 1.0);
            let actual = monthly_payment(principal, term, rate).expect("valid inputs");
            assert!(
                (actual - expected).abs() < 1e-9,
                "payment for ({principal}, {term}, {rate}) was {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn clean_profile_raises_no_flags() {
        let factors = assess_borrowing_risk(&request(90000.0, 720, 5, 0.2), 400.0);
        assert!(factors.is_empty());
    }

    #[test]
    fn flags_accumulate_in_declaration_order() {
        let strained = request(24000.0, 580, 30, 0.55);
        let factors = assess_borrowing_risk(&strained, 900.0);

        assert_eq!(factors.len(), 4);
        assert!(factors[0].contains("debt-to-income"));
        assert!(factors[1].contains("Monthly payment"));
        assert!(factors[2].contains("Credit score"));
        assert!(factors[3].contains("Loan term"));
    }

    #[test]
    fn risk_assessment_is_deterministic() {
        let strained = request(24000.0, 580, 30, 0.55);
        let first = assess_borrowing_risk(&strained, 900.0);
        let second = assess_borrowing_risk(&strained, 900.0);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_income_skips_the_affordability_rule() {
        let factors = assess_borrowing_risk(&request(0.0, 720, 5, 0.2), 400.0);
        assert!(factors.iter().all(|f| !f.contains("Monthly payment")));
    }
}
