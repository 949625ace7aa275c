use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde_json::{json, Map, Value};

use crate::infra::InMemoryApplicationStore;
use loan_assistant::config::AppConfig;
use loan_assistant::error::AppError;
use loan_assistant::scoring::{EligibilityScorer, ModelState};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Applicant identifier recorded with the decision
    #[arg(long, default_value = "anonymous")]
    user_id: String,
    /// Annual income in dollars
    #[arg(long)]
    income: f64,
    /// Credit score (typically 300-850)
    #[arg(long)]
    credit_score: i64,
    /// Requested loan amount in dollars
    #[arg(long)]
    loan_amount: f64,
    /// Loan term in years
    #[arg(long)]
    loan_term: u32,
    /// Debt-to-income ratio between 0 and 1
    #[arg(long)]
    debt_to_income: f64,
    /// Override the configured model artifact path
    #[arg(long)]
    model: Option<PathBuf>,
}

/// Score a single application offline against the configured model.
///
/// Mirrors the `/predict` pipeline, including the decision record append,
/// but against a throwaway in-memory store.
pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let model_path = args.model.clone().unwrap_or(config.model.path);

    let scorer = EligibilityScorer::new(
        ModelState::load(&model_path),
        Arc::new(InMemoryApplicationStore::default()),
    );

    let payload = payload_from(&args);
    println!("Scoring application for '{}'", args.user_id);

    match scorer.score(&payload) {
        Ok(result) => {
            let verdict = if result.eligible {
                "eligible"
            } else {
                "not eligible"
            };
            println!("Decision: {verdict}");
            println!("Approval probability: {:.1}%", result.probability * 100.0);
            println!("Estimated monthly payment: ${:.2}", result.monthly_payment);

            if result.risk_factors.is_empty() {
                println!("\nRisk factors: none");
            } else {
                println!("\nRisk factors");
                for factor in &result.risk_factors {
                    println!("- {factor}");
                }
            }

            println!("\nRecommendations");
            for recommendation in &result.recommendations {
                println!("- {recommendation}");
            }
        }
        Err(error) => {
            // Same contract as the HTTP boundary: report the failure as a
            // complete decision instead of crashing.
            println!("Decision: unavailable ({error})");
        }
    }

    Ok(())
}

fn payload_from(args: &ScoreArgs) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("user_id".to_string(), json!(args.user_id));
    body.insert("income".to_string(), json!(args.income));
    body.insert("credit_score".to_string(), json!(args.credit_score));
    body.insert("loan_amount".to_string(), json!(args.loan_amount));
    body.insert("loan_term".to_string(), json!(args.loan_term));
    body.insert("debt_to_income".to_string(), json!(args.debt_to_income));
    body
}
