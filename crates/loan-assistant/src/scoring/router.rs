use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::service::{EligibilityScorer, ScoringError};
use super::store::ApplicationStore;

/// Router exposing the scoring pipeline over HTTP.
pub fn scoring_router<S>(scorer: Arc<EligibilityScorer<S>>) -> Router
where
    S: ApplicationStore + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict_handler::<S>))
        .route("/track_progress", get(track_progress_handler::<S>))
        .with_state(scorer)
}

pub(crate) async fn home() -> &'static str {
    "Welcome to the Smart Loan Assistant API!"
}

pub(crate) async fn predict_handler<S>(
    State(scorer): State<Arc<EligibilityScorer<S>>>,
    axum::Json(payload): axum::Json<Map<String, Value>>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    match scorer.score(&payload) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => scoring_error_response(error),
    }
}

/// Both error shapes are structurally complete: a caller can always read
/// `eligible` and `probability` without probing for key presence.
fn scoring_error_response(error: ScoringError) -> Response {
    if error.is_client_error() {
        let payload = json!({
            "error": error.to_string(),
            "eligible": false,
            "probability": 0.0,
        });
        (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
    } else {
        let payload = json!({
            "error": error.to_string(),
            "eligible": false,
            "probability": 0.0,
            "monthly_payment": 0.0,
            "recommendations": [],
            "risk_factors": [],
        });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressParams {
    #[serde(default)]
    user_id: Option<String>,
}

pub(crate) async fn track_progress_handler<S>(
    State(scorer): State<Arc<EligibilityScorer<S>>>,
    Query(params): Query<ProgressParams>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let user_id = params.user_id.unwrap_or_else(|| "anonymous".to_string());

    match scorer.progress(&user_id) {
        Ok(applications) => {
            let payload = json!({
                "user_id": user_id,
                "applications": applications,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
