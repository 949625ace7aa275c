use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicationStore};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use loan_assistant::config::AppConfig;
use loan_assistant::error::AppError;
use loan_assistant::scoring::{EligibilityScorer, JsonlStore, ModelState};
use loan_assistant::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let model = ModelState::load(&config.model.path);
    if !model.is_ready() {
        warn!("serving without a usable loan model; every /predict call will report it");
    }

    let app = match config.store.path.as_ref() {
        Some(path) => {
            let store = Arc::new(JsonlStore::open(path)?);
            with_scoring_routes(Arc::new(EligibilityScorer::new(model, store)))
        }
        None => {
            info!("no LOAN_STORE_PATH configured; decisions are kept in memory only");
            let store = Arc::new(InMemoryApplicationStore::default());
            with_scoring_routes(Arc::new(EligibilityScorer::new(model, store)))
        }
    };

    let app = app
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "smart loan assistant ready");

    axum::serve(listener, app).await?;
    Ok(())
}
