use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRegistrationStore};
use crate::routes::with_registration_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use udyam::config::AppConfig;
use udyam::error::AppError;
use udyam::registration::{HttpPinDirectory, RegistrationService};
use udyam::telemetry;

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

    let store = Arc::new(InMemoryRegistrationStore::default());
    let directory = Arc::new(HttpPinDirectory::new(config.upstream.pin_api_base.clone()));
    let service = Arc::new(RegistrationService::new(store, directory));

    let app = with_registration_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "registration service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
