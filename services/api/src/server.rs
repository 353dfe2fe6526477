use crate::cli::ServeArgs;
use crate::infra::{seed_directory, AppState, InMemoryDirectory};
use crate::routes::with_loyalty_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use venueperks::config::AppConfig;
use venueperks::error::AppError;
use venueperks::loyalty::LoyaltyService;
use venueperks::telemetry;

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

    let directory = Arc::new(InMemoryDirectory::default());
    seed_directory(&directory, config.loyalty.visit_window_days);
    let loyalty_service = Arc::new(LoyaltyService::new(directory));

    let app = with_loyalty_routes(loyalty_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loyalty payout service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
