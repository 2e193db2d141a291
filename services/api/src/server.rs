use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAccessDirectory, InMemoryReportRepository, RecordingCheckoutGateway,
};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dealscope::config::AppConfig;
use dealscope::error::AppError;
use dealscope::reports::access::TrialPolicy;
use dealscope::reports::service::ReportService;
use dealscope::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let repository = Arc::new(InMemoryReportRepository::default());
    let directory = Arc::new(InMemoryAccessDirectory::default());
    let gateway = Arc::new(RecordingCheckoutGateway::default());
    let trial = TrialPolicy {
        trial_days: config.billing.trial_days,
    };
    let report_service = Arc::new(ReportService::new(repository, directory, gateway, trial));

    let app = with_report_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "deal analysis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
