use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::access::PlanId;
use super::domain::{PropertySubmission, ReportId, UserId};
use super::repository::{AccessDirectory, CheckoutGateway, DirectoryError, ReportRepository};
use super::service::{ReportService, ReportServiceError};

/// Router builder exposing report generation, retrieval, and the billing
/// entry points.
pub fn report_router<R, D, G>(service: Arc<ReportService<R, D, G>>) -> Router
where
    R: ReportRepository + 'static,
    D: AccessDirectory + 'static,
    G: CheckoutGateway + 'static,
{
    Router::new()
        .route("/api/v1/reports", post(generate_handler::<R, D, G>))
        .route("/api/v1/reports/:report_id", get(report_handler::<R, D, G>))
        .route(
            "/api/v1/users/:user_id/reports",
            get(user_reports_handler::<R, D, G>),
        )
        .route(
            "/api/v1/billing/trial",
            post(start_trial_handler::<R, D, G>),
        )
        .route(
            "/api/v1/billing/checkout",
            post(checkout_handler::<R, D, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub user_id: UserId,
    /// Evaluation instant; defaults to the current time.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    pub property: PropertySubmission,
}

#[derive(Debug, Deserialize)]
pub struct StartTrialRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: UserId,
    pub plan: PlanId,
}

pub(crate) async fn generate_handler<R, D, G>(
    State(service): State<Arc<ReportService<R, D, G>>>,
    axum::Json(request): axum::Json<GenerateReportRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    D: AccessDirectory + 'static,
    G: CheckoutGateway + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    match service.generate(&request.user_id, request.property, now) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<R, D, G>(
    State(service): State<Arc<ReportService<R, D, G>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    D: AccessDirectory + 'static,
    G: CheckoutGateway + 'static,
{
    match service.report(&ReportId(report_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn user_reports_handler<R, D, G>(
    State(service): State<Arc<ReportService<R, D, G>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    D: AccessDirectory + 'static,
    G: CheckoutGateway + 'static,
{
    match service.reports_for(&UserId(user_id)) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_trial_handler<R, D, G>(
    State(service): State<Arc<ReportService<R, D, G>>>,
    axum::Json(request): axum::Json<StartTrialRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    D: AccessDirectory + 'static,
    G: CheckoutGateway + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    match service.start_trial(&request.user_id, now) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn checkout_handler<R, D, G>(
    State(service): State<Arc<ReportService<R, D, G>>>,
    axum::Json(request): axum::Json<CheckoutRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    D: AccessDirectory + 'static,
    G: CheckoutGateway + 'static,
{
    match service.checkout(&request.user_id, request.plan) {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: ReportServiceError) -> Response {
    match error {
        ReportServiceError::Validation(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ReportServiceError::AccessDenied { reason, offered } => {
            let plans: Vec<_> = offered.iter().map(|plan| plan.quote()).collect();
            let payload = json!({
                "error": "report generation not permitted",
                "reason": reason.label(),
                "plans": plans,
            });
            (StatusCode::PAYMENT_REQUIRED, axum::Json(payload)).into_response()
        }
        ReportServiceError::Directory(DirectoryError::UnknownUser(user)) => {
            let payload = json!({ "error": format!("no billing profile for user {user}") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ReportServiceError::Repository(super::repository::RepositoryError::NotFound) => {
            let payload = json!({ "error": "report not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
