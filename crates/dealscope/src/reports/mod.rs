//! Investment report generation: validation, metrics, access gating, and
//! the service/router surface over the collaborator traits.

pub mod access;
pub mod domain;
pub mod export;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use access::{
    can_generate_report, AccessBasis, AccessDecision, AccessState, BillingEvent, DenialReason,
    PlanId, PlanQuote, SubscriptionStatus, SubscriptionTier, TrialPolicy,
};
pub use domain::{Financing, PropertyInput, PropertySubmission, ReportId, UserId};
pub use export::write_csv;
pub use metrics::{calculate, CalculatedMetrics, Recommendation, CLOSING_COST_ASSUMPTION};
pub use repository::{
    AccessDirectory, AccessStateView, CheckoutError, CheckoutGateway, CheckoutSession,
    DirectoryError, ReportRecord, ReportRepository, ReportView, RepositoryError,
};
pub use router::report_router;
pub use service::{ReportService, ReportServiceError};
pub use validation::{validate, ValidationError};
