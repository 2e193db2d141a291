use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::access::{AccessState, BillingEvent, PlanId};
use super::domain::{PropertyInput, ReportId, UserId};
use super::metrics::{CalculatedMetrics, Recommendation};

/// Immutable persisted report: the validated input and its derived metrics
/// always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub report_id: ReportId,
    pub user_id: UserId,
    pub address: String,
    pub input: PropertyInput,
    pub metrics: CalculatedMetrics,
    pub recommendation: Recommendation,
    pub generated_at: DateTime<Utc>,
}

impl ReportRecord {
    pub fn view(&self) -> ReportView {
        ReportView {
            report_id: self.report_id.clone(),
            address: self.address.clone(),
            generated_at: self.generated_at,
            metrics: self.metrics,
            recommendation: self.recommendation.label(),
        }
    }
}

/// Renderer-facing representation of a saved report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub report_id: ReportId,
    pub address: String,
    pub generated_at: DateTime<Utc>,
    pub metrics: CalculatedMetrics,
    pub recommendation: &'static str,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError>;
    fn list_for(&self, user: &UserId) -> Result<Vec<ReportRecord>, RepositoryError>;
}

/// Persistence failure. A rejected write never loses the computed metrics;
/// recomputing from the same input is always safe.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("report already exists")]
    Conflict,
    #[error("report not found")]
    NotFound,
    #[error("report store unavailable: {0}")]
    Unavailable(String),
}

/// Identity/billing collaborator: supplies per-user billing snapshots and
/// records billing events. The core never owns this state.
pub trait AccessDirectory: Send + Sync {
    fn snapshot(&self, user: &UserId) -> Result<AccessState, DirectoryError>;
    fn record(&self, user: &UserId, event: BillingEvent) -> Result<AccessState, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("no billing profile for user {0}")]
    UnknownUser(UserId),
    #[error("billing directory unavailable: {0}")]
    Unavailable(String),
}

/// Payment collaborator: turns a plan selection into a checkout session.
/// Completion arrives asynchronously as a `BillingEvent`; the checkout
/// protocol itself is outside this crate.
pub trait CheckoutGateway: Send + Sync {
    fn begin_checkout(&self, user: &UserId, plan: PlanId) -> Result<CheckoutSession, CheckoutError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub user_id: UserId,
    pub plan: PlanId,
    pub amount_cents: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("checkout declined: {0}")]
    Declined(String),
    #[error("payment gateway unavailable: {0}")]
    Transport(String),
}

/// Billing status payload returned by the trial endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AccessStateView {
    pub user_id: UserId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<&'static str>,
}

impl AccessStateView {
    pub fn from_state(user_id: UserId, state: &AccessState) -> Self {
        Self {
            user_id,
            status: state.status.label(),
            trial_end: state.trial_end,
            tier: state.tier.map(|tier| tier.label()),
        }
    }
}
