use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::access::{
    can_generate_report, AccessDecision, BillingEvent, DenialReason, PlanId, TrialPolicy,
};
use super::domain::{PropertySubmission, ReportId, UserId};
use super::metrics::{self, Recommendation};
use super::repository::{
    AccessDirectory, AccessStateView, CheckoutError, CheckoutGateway, CheckoutSession,
    DirectoryError, ReportRecord, ReportRepository, RepositoryError,
};
use super::validation::{self, ValidationError};

/// Service composing validation, the access gate, the metrics engine, and
/// the collaborator boundaries.
pub struct ReportService<R, D, G> {
    repository: Arc<R>,
    directory: Arc<D>,
    gateway: Arc<G>,
    trial: TrialPolicy,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

impl<R, D, G> ReportService<R, D, G>
where
    R: ReportRepository + 'static,
    D: AccessDirectory + 'static,
    G: CheckoutGateway + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>, gateway: Arc<G>, trial: TrialPolicy) -> Self {
        Self {
            repository,
            directory,
            gateway,
            trial,
        }
    }

    /// Generate and persist a report for one property submission.
    ///
    /// Validation runs first and nothing is computed from an invalid
    /// submission. The access decision is made from the directory snapshot
    /// as of `now`; a denial carries the plans to offer instead.
    pub fn generate(
        &self,
        user: &UserId,
        submission: PropertySubmission,
        now: DateTime<Utc>,
    ) -> Result<ReportRecord, ReportServiceError> {
        let input = validation::validate(&submission)?;

        let state = self.directory.snapshot(user)?;
        if let AccessDecision::Denied { reason } = can_generate_report(&state, now) {
            return Err(ReportServiceError::AccessDenied {
                reason,
                offered: PlanId::offered().to_vec(),
            });
        }

        let calculated = metrics::calculate(&input);
        let recommendation = Recommendation::for_roi(calculated.roi);

        let record = ReportRecord {
            report_id: next_report_id(),
            user_id: user.clone(),
            address: submission.address.trim().to_string(),
            input,
            metrics: calculated,
            recommendation,
            generated_at: now,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Fetch a persisted report by id.
    pub fn report(&self, id: &ReportId) -> Result<ReportRecord, ReportServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// All reports saved for one user.
    pub fn reports_for(&self, user: &UserId) -> Result<Vec<ReportRecord>, ReportServiceError> {
        let records = self.repository.list_for(user)?;
        Ok(records)
    }

    /// Open the trial window for a user, recording the event with the
    /// billing directory. The window length comes from the trial policy.
    pub fn start_trial(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<AccessStateView, ReportServiceError> {
        let (start, end) = self.trial.window_from(now);
        let state = self
            .directory
            .record(user, BillingEvent::TrialStarted { start, end })?;
        Ok(AccessStateView::from_state(user.clone(), &state))
    }

    /// Begin a checkout for one of the offered plans. Completion arrives
    /// later as a billing event; this only opens the session.
    pub fn checkout(
        &self,
        user: &UserId,
        plan: PlanId,
    ) -> Result<CheckoutSession, ReportServiceError> {
        // Surface unknown users here rather than as a gateway decline.
        self.directory.snapshot(user)?;
        let session = self.gateway.begin_checkout(user, plan)?;
        Ok(session)
    }
}

/// Error raised by the report service. A denial is an expected outcome, not
/// a fault; nothing here is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("report generation not permitted ({})", reason.label())]
    AccessDenied {
        reason: DenialReason,
        offered: Vec<PlanId>,
    },
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}
