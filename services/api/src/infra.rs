use dealscope::reports::access::{AccessState, BillingEvent, PlanId};
use dealscope::reports::domain::{ReportId, UserId};
use dealscope::reports::repository::{
    AccessDirectory, CheckoutError, CheckoutGateway, CheckoutSession, DirectoryError, ReportRecord,
    ReportRepository, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.report_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.report_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for(&self, user: &UserId) -> Result<Vec<ReportRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard
            .values()
            .filter(|record| &record.user_id == user)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.generated_at);
        Ok(records)
    }
}

/// Billing profile store for deployments without an external identity
/// provider. A profile is created at signup or on the first recorded
/// billing event, so starting a trial doubles as signup over HTTP.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAccessDirectory {
    profiles: Arc<Mutex<HashMap<UserId, AccessState>>>,
}

impl InMemoryAccessDirectory {
    pub(crate) fn register(&self, user: &UserId) -> AccessState {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        guard
            .entry(user.clone())
            .or_insert_with(AccessState::signup)
            .clone()
    }
}

impl AccessDirectory for InMemoryAccessDirectory {
    fn snapshot(&self, user: &UserId) -> Result<AccessState, DirectoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        guard
            .get(user)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownUser(user.clone()))
    }

    fn record(&self, user: &UserId, event: BillingEvent) -> Result<AccessState, DirectoryError> {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        let state = guard
            .entry(user.clone())
            .or_insert_with(AccessState::signup);
        state.apply(event);
        Ok(state.clone())
    }
}

/// Gateway stand-in that opens sessions locally instead of calling out to a
/// payment provider.
#[derive(Default, Clone)]
pub(crate) struct RecordingCheckoutGateway {
    sequence: Arc<AtomicU64>,
    sessions: Arc<Mutex<Vec<CheckoutSession>>>,
}

impl RecordingCheckoutGateway {
    pub(crate) fn sessions(&self) -> Vec<CheckoutSession> {
        self.sessions.lock().expect("gateway mutex poisoned").clone()
    }
}

impl CheckoutGateway for RecordingCheckoutGateway {
    fn begin_checkout(&self, user: &UserId, plan: PlanId) -> Result<CheckoutSession, CheckoutError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let session = CheckoutSession {
            session_id: format!("cs-{id:06}"),
            user_id: user.clone(),
            plan,
            amount_cents: plan.quote().price_cents,
        };
        self.sessions
            .lock()
            .expect("gateway mutex poisoned")
            .push(session.clone());
        Ok(session)
    }
}
