use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::reports::access::{
    AccessState, BillingEvent, SubscriptionStatus, SubscriptionTier, TrialPolicy,
};
use crate::reports::domain::{PropertySubmission, ReportId, UserId};
use crate::reports::repository::{
    AccessDirectory, CheckoutError, CheckoutGateway, CheckoutSession, DirectoryError,
    ReportRecord, ReportRepository, RepositoryError,
};
use crate::reports::service::ReportService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
}

pub(super) fn user() -> UserId {
    UserId("investor-1".to_string())
}

/// Scenario A from the acceptance checklist: financed duplex purchase.
pub(super) fn financed_submission() -> PropertySubmission {
    PropertySubmission {
        address: "12 Elm St, Des Moines".to_string(),
        purchase_price: 250_000.0,
        monthly_rent: 2_000.0,
        annual_property_taxes: 3_000.0,
        annual_insurance: 1_200.0,
        maintenance_costs: 2_400.0,
        other_expenses: None,
        hoa_fees_monthly: None,
        vacancy_rate_pct: 5.0,
        property_mgmt_fee_pct: 10.0,
        loan_amount: Some(200_000.0),
        interest_rate_pct: Some(7.5),
        loan_term_years: Some(30),
        down_payment: Some(50_000.0),
    }
}

/// Scenario B: the same property bought all cash with no down payment.
pub(super) fn all_cash_submission() -> PropertySubmission {
    PropertySubmission {
        loan_amount: None,
        interest_rate_pct: None,
        loan_term_years: None,
        down_payment: None,
        ..financed_submission()
    }
}

pub(super) fn trial_active_state(ends: DateTime<Utc>) -> AccessState {
    AccessState {
        status: SubscriptionStatus::TrialActive,
        trial_start: Some(ends - chrono::Duration::days(7)),
        trial_end: Some(ends),
        tier: None,
    }
}

pub(super) fn active_state(tier: SubscriptionTier) -> AccessState {
    AccessState {
        status: SubscriptionStatus::Active,
        trial_start: None,
        trial_end: None,
        tier: Some(tier),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
}

impl ReportRepository for MemoryRepository {
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
        records.sort_by(|a, b| a.generated_at.cmp(&b.generated_at));
        Ok(records)
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for(&self, _user: &UserId) -> Result<Vec<ReportRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    profiles: Arc<Mutex<HashMap<UserId, AccessState>>>,
}

impl MemoryDirectory {
    pub(super) fn register(&self, user: &UserId) {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        guard.entry(user.clone()).or_insert_with(AccessState::signup);
    }

    pub(super) fn put(&self, user: &UserId, state: AccessState) {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        guard.insert(user.clone(), state);
    }
}

impl AccessDirectory for MemoryDirectory {
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
            .get_mut(user)
            .ok_or_else(|| DirectoryError::UnknownUser(user.clone()))?;
        state.apply(event);
        Ok(state.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryGateway {
    sessions: Arc<Mutex<Vec<CheckoutSession>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryGateway {
    pub(super) fn sessions(&self) -> Vec<CheckoutSession> {
        self.sessions.lock().expect("gateway mutex poisoned").clone()
    }
}

impl CheckoutGateway for MemoryGateway {
    fn begin_checkout(
        &self,
        user: &UserId,
        plan: crate::reports::access::PlanId,
    ) -> Result<CheckoutSession, CheckoutError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
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

pub(super) type TestService = ReportService<MemoryRepository, MemoryDirectory, MemoryGateway>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryRepository>,
    Arc<MemoryDirectory>,
    Arc<MemoryGateway>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let directory = Arc::new(MemoryDirectory::default());
    let gateway = Arc::new(MemoryGateway::default());
    let service = ReportService::new(
        repository.clone(),
        directory.clone(),
        gateway.clone(),
        TrialPolicy::default(),
    );
    (service, repository, directory, gateway)
}

/// Service with a registered user inside an open trial window.
pub(super) fn build_trial_service() -> (
    TestService,
    Arc<MemoryRepository>,
    Arc<MemoryDirectory>,
    Arc<MemoryGateway>,
) {
    let (service, repository, directory, gateway) = build_service();
    directory.put(&user(), trial_active_state(now() + chrono::Duration::days(3)));
    (service, repository, directory, gateway)
}
