//! Trial and subscription gating scenarios exercised through the service
//! facade: denial reasons, plan offers, and reactivation after checkout.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};

    use dealscope::reports::access::{AccessState, BillingEvent, PlanId, TrialPolicy};
    use dealscope::reports::domain::{PropertySubmission, ReportId, UserId};
    use dealscope::reports::repository::{
        AccessDirectory, CheckoutError, CheckoutGateway, CheckoutSession, DirectoryError,
        ReportRecord, ReportRepository, RepositoryError,
    };
    use dealscope::reports::service::ReportService;

    pub(super) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
    }

    pub(super) fn investor() -> UserId {
        UserId("investor-1".to_string())
    }

    pub(super) fn submission() -> PropertySubmission {
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
            loan_amount: None,
            interest_rate_pct: None,
            loan_term_years: None,
            down_payment: None,
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct Repository {
        records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
    }

    impl ReportRepository for Repository {
        fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.report_id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.report_id.clone(), record.clone());
            Ok(record)
        }

        fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
            Ok(self.records.lock().expect("lock").get(id).cloned())
        }

        fn list_for(&self, user: &UserId) -> Result<Vec<ReportRecord>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .expect("lock")
                .values()
                .filter(|record| &record.user_id == user)
                .cloned()
                .collect())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct Directory {
        profiles: Arc<Mutex<HashMap<UserId, AccessState>>>,
    }

    impl Directory {
        pub(super) fn register(&self, user: &UserId) {
            self.profiles
                .lock()
                .expect("lock")
                .entry(user.clone())
                .or_insert_with(AccessState::signup);
        }
    }

    impl AccessDirectory for Directory {
        fn snapshot(&self, user: &UserId) -> Result<AccessState, DirectoryError> {
            self.profiles
                .lock()
                .expect("lock")
                .get(user)
                .cloned()
                .ok_or_else(|| DirectoryError::UnknownUser(user.clone()))
        }

        fn record(&self, user: &UserId, event: BillingEvent) -> Result<AccessState, DirectoryError> {
            let mut guard = self.profiles.lock().expect("lock");
            let state = guard
                .get_mut(user)
                .ok_or_else(|| DirectoryError::UnknownUser(user.clone()))?;
            state.apply(event);
            Ok(state.clone())
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct Gateway;

    impl CheckoutGateway for Gateway {
        fn begin_checkout(
            &self,
            user: &UserId,
            plan: PlanId,
        ) -> Result<CheckoutSession, CheckoutError> {
            Ok(CheckoutSession {
                session_id: "cs-000001".to_string(),
                user_id: user.clone(),
                plan,
                amount_cents: plan.quote().price_cents,
            })
        }
    }

    pub(super) fn build_service() -> (
        Arc<ReportService<Repository, Directory, Gateway>>,
        Arc<Directory>,
    ) {
        let directory = Arc::new(Directory::default());
        let service = Arc::new(ReportService::new(
            Arc::new(Repository::default()),
            directory.clone(),
            Arc::new(Gateway),
            TrialPolicy::default(),
        ));
        (service, directory)
    }
}

mod gating {
    use super::common::*;
    use chrono::Duration;
    use dealscope::reports::access::{BillingEvent, DenialReason, SubscriptionTier, TrialPolicy};
    use dealscope::reports::repository::AccessDirectory;
    use dealscope::reports::service::ReportServiceError;

    fn denial_reason(error: ReportServiceError) -> DenialReason {
        match error {
            ReportServiceError::AccessDenied { reason, .. } => reason,
            other => panic!("expected access denial, got {other:?}"),
        }
    }

    #[test]
    fn fresh_signup_is_denied_until_the_trial_starts() {
        let (service, directory) = build_service();
        directory.register(&investor());

        let error = service
            .generate(&investor(), submission(), now())
            .expect_err("denied before trial");
        assert_eq!(denial_reason(error), DenialReason::TrialNotStarted);

        service
            .start_trial(&investor(), now())
            .expect("trial starts");
        assert!(service.generate(&investor(), submission(), now()).is_ok());
    }

    #[test]
    fn expired_trial_is_denied_with_plan_offers() {
        let (service, directory) = build_service();
        directory.register(&investor());
        service
            .start_trial(&investor(), now())
            .expect("trial starts");

        let trial_days = i64::from(TrialPolicy::default().trial_days);
        let after_window = now() + Duration::days(trial_days) + Duration::seconds(1);

        match service.generate(&investor(), submission(), after_window) {
            Err(ReportServiceError::AccessDenied { reason, offered }) => {
                assert_eq!(reason, DenialReason::TrialExpired);
                assert_eq!(offered.len(), 3);
            }
            other => panic!("expected expired-trial denial, got {other:?}"),
        }
    }

    #[test]
    fn checkout_reactivates_an_expired_trial_user() {
        let (service, directory) = build_service();
        directory.register(&investor());
        service
            .start_trial(&investor(), now())
            .expect("trial starts");

        let after_window = now() + Duration::days(30);
        let error = service
            .generate(&investor(), submission(), after_window)
            .expect_err("trial lapsed");
        assert_eq!(denial_reason(error), DenialReason::TrialExpired);

        // Billing confirms the purchase, so the gate reopens.
        directory
            .record(
                &investor(),
                BillingEvent::CheckoutCompleted {
                    tier: SubscriptionTier::Pro,
                },
            )
            .expect("event recorded");
        assert!(service
            .generate(&investor(), submission(), after_window)
            .is_ok());
    }

    #[test]
    fn cancellation_closes_the_gate() {
        let (service, directory) = build_service();
        directory.register(&investor());
        service
            .start_trial(&investor(), now())
            .expect("trial starts");
        directory
            .record(
                &investor(),
                BillingEvent::CheckoutCompleted {
                    tier: SubscriptionTier::Expert,
                },
            )
            .expect("event recorded");
        assert!(service.generate(&investor(), submission(), now()).is_ok());

        directory
            .record(&investor(), BillingEvent::SubscriptionCanceled)
            .expect("event recorded");
        let error = service
            .generate(&investor(), submission(), now())
            .expect_err("denied after cancellation");
        assert_eq!(denial_reason(error), DenialReason::NoSubscription);
    }
}
