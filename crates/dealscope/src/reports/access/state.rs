use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Subscription lifecycle stage, mirrored from the billing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    TrialPending,
    TrialActive,
    Active,
    Expired,
    Canceled,
}

impl SubscriptionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TrialPending => "trial_pending",
            Self::TrialActive => "trial_active",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
        }
    }
}

/// Paid tier attached to an active subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Expert,
}

impl SubscriptionTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Expert => "expert",
        }
    }
}

/// Read-only billing snapshot for one user. Owned by the identity/billing
/// collaborator; the access policy consumes it without mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessState {
    pub status: SubscriptionStatus,
    pub trial_start: Option<DateTime<Utc>>,
    pub trial_end: Option<DateTime<Utc>>,
    pub tier: Option<SubscriptionTier>,
}

impl AccessState {
    /// State created at signup, before any payment info is collected.
    pub fn signup() -> Self {
        Self {
            status: SubscriptionStatus::TrialPending,
            trial_start: None,
            trial_end: None,
            tier: None,
        }
    }

    /// Apply a billing-collaborator event. Events that do not match the
    /// current status leave the state unchanged; there are no terminal
    /// states since a new checkout always reactivates.
    pub fn apply(&mut self, event: BillingEvent) {
        match (self.status, event) {
            (SubscriptionStatus::TrialPending, BillingEvent::TrialStarted { start, end }) => {
                self.status = SubscriptionStatus::TrialActive;
                self.trial_start = Some(start);
                self.trial_end = Some(end);
            }
            (
                SubscriptionStatus::TrialActive
                | SubscriptionStatus::Expired
                | SubscriptionStatus::Canceled,
                BillingEvent::CheckoutCompleted { tier },
            ) => {
                self.status = SubscriptionStatus::Active;
                self.tier = Some(tier);
            }
            (SubscriptionStatus::Active, BillingEvent::PaymentFailed) => {
                self.status = SubscriptionStatus::Expired;
            }
            (SubscriptionStatus::Active, BillingEvent::SubscriptionCanceled) => {
                self.status = SubscriptionStatus::Canceled;
            }
            _ => {}
        }
    }
}

/// State transitions driven by the external billing collaborator: elapsed
/// trial windows are observed by the policy, everything else arrives as an
/// event here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum BillingEvent {
    TrialStarted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    CheckoutCompleted {
        tier: SubscriptionTier,
    },
    PaymentFailed,
    SubscriptionCanceled,
}

/// Trial window sizing for `TrialStarted` events recorded by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialPolicy {
    pub trial_days: u32,
}

impl Default for TrialPolicy {
    fn default() -> Self {
        Self { trial_days: 7 }
    }
}

impl TrialPolicy {
    pub fn window_from(&self, start: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (start, start + Duration::days(i64::from(self.trial_days)))
    }
}
