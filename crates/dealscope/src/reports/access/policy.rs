use super::state::{AccessState, SubscriptionStatus, SubscriptionTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the report-generation gate for one snapshot at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AccessDecision {
    Allowed { basis: AccessBasis },
    Denied { reason: DenialReason },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed { .. })
    }
}

/// What granted access, for audit trails and response payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessBasis {
    ActiveSubscription(SubscriptionTier),
    TrialWindow { ends: DateTime<Utc> },
}

/// Why report generation was refused. A denial is not a system fault; the
/// caller routes the user to the payment collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    TrialNotStarted,
    TrialExpired,
    NoSubscription,
}

impl DenialReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TrialNotStarted => "trial_not_started",
            Self::TrialExpired => "trial_expired",
            Self::NoSubscription => "no_subscription",
        }
    }
}

/// Decide whether a report may be generated from the given billing snapshot.
///
/// Read-only predicate: it never mutates state and performs no I/O. Access
/// is granted to active subscriptions on a paid tier and to trials whose
/// window still covers `now`. A trial with no recorded end date is treated
/// as expired rather than open-ended.
pub fn can_generate_report(state: &AccessState, now: DateTime<Utc>) -> AccessDecision {
    match state.status {
        SubscriptionStatus::Active => match state.tier {
            Some(tier) if tier != SubscriptionTier::Free => AccessDecision::Allowed {
                basis: AccessBasis::ActiveSubscription(tier),
            },
            _ => AccessDecision::Denied {
                reason: DenialReason::NoSubscription,
            },
        },
        SubscriptionStatus::TrialActive => match state.trial_end {
            Some(ends) if now < ends => AccessDecision::Allowed {
                basis: AccessBasis::TrialWindow { ends },
            },
            _ => AccessDecision::Denied {
                reason: DenialReason::TrialExpired,
            },
        },
        SubscriptionStatus::TrialPending => AccessDecision::Denied {
            reason: DenialReason::TrialNotStarted,
        },
        SubscriptionStatus::Expired | SubscriptionStatus::Canceled => AccessDecision::Denied {
            reason: DenialReason::NoSubscription,
        },
    }
}
