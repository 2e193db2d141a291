use super::state::SubscriptionTier;
use serde::{Deserialize, Serialize};

/// Plans offered when access is denied. Closed set: the payment
/// collaborator boundary matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    PayPerReport,
    Pro,
    Expert,
}

impl PlanId {
    /// Plans presented alongside an access denial, cheapest first.
    pub const fn offered() -> [Self; 3] {
        [Self::PayPerReport, Self::Pro, Self::Expert]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PayPerReport => "Pay-Per-Report",
            Self::Pro => "Pro Subscription",
            Self::Expert => "Expert Subscription",
        }
    }

    /// Tier granted when a checkout for this plan completes. Pay-per-report
    /// purchases do not change the subscription; fulfillment of the single
    /// report credit stays with the payment collaborator.
    pub const fn granted_tier(self) -> Option<SubscriptionTier> {
        match self {
            Self::PayPerReport => None,
            Self::Pro => Some(SubscriptionTier::Pro),
            Self::Expert => Some(SubscriptionTier::Expert),
        }
    }

    pub const fn quote(self) -> PlanQuote {
        match self {
            Self::PayPerReport => PlanQuote {
                plan: self,
                price_cents: 500,
                period: BillingPeriod::PerReport,
                monthly_report_quota: Some(1),
            },
            Self::Pro => PlanQuote {
                plan: self,
                price_cents: 2_500,
                period: BillingPeriod::Monthly,
                monthly_report_quota: Some(150),
            },
            Self::Expert => PlanQuote {
                plan: self,
                price_cents: 5_000,
                period: BillingPeriod::Monthly,
                monthly_report_quota: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    PerReport,
    Monthly,
}

/// Price card entry for one plan. `monthly_report_quota` of `None` means
/// unlimited reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanQuote {
    pub plan: PlanId,
    pub price_cents: u32,
    pub period: BillingPeriod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_report_quota: Option<u32>,
}
