//! Trial/subscription access gating.
//!
//! `can_generate_report` is the single decision point: a pure predicate over
//! an `AccessState` snapshot and the current time. State transitions are
//! driven exclusively by `BillingEvent`s from the external billing
//! collaborator; the policy itself never mutates anything.

mod plans;
mod policy;
mod state;

pub use plans::{BillingPeriod, PlanId, PlanQuote};
pub use policy::{can_generate_report, AccessBasis, AccessDecision, DenialReason};
pub use state::{AccessState, BillingEvent, SubscriptionStatus, SubscriptionTier, TrialPolicy};
