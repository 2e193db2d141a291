use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a persisted investment report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque user identifier supplied by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw property financials as submitted by the caller.
///
/// Optional fields stay `Option` until validation; absent values are
/// normalized to zero (or to an all-cash assumption for the loan fields)
/// rather than coerced implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySubmission {
    pub address: String,
    pub purchase_price: f64,
    pub monthly_rent: f64,
    pub annual_property_taxes: f64,
    pub annual_insurance: f64,
    pub maintenance_costs: f64,
    #[serde(default)]
    pub other_expenses: Option<f64>,
    #[serde(default)]
    pub hoa_fees_monthly: Option<f64>,
    pub vacancy_rate_pct: f64,
    pub property_mgmt_fee_pct: f64,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub interest_rate_pct: Option<f64>,
    #[serde(default)]
    pub loan_term_years: Option<u32>,
    #[serde(default)]
    pub down_payment: Option<f64>,
}

/// Validated, normalized input to the metrics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    pub purchase_price: f64,
    pub monthly_rent: f64,
    pub annual_property_taxes: f64,
    pub annual_insurance: f64,
    pub hoa_fees_monthly: f64,
    pub maintenance_costs: f64,
    pub other_expenses: f64,
    pub vacancy_rate_pct: f64,
    pub property_mgmt_fee_pct: f64,
    pub down_payment: f64,
    /// `Some` only when the loan amount, rate, and term were all supplied.
    /// `None` means the purchase is treated as all cash and debt service
    /// is zero.
    pub financing: Option<Financing>,
}

/// Loan terms for the debt service calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    pub loan_amount: f64,
    pub interest_rate_pct: f64,
    pub loan_term_years: u32,
}
