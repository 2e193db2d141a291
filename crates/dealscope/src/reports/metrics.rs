//! Pure investment metrics engine.
//!
//! Stateless and deterministic: the same `PropertyInput` always produces
//! bit-for-bit identical `CalculatedMetrics`. The engine never rejects an
//! investment; it reports the numbers and a recommendation tier.

use super::domain::{Financing, PropertyInput};
use serde::{Deserialize, Serialize};

/// Closing cost assumption applied when explicit closing costs are not
/// modeled, in the same currency unit as the inputs.
pub const CLOSING_COST_ASSUMPTION: f64 = 5_000.0;

/// Cash-on-cash ROI above which a deal is rated a strong investment.
pub const STRONG_ROI_PCT: f64 = 8.0;
/// Cash-on-cash ROI above which a deal is rated a good investment.
pub const GOOD_ROI_PCT: f64 = 5.0;

/// Derived financial metrics for one property. Currency fields are annual
/// amounts; `roi` and `cap_rate` are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatedMetrics {
    pub net_operating_income: f64,
    pub annual_debt_service: f64,
    pub cash_flow: f64,
    pub total_annual_expenses: f64,
    pub roi: f64,
    pub cap_rate: f64,
}

/// Advisory rating consumed by the report renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Strong,
    Good,
    ConsiderAlternatives,
}

impl Recommendation {
    /// Classify a cash-on-cash ROI percentage. Both boundaries are strict:
    /// an ROI of exactly 8.0 rates Good, exactly 5.0 rates
    /// ConsiderAlternatives.
    pub fn for_roi(roi: f64) -> Self {
        if roi > STRONG_ROI_PCT {
            Self::Strong
        } else if roi > GOOD_ROI_PCT {
            Self::Good
        } else {
            Self::ConsiderAlternatives
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong Investment",
            Self::Good => "Good Investment",
            Self::ConsiderAlternatives => "Consider Alternatives",
        }
    }
}

/// Compute the full metric set for a validated input.
pub fn calculate(input: &PropertyInput) -> CalculatedMetrics {
    let annual_rent = input.monthly_rent * 12.0;

    let total_annual_expenses = input.annual_property_taxes
        + input.annual_insurance
        + input.hoa_fees_monthly * 12.0
        + input.maintenance_costs
        + input.other_expenses
        + annual_rent * (input.vacancy_rate_pct / 100.0)
        + annual_rent * (input.property_mgmt_fee_pct / 100.0);

    let net_operating_income = annual_rent - total_annual_expenses;

    let annual_debt_service = input
        .financing
        .as_ref()
        .map(annual_debt_service)
        .unwrap_or(0.0);

    let cash_flow = net_operating_income - annual_debt_service;

    let total_cash_invested = input.down_payment + CLOSING_COST_ASSUMPTION;
    let roi = if total_cash_invested > 0.0 {
        (cash_flow / total_cash_invested) * 100.0
    } else {
        0.0
    };

    let cap_rate = if input.purchase_price > 0.0 {
        (net_operating_income / input.purchase_price) * 100.0
    } else {
        0.0
    };

    CalculatedMetrics {
        net_operating_income,
        annual_debt_service,
        cash_flow,
        total_annual_expenses,
        roi,
        cap_rate,
    }
}

/// Annualized principal-and-interest payment via standard amortization.
/// A 0% rate falls back to straight-line repayment; the amortization
/// formula divides by zero there.
fn annual_debt_service(financing: &Financing) -> f64 {
    if financing.interest_rate_pct > 0.0 {
        let monthly_rate = (financing.interest_rate_pct / 100.0) / 12.0;
        let num_payments = f64::from(financing.loan_term_years * 12);
        let growth = (1.0 + monthly_rate).powf(num_payments);
        let monthly_payment = financing.loan_amount * (monthly_rate * growth) / (growth - 1.0);
        monthly_payment * 12.0
    } else {
        financing.loan_amount / f64::from(financing.loan_term_years)
    }
}
