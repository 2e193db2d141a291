use super::domain::{Financing, PropertyInput, PropertySubmission};

/// Minimum meaningful address length, matching the intake form contract.
const MIN_ADDRESS_LEN: usize = 5;

/// Rejection raised before the metrics engine runs. Nothing is ever
/// partially computed from an invalid submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("property address must be at least {MIN_ADDRESS_LEN} characters")]
    AddressTooShort,
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("purchase price must be greater than zero")]
    NonPositivePurchasePrice,
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("loan term must be between 1 and 50 years, got {years}")]
    LoanTermOutOfRange { years: u32 },
}

/// Validate a raw submission and normalize it for the engine.
///
/// Absent optional amounts default to zero. The three loan fields collapse
/// into `Financing` only when all of them are present; otherwise the
/// purchase is treated as all cash.
pub fn validate(submission: &PropertySubmission) -> Result<PropertyInput, ValidationError> {
    if submission.address.trim().len() < MIN_ADDRESS_LEN {
        return Err(ValidationError::AddressTooShort);
    }

    let purchase_price = finite("purchase price", submission.purchase_price)?;
    if purchase_price <= 0.0 {
        return Err(ValidationError::NonPositivePurchasePrice);
    }

    let monthly_rent = non_negative("monthly rent", submission.monthly_rent)?;
    let annual_property_taxes =
        non_negative("annual property taxes", submission.annual_property_taxes)?;
    let annual_insurance = non_negative("annual insurance", submission.annual_insurance)?;
    let maintenance_costs = non_negative("maintenance costs", submission.maintenance_costs)?;
    let other_expenses = non_negative("other expenses", submission.other_expenses.unwrap_or(0.0))?;
    let hoa_fees_monthly = non_negative("HOA fees", submission.hoa_fees_monthly.unwrap_or(0.0))?;
    let down_payment = non_negative("down payment", submission.down_payment.unwrap_or(0.0))?;

    let vacancy_rate_pct = in_range("vacancy rate", submission.vacancy_rate_pct, 0.0, 100.0)?;
    let property_mgmt_fee_pct = in_range(
        "property management fee",
        submission.property_mgmt_fee_pct,
        0.0,
        100.0,
    )?;

    let financing = normalize_financing(submission)?;

    Ok(PropertyInput {
        purchase_price,
        monthly_rent,
        annual_property_taxes,
        annual_insurance,
        hoa_fees_monthly,
        maintenance_costs,
        other_expenses,
        vacancy_rate_pct,
        property_mgmt_fee_pct,
        down_payment,
        financing,
    })
}

fn normalize_financing(
    submission: &PropertySubmission,
) -> Result<Option<Financing>, ValidationError> {
    if let Some(amount) = submission.loan_amount {
        non_negative("loan amount", amount)?;
    }
    if let Some(rate) = submission.interest_rate_pct {
        in_range("interest rate", rate, 0.0, 50.0)?;
    }
    if let Some(years) = submission.loan_term_years {
        if !(1..=50).contains(&years) {
            return Err(ValidationError::LoanTermOutOfRange { years });
        }
    }

    match (
        submission.loan_amount,
        submission.interest_rate_pct,
        submission.loan_term_years,
    ) {
        (Some(loan_amount), Some(interest_rate_pct), Some(loan_term_years)) => {
            Ok(Some(Financing {
                loan_amount,
                interest_rate_pct,
                loan_term_years,
            }))
        }
        _ => Ok(None),
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(value)
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(value)
}
