use crate::infra::{InMemoryAccessDirectory, InMemoryReportRepository, RecordingCheckoutGateway};
use chrono::{Duration, Utc};
use clap::Args;
use dealscope::error::AppError;
use dealscope::reports::access::{BillingEvent, BillingPeriod, PlanId, PlanQuote, TrialPolicy};
use dealscope::reports::domain::{PropertySubmission, UserId};
use dealscope::reports::export::write_csv;
use dealscope::reports::metrics::{self, CalculatedMetrics, Recommendation};
use dealscope::reports::repository::{AccessDirectory, ReportRecord};
use dealscope::reports::service::{ReportService, ReportServiceError};
use dealscope::reports::validation;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Street address of the property
    #[arg(long)]
    pub(crate) address: String,
    /// Purchase price in dollars
    #[arg(long)]
    pub(crate) purchase_price: f64,
    /// Expected monthly rent in dollars
    #[arg(long)]
    pub(crate) monthly_rent: f64,
    /// Annual property taxes in dollars
    #[arg(long)]
    pub(crate) annual_taxes: f64,
    /// Annual insurance premium in dollars
    #[arg(long)]
    pub(crate) annual_insurance: f64,
    /// Annual maintenance budget in dollars
    #[arg(long)]
    pub(crate) maintenance: f64,
    /// Other annual expenses in dollars
    #[arg(long)]
    pub(crate) other_expenses: Option<f64>,
    /// Monthly HOA fees in dollars
    #[arg(long)]
    pub(crate) hoa_monthly: Option<f64>,
    /// Vacancy allowance as a percentage of gross rent
    #[arg(long, default_value_t = 5.0)]
    pub(crate) vacancy_rate: f64,
    /// Property management fee as a percentage of gross rent
    #[arg(long, default_value_t = 10.0)]
    pub(crate) mgmt_fee: f64,
    /// Loan principal in dollars (requires interest rate and term)
    #[arg(long)]
    pub(crate) loan_amount: Option<f64>,
    /// Annual interest rate as a percentage
    #[arg(long)]
    pub(crate) interest_rate: Option<f64>,
    /// Loan term in years
    #[arg(long)]
    pub(crate) loan_term_years: Option<u32>,
    /// Down payment in dollars
    #[arg(long)]
    pub(crate) down_payment: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Trial window length in days
    #[arg(long, default_value_t = 7)]
    pub(crate) trial_days: u32,
    /// Write the generated reports to this CSV file
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
    /// Skip the checkout portion of the demo
    #[arg(long)]
    pub(crate) skip_checkout: bool,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        address,
        purchase_price,
        monthly_rent,
        annual_taxes,
        annual_insurance,
        maintenance,
        other_expenses,
        hoa_monthly,
        vacancy_rate,
        mgmt_fee,
        loan_amount,
        interest_rate,
        loan_term_years,
        down_payment,
    } = args;

    let submission = PropertySubmission {
        address,
        purchase_price,
        monthly_rent,
        annual_property_taxes: annual_taxes,
        annual_insurance,
        maintenance_costs: maintenance,
        other_expenses,
        hoa_fees_monthly: hoa_monthly,
        vacancy_rate_pct: vacancy_rate,
        property_mgmt_fee_pct: mgmt_fee,
        loan_amount,
        interest_rate_pct: interest_rate,
        loan_term_years,
        down_payment,
    };

    let input = validation::validate(&submission).map_err(ReportServiceError::from)?;
    let calculated = metrics::calculate(&input);
    let recommendation = Recommendation::for_roi(calculated.roi);

    println!("Deal analysis for {}", submission.address.trim());
    match &input.financing {
        Some(financing) => println!(
            "Financing: ${:.0} at {:.2}% over {} years",
            financing.loan_amount, financing.interest_rate_pct, financing.loan_term_years
        ),
        None => println!("Financing: all cash"),
    }
    print_metrics(&calculated, recommendation);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        trial_days,
        csv_out,
        skip_checkout,
    } = args;

    let now = Utc::now();
    let investor = UserId("demo-investor".to_string());

    let repository = Arc::new(InMemoryReportRepository::default());
    let directory = Arc::new(InMemoryAccessDirectory::default());
    let gateway = Arc::new(RecordingCheckoutGateway::default());
    let service = ReportService::new(
        repository,
        directory.clone(),
        gateway.clone(),
        TrialPolicy { trial_days },
    );

    println!("Deal analysis demo");
    directory.register(&investor);
    println!("- Signed up {investor} (no trial yet)");

    match service.generate(&investor, financed_sample(), now) {
        Err(ReportServiceError::AccessDenied { reason, offered }) => {
            println!("- Report request denied: {}", reason.label());
            print_plans(&offered);
        }
        Ok(_) => println!("- Unexpected: report generated before the trial started"),
        Err(err) => println!("- Report request failed: {err}"),
    }

    let view = service.start_trial(&investor, now)?;
    match view.trial_end {
        Some(end) => println!("- Trial opened, ends {}", end.to_rfc3339()),
        None => println!("- Trial opened"),
    }

    for submission in [financed_sample(), all_cash_sample()] {
        match service.generate(&investor, submission, now) {
            Ok(record) => render_report(&record),
            Err(err) => println!("- Report generation failed: {err}"),
        }
    }

    let after_trial = now + Duration::days(i64::from(trial_days)) + Duration::hours(1);
    println!(
        "\nFast-forward past the trial window ({} days)",
        trial_days
    );
    match service.generate(&investor, financed_sample(), after_trial) {
        Err(ReportServiceError::AccessDenied { reason, offered }) => {
            println!("- Report request denied: {}", reason.label());
            print_plans(&offered);
        }
        Ok(_) => println!("- Unexpected: report generated after the trial ended"),
        Err(err) => println!("- Report request failed: {err}"),
    }

    if !skip_checkout {
        let session = service.checkout(&investor, PlanId::Pro)?;
        println!(
            "\n- Checkout session {} opened for {} (${:.2})",
            session.session_id,
            session.plan.label(),
            f64::from(session.amount_cents) / 100.0
        );

        // The payment provider would confirm asynchronously; the demo
        // records the completion event directly.
        if let Some(tier) = PlanId::Pro.granted_tier() {
            directory
                .record(&investor, BillingEvent::CheckoutCompleted { tier })
                .map_err(ReportServiceError::from)?;
        }
        match service.generate(&investor, financed_sample(), after_trial) {
            Ok(record) => {
                println!("- Subscription active, reports flowing again");
                render_report(&record);
            }
            Err(err) => println!("- Report generation failed: {err}"),
        }
    }

    if let Some(path) = csv_out {
        let records = service.reports_for(&investor)?;
        match std::fs::File::create(&path) {
            Ok(file) => match write_csv(&records, file) {
                Ok(()) => println!("\nWrote {} reports to {}", records.len(), path.display()),
                Err(err) => println!("\nCSV export failed: {err}"),
            },
            Err(err) => println!("\nCSV export failed: {err}"),
        }
    }

    Ok(())
}

fn render_report(record: &ReportRecord) {
    println!("\nReport {} for {}", record.report_id, record.address);
    print_metrics(&record.metrics, record.recommendation);
}

fn print_metrics(calculated: &CalculatedMetrics, recommendation: Recommendation) {
    println!("  Total annual expenses: ${:.2}", calculated.total_annual_expenses);
    println!("  Net operating income:  ${:.2}", calculated.net_operating_income);
    println!("  Annual debt service:   ${:.2}", calculated.annual_debt_service);
    println!("  Annual cash flow:      ${:.2}", calculated.cash_flow);
    println!("  Cash-on-cash ROI:      {:.2}%", calculated.roi);
    println!("  Cap rate:              {:.2}%", calculated.cap_rate);
    println!("  Recommendation:        {}", recommendation.label());
}

fn print_plans(offered: &[PlanId]) {
    println!("  Plans available:");
    for quote in offered.iter().map(|plan| plan.quote()) {
        println!("    - {}", describe_quote(&quote));
    }
}

fn describe_quote(quote: &PlanQuote) -> String {
    let price = f64::from(quote.price_cents) / 100.0;
    let cadence = match quote.period {
        BillingPeriod::PerReport => "per report",
        BillingPeriod::Monthly => "per month",
    };
    match quote.monthly_report_quota {
        Some(quota) => format!(
            "{}: ${:.2} {} ({} reports/month)",
            quote.plan.label(),
            price,
            cadence,
            quota
        ),
        None => format!(
            "{}: ${:.2} {} (unlimited reports)",
            quote.plan.label(),
            price,
            cadence
        ),
    }
}

fn financed_sample() -> PropertySubmission {
    PropertySubmission {
        address: "128 Maple Ave, Cedar Rapids".to_string(),
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

fn all_cash_sample() -> PropertySubmission {
    PropertySubmission {
        address: "77 Oak Ct, Ankeny".to_string(),
        purchase_price: 180_000.0,
        monthly_rent: 1_650.0,
        annual_property_taxes: 2_300.0,
        annual_insurance: 950.0,
        maintenance_costs: 1_800.0,
        other_expenses: Some(400.0),
        hoa_fees_monthly: None,
        vacancy_rate_pct: 5.0,
        property_mgmt_fee_pct: 8.0,
        loan_amount: None,
        interest_rate_pct: None,
        loan_term_years: None,
        down_payment: None,
    }
}
