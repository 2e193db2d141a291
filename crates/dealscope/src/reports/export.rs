use std::io::Write;

use super::repository::ReportRecord;

/// Write saved reports as CSV, one row per record, header first.
pub fn write_csv<W: Write>(records: &[ReportRecord], writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "report_id",
        "user_id",
        "address",
        "generated_at",
        "purchase_price",
        "monthly_rent",
        "total_annual_expenses",
        "net_operating_income",
        "annual_debt_service",
        "cash_flow",
        "roi_pct",
        "cap_rate_pct",
        "recommendation",
    ])?;

    for record in records {
        out.write_record([
            record.report_id.0.as_str(),
            record.user_id.0.as_str(),
            record.address.as_str(),
            &record.generated_at.to_rfc3339(),
            &format!("{:.2}", record.input.purchase_price),
            &format!("{:.2}", record.input.monthly_rent),
            &format!("{:.2}", record.metrics.total_annual_expenses),
            &format!("{:.2}", record.metrics.net_operating_income),
            &format!("{:.2}", record.metrics.annual_debt_service),
            &format!("{:.2}", record.metrics.cash_flow),
            &format!("{:.2}", record.metrics.roi),
            &format!("{:.2}", record.metrics.cap_rate),
            record.recommendation.label(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv export failed: {0}")]
    Io(#[from] std::io::Error),
}
