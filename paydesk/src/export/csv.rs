//! Analytics CSV export
//!
//! One row per request, RFC 4180 quoting, `\n` line endings.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone};
use shared::models::PaymentRequest;
use shared::money;

use super::{ExportResult, write_file};
use crate::views::analytics::calendar_date;

pub const CSV_HEADER: [&str; 6] = [
    "Invoice Number",
    "Vendor/Employee",
    "Amount",
    "Status",
    "Department",
    "Date",
];

const NOT_AVAILABLE: &str = "N/A";

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_record(out: &mut String, fields: &[&str]) {
    let line: Vec<String> = fields.iter().map(|f| quote(f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() { NOT_AVAILABLE } else { value }
}

/// CSV body with dates rendered in the local time zone
pub fn analytics_csv(requests: &[PaymentRequest]) -> String {
    analytics_csv_in(requests, &Local)
}

pub fn analytics_csv_in<Tz: TimeZone>(requests: &[PaymentRequest], tz: &Tz) -> String {
    let mut out = String::new();
    push_record(&mut out, &CSV_HEADER);
    for request in requests {
        let amount = money::format_decimal(money::to_decimal(request.total_amount));
        let date = calendar_date(&request.created_at, tz)
            .map(|d| d.format("%m/%d/%Y").to_string())
            .unwrap_or_else(|| request.created_at.clone());
        push_record(
            &mut out,
            &[
                request.invoice_number().unwrap_or(""),
                or_na(request.counterparty()),
                &amount,
                request.status.as_str(),
                or_na(request.department.as_deref().unwrap_or("")),
                &date,
            ],
        );
    }
    out
}

/// `analytics-2024-01-31.csv`
pub fn analytics_file_name(date: NaiveDate) -> String {
    format!("analytics-{}.csv", date.format("%Y-%m-%d"))
}

/// Write today's analytics CSV into `dir`
pub fn write_analytics_csv(dir: &Path, requests: &[PaymentRequest]) -> ExportResult<PathBuf> {
    let name = analytics_file_name(Local::now().date_naive());
    let path = write_file(dir, &name, analytics_csv(requests).as_bytes())?;
    tracing::info!(rows = requests.len(), "Analytics CSV exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use paydesk_client::MockBackend;

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_fixture_rows() {
        let csv = analytics_csv_in(&MockBackend::new().requests(), &Utc);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Invoice Number,Vendor/Employee,Amount,Status,Department,Date");
        assert_eq!(lines.len(), 4);

        let salary = lines.iter().find(|l| l.starts_with("SAL-2024-001")).unwrap();
        assert!(salary.contains(",5000.00,pending,"));
        assert!(salary.ends_with(",01/25/2024"));

        // Tools requests have no invoice number
        let tools = lines.iter().find(|l| l.contains(",229.00,")).unwrap();
        assert!(tools.starts_with(','));
        assert!(tools.contains(",rejected,"));
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(analytics_csv(&[]).lines().count(), 1);
        assert!(analytics_csv(&[]).ends_with('\n'));
    }

    #[test]
    fn test_file_name_and_write() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(analytics_file_name(date), "analytics-2024-01-31.csv");

        let dir = tempfile::TempDir::new().unwrap();
        let path = write_analytics_csv(dir.path(), &MockBackend::new().requests()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("analytics-") && name.ends_with(".csv"));
        assert!(std::fs::read_to_string(path).unwrap().starts_with("Invoice Number,"));
    }
}
