//! Analytics over the loaded requests
//!
//! Everything is computed client-side from one list call. Buckets use
//! `BTreeMap` so departments and months come out in a stable order.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use paydesk_client::{ClientResult, HttpClient, OfflineClient, Origin};
use serde::Serialize;
use shared::models::{PaymentRequest, RequestFilter, RequestStatus, TemplateType};
use shared::money;

/// Department label for requests without one
pub const UNASSIGNED: &str = "Unassigned";

/// How many requests the "largest payments" list shows
pub const TOP_REQUESTS: usize = 5;

/// How many calendar months the trend covers
pub const TREND_MONTHS: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: RequestStatus) {
        self.total += 1;
        match status {
            RequestStatus::Pending => self.pending += 1,
            RequestStatus::Approved => self.approved += 1,
            RequestStatus::Rejected => self.rejected += 1,
        }
    }

    pub fn get(&self, status: RequestStatus) -> usize {
        match status {
            RequestStatus::Pending => self.pending,
            RequestStatus::Approved => self.approved,
            RequestStatus::Rejected => self.rejected,
        }
    }

    pub fn from_requests<'a>(requests: impl IntoIterator<Item = &'a PaymentRequest>) -> Self {
        let mut counts = Self::default();
        for request in requests {
            counts.add(request.status);
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub counts: StatusCounts,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStats {
    pub name: String,
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateUsage {
    pub template: TemplateType,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: RequestStatus,
    pub count: usize,
    /// 0-100, one decimal
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub summary: Summary,
    pub departments: Vec<DepartmentStats>,
    pub top_requests: Vec<PaymentRequest>,
    pub template_usage: Vec<TemplateUsage>,
    pub monthly: Vec<MonthlyTrend>,
    pub status_distribution: Vec<StatusShare>,
}

/// Calendar month (`YYYY-MM`) of a `createdAt` value in `tz`.
///
/// Bare dates are taken as they are; timestamps are converted first.
pub fn month_key<Tz: TimeZone>(created_at: &str, tz: &Tz) -> Option<String> {
    let date = calendar_date(created_at, tz)?;
    Some(format!("{:04}-{:02}", date.year(), date.month()))
}

/// Calendar date of a timestamp in `tz`; bare `YYYY-MM-DD` values are taken as-is
pub fn calendar_date<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at.with_timezone(tz).date_naive()),
        Err(_) => NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok(),
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}

impl AnalyticsReport {
    /// Report with months bucketed in the local time zone
    pub fn build(requests: &[PaymentRequest]) -> Self {
        Self::build_in(requests, &Local)
    }

    pub fn build_in<Tz: TimeZone>(requests: &[PaymentRequest], tz: &Tz) -> Self {
        let counts = StatusCounts::from_requests(requests);
        let summary = Summary {
            counts,
            total_amount: money::sum_f64(requests.iter().map(|r| r.total_amount)),
        };

        let mut departments: BTreeMap<String, StatusCounts> = BTreeMap::new();
        let mut templates: BTreeMap<TemplateType, usize> = BTreeMap::new();
        let mut months: BTreeMap<String, StatusCounts> = BTreeMap::new();
        for request in requests {
            let department = request
                .department
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(UNASSIGNED);
            departments
                .entry(department.to_string())
                .or_default()
                .add(request.status);
            *templates.entry(request.template()).or_default() += 1;
            match month_key(&request.created_at, tz) {
                Some(month) => months.entry(month).or_default().add(request.status),
                None => {
                    tracing::debug!(id = request.id, created_at = %request.created_at, "Skipping unparsable date in trend")
                }
            }
        }

        let mut top_requests = requests.to_vec();
        top_requests.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
        top_requests.truncate(TOP_REQUESTS);

        let skip = months.len().saturating_sub(TREND_MONTHS);
        let monthly = months
            .into_iter()
            .skip(skip)
            .map(|(month, counts)| MonthlyTrend { month, counts })
            .collect();

        let status_distribution = [
            RequestStatus::Approved,
            RequestStatus::Pending,
            RequestStatus::Rejected,
        ]
        .into_iter()
        .map(|status| StatusShare {
            status,
            count: counts.get(status),
            percent: percent(counts.get(status), counts.total),
        })
        .collect();

        Self {
            summary,
            departments: departments
                .into_iter()
                .map(|(name, counts)| DepartmentStats { name, counts })
                .collect(),
            top_requests,
            template_usage: templates
                .into_iter()
                .map(|(template, count)| TemplateUsage {
                    template,
                    label: template.title(),
                    count,
                })
                .collect(),
            monthly,
            status_distribution,
        }
    }
}

/// Analytics page state
#[derive(Debug, Default)]
pub struct AnalyticsView {
    pub requests: Vec<PaymentRequest>,
    pub origin: Option<Origin>,
}

impl AnalyticsView {
    pub async fn load<C: HttpClient>(client: &OfflineClient<C>) -> ClientResult<Self> {
        let served = client.list_requests(&RequestFilter::default()).await?;
        Ok(Self {
            requests: served.value.data,
            origin: Some(served.origin),
        })
    }

    pub fn report(&self) -> AnalyticsReport {
        AnalyticsReport::build(&self.requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use paydesk_client::MockBackend;

    fn request(id: i64, amount: f64, status: RequestStatus, created_at: &str, department: Option<&str>) -> PaymentRequest {
        let mut r = MockBackend::new().requests().remove(2);
        r.id = id;
        r.total_amount = amount;
        r.status = status;
        r.created_at = created_at.to_string();
        r.department = department.map(str::to_string);
        r
    }

    #[test]
    fn test_summary_and_departments() {
        let requests = vec![
            request(1, 100.0, RequestStatus::Pending, "2024-01-10", Some("IT")),
            request(2, 250.5, RequestStatus::Approved, "2024-01-11", None),
            request(3, 0.1, RequestStatus::Approved, "2024-02-01", Some("IT")),
            request(4, 0.2, RequestStatus::Rejected, "2024-02-02", Some("")),
        ];
        let report = AnalyticsReport::build(&requests);

        assert_eq!(report.summary.counts.total, 4);
        assert_eq!(report.summary.counts.approved, 2);
        assert_eq!(report.summary.total_amount, 350.8);

        let names: Vec<_> = report.departments.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["IT", "Unassigned"]);
        assert_eq!(report.departments[0].counts.total, 2);
        assert_eq!(report.departments[1].counts.rejected, 1);
    }

    #[test]
    fn test_top_requests_limited_and_ordered() {
        let requests: Vec<_> = (1..=7)
            .map(|i| request(i, i as f64 * 10.0, RequestStatus::Pending, "2024-01-01", None))
            .collect();
        let report = AnalyticsReport::build(&requests);
        let ids: Vec<_> = report.top_requests.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_monthly_trend_keeps_last_six_ascending() {
        let requests: Vec<_> = (1..=8)
            .map(|m| request(m, 1.0, RequestStatus::Approved, &format!("2024-{m:02}-15"), None))
            .collect();
        let report = AnalyticsReport::build(&requests);
        let months: Vec<_> = report.monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08"]);
    }

    #[test]
    fn test_month_uses_time_zone_for_timestamps() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        let at = "2024-01-31T20:00:00Z";
        assert_eq!(month_key(at, &tokyo).as_deref(), Some("2024-02"));
        assert_eq!(month_key(at, &new_york).as_deref(), Some("2024-01"));
        assert_eq!(month_key("2024-03-01", &tokyo).as_deref(), Some("2024-03"));
        assert_eq!(month_key("yesterday", &tokyo), None);
    }

    #[test]
    fn test_status_distribution_percentages() {
        let requests = vec![
            request(1, 1.0, RequestStatus::Approved, "2024-01-01", None),
            request(2, 1.0, RequestStatus::Pending, "2024-01-01", None),
            request(3, 1.0, RequestStatus::Pending, "2024-01-01", None),
        ];
        let report = AnalyticsReport::build(&requests);
        let shares: Vec<_> = report
            .status_distribution
            .iter()
            .map(|s| (s.status, s.count, s.percent))
            .collect();
        assert_eq!(
            shares,
            vec![
                (RequestStatus::Approved, 1, 33.3),
                (RequestStatus::Pending, 2, 66.7),
                (RequestStatus::Rejected, 0, 0.0),
            ]
        );
    }

    #[test]
    fn test_huge_amounts_do_not_overflow_summary() {
        let requests: Vec<_> = (1..=3)
            .map(|i| request(i, 7.0e28, RequestStatus::Approved, "2024-01-01", None))
            .collect();
        let report = AnalyticsReport::build(&requests);
        assert_eq!(report.summary.counts.total, 3);
        assert!(report.summary.total_amount >= 7.0e28);
    }

    #[test]
    fn test_template_usage_and_empty_input() {
        let fixtures = MockBackend::new().requests();
        let report = AnalyticsReport::build(&fixtures);
        assert_eq!(report.template_usage.len(), 3);
        assert_eq!(report.template_usage[0].label, "Link Building & Content");

        let empty = AnalyticsReport::build(&[]);
        assert_eq!(empty.summary.counts.total, 0);
        assert!(empty.status_distribution.iter().all(|s| s.percent == 0.0));
        assert!(empty.monthly.is_empty());
    }
}
