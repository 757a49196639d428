//! `dashboard` and `analytics [--csv DIR]`

use std::path::Path;

use shared::AppResult;
use shared::models::RequestStatus;

use super::output;
use crate::core::{AppContext, Route};
use crate::export::write_analytics_csv;
use crate::views::{AnalyticsView, DashboardView, DataTable, StatusCounts};

fn counts_line(counts: &StatusCounts) -> String {
    format!(
        "Total: {}  Pending: {}  Approved: {}  Rejected: {}",
        counts.total, counts.pending, counts.approved, counts.rejected
    )
}

pub async fn dashboard(ctx: &AppContext) -> AppResult<String> {
    let user = ctx.enter(&Route::Dashboard)?;
    let view = DashboardView::load(&ctx.client).await?;

    let recent = DataTable::new(view.recent.clone());
    let recent_block = if recent.is_empty() {
        "No recent requests".to_string()
    } else {
        format!(
            "Recent requests\n\n{}",
            output::table(&recent.headers(), &recent.render())
        )
    };
    Ok(output::blocks([
        DashboardView::greeting(user.as_ref()),
        counts_line(&view.counts),
        recent_block,
        output::origin_banner(Some(view.origin)).unwrap_or_default().to_string(),
    ]))
}

pub async fn analytics(ctx: &AppContext, csv_dir: Option<&Path>) -> AppResult<String> {
    ctx.enter(&Route::Analytics)?;
    let view = AnalyticsView::load(&ctx.client).await?;
    let report = view.report();

    let summary = format!(
        "{}\nTotal amount: {}",
        counts_line(&report.summary.counts),
        shared::money::format_grouped(report.summary.total_amount)
    );

    let departments: Vec<Vec<String>> = report
        .departments
        .iter()
        .map(|d| {
            vec![
                d.name.clone(),
                d.counts.total.to_string(),
                d.counts.get(RequestStatus::Pending).to_string(),
                d.counts.get(RequestStatus::Approved).to_string(),
                d.counts.get(RequestStatus::Rejected).to_string(),
            ]
        })
        .collect();

    let top = DataTable::new(report.top_requests.clone());

    let usage: Vec<Vec<String>> = report
        .template_usage
        .iter()
        .map(|u| vec![u.label.to_string(), u.count.to_string()])
        .collect();

    let monthly: Vec<Vec<String>> = report
        .monthly
        .iter()
        .map(|m| {
            vec![
                m.month.clone(),
                m.counts.total.to_string(),
                m.counts.approved.to_string(),
                m.counts.pending.to_string(),
                m.counts.rejected.to_string(),
            ]
        })
        .collect();

    let distribution: Vec<Vec<String>> = report
        .status_distribution
        .iter()
        .map(|s| vec![s.status.label().to_string(), s.count.to_string(), format!("{:.1}%", s.percent)])
        .collect();

    let exported = match csv_dir {
        Some(dir) => {
            let path = write_analytics_csv(dir, &view.requests)?;
            format!("Exported {}", path.display())
        }
        None => String::new(),
    };

    Ok(output::blocks([
        summary,
        format!(
            "By department\n\n{}",
            output::table(&["Department", "Total", "Pending", "Approved", "Rejected"], &departments)
        ),
        format!("Top requests\n\n{}", output::table(&top.headers(), &top.render())),
        format!("Template usage\n\n{}", output::table(&["Template", "Requests"], &usage)),
        format!(
            "Monthly trend\n\n{}",
            output::table(&["Month", "Total", "Approved", "Pending", "Rejected"], &monthly)
        ),
        format!(
            "Status distribution\n\n{}",
            output::table(&["Status", "Requests", "Share"], &distribution)
        ),
        exported,
        output::origin_banner(view.origin).unwrap_or_default().to_string(),
    ]))
}
