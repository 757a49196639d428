//! `requests list|show|create|pdf`

use std::path::Path;

use paydesk_client::ClientError;
use shared::models::{RequestFilter, RequestStatus, TemplateType};
use shared::{AppError, AppResult, ErrorCode};

use super::output;
use crate::core::{AppContext, Route};
use crate::export::{RequestDocument, write_request_pdf};
use crate::form::{RequestForm, TemplateForm};
use crate::views::{RequestsView, SortDirection, load_details};

/// List options, mirroring the table controls
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub status: Option<RequestStatus>,
    pub template: Option<TemplateType>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub descending: bool,
}

pub async fn list(ctx: &AppContext, options: &ListOptions) -> AppResult<String> {
    ctx.enter(&Route::Requests)?;
    let filter = RequestFilter {
        status: options.status,
        template: options.template,
        ..RequestFilter::default()
    };

    let mut view = RequestsView::new();
    view.load(&ctx.client, &filter).await?;
    if let Some(query) = &options.search {
        view.table.set_search(query.as_str());
    }
    if let Some(key) = &options.sort {
        let direction = if options.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        view.table.sort_by(key, direction)?;
    }

    let rows = view.table.render();
    let body = if rows.is_empty() {
        "No payment requests found".to_string()
    } else {
        output::table(&view.table.headers(), &rows)
    };
    Ok(output::blocks([
        body,
        output::origin_banner(view.origin).unwrap_or_default().to_string(),
    ]))
}

pub async fn show(ctx: &AppContext, id: i64) -> AppResult<String> {
    ctx.enter(&Route::RequestDetails(id))?;
    let details = load_details(&ctx.client, id)
        .await
        .map_err(|e| request_error(id, e))?;

    let mut header = vec![
        format!("{} #{}", details.title, details.id),
        format!("Status: {}", details.status.label()),
        format!("Created: {}", details.created),
    ];
    if let Some(updated) = &details.updated {
        header.push(format!("Updated: {updated}"));
    }
    let fields = details
        .fields
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n");
    let lines: Vec<Vec<String>> = details
        .lines
        .iter()
        .map(|l| vec![l.reference.clone(), l.description.clone(), l.amount.clone()])
        .collect();

    let mut notes = Vec::new();
    if !details.note.trim().is_empty() {
        notes.push(format!("Note: {}", details.note));
    }
    if let Some(manager_note) = &details.manager_note {
        notes.push(format!("Manager note: {manager_note}"));
    }

    Ok(output::blocks([
        header.join("\n"),
        fields,
        output::table(&["Item", "Description", "Amount"], &lines),
        format!("Total: {}", details.total),
        notes.join("\n"),
    ]))
}

fn read_draft(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileUnreadable,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })
}

fn request_error(id: i64, err: ClientError) -> AppError {
    match err {
        ClientError::NotFound(_) => AppError::with_message(
            ErrorCode::RequestNotFound,
            format!("Payment request #{id} not found"),
        )
        .with_detail("id", id),
        other => other.into(),
    }
}

fn invalid_draft(err: serde_json::Error) -> AppError {
    AppError::with_message(ErrorCode::InvalidFormat, format!("Draft is not valid: {err}"))
}

/// Submit a JSON draft (`{"type": "tools", ...}`).
///
/// `attach` replaces the draft's `file`; a relative `file` in the draft is
/// resolved against the draft's directory.
pub async fn create(ctx: &AppContext, draft: &Path, attach: Option<&Path>) -> AppResult<String> {
    ctx.enter(&Route::CreateRequest)?;
    let mut form = RequestForm::from_draft(&read_draft(draft)?).map_err(invalid_draft)?;
    let attachment = match attach {
        Some(path) => Some(path.to_path_buf()),
        None => form.attachment().map(|file| match draft.parent() {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }),
    };
    form.attach(attachment);

    let outcome = form.submit(&ctx.client).await?;
    let attached = outcome
        .request
        .attachment
        .as_ref()
        .map(|file| format!("Attached {} ({})", file.filename, file.url))
        .unwrap_or_default();
    Ok(output::blocks([
        format!(
            "Payment request #{} submitted ({}, total {})",
            outcome.request.id,
            outcome.request.status.label(),
            shared::money::format_money(outcome.request.total_amount, &outcome.request.currency)
        ),
        attached,
        output::origin_banner(Some(outcome.origin)).unwrap_or_default().to_string(),
        format!("Next: {}", outcome.next_route.path()),
    ]))
}

/// What to render
#[derive(Debug, Clone)]
pub enum PdfSource<'a> {
    Stored(i64),
    Draft(&'a Path),
}

pub async fn pdf(ctx: &AppContext, source: PdfSource<'_>, out_dir: &Path) -> AppResult<String> {
    let document = match source {
        PdfSource::Stored(id) => {
            ctx.enter(&Route::RequestDetails(id))?;
            let served = ctx
                .client
                .get_request(id)
                .await
                .map_err(|e| request_error(id, e))?;
            RequestDocument::from_request(&served.value)
        }
        PdfSource::Draft(path) => {
            ctx.enter(&Route::CreateRequest)?;
            let form = TemplateForm::from_json(&read_draft(path)?).map_err(invalid_draft)?;
            RequestDocument::from_form(&form)
        }
    };
    let path = write_request_pdf(&document, out_dir)?;
    Ok(format!("Saved {}", path.display()))
}
