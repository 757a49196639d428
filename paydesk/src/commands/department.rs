//! `department list|approve|reject`

use shared::{AppError, AppResult, ErrorCode};

use super::output;
use crate::core::{AppContext, Route};
use crate::views::{DepartmentQueue, Notice, ReviewAction};

async fn queue(ctx: &AppContext) -> AppResult<DepartmentQueue> {
    let user = ctx.enter(&Route::Department)?.ok_or_else(AppError::not_authenticated)?;
    let mut queue = DepartmentQueue::for_user(&user);
    queue.load(&ctx.client).await?;
    Ok(queue)
}

pub async fn list(ctx: &AppContext) -> AppResult<String> {
    let queue = queue(ctx).await?;
    let scope = queue.department().unwrap_or("all departments").to_string();
    let rows = queue.table.render();
    let body = if rows.is_empty() {
        format!("No pending requests for {scope}")
    } else {
        format!(
            "Pending review ({scope})\n\n{}",
            output::table(&queue.table.headers(), &rows)
        )
    };
    Ok(output::blocks([
        body,
        output::origin_banner(queue.origin()).unwrap_or_default().to_string(),
    ]))
}

/// Error notices become errors so the process exits non-zero
pub(crate) fn notice_result(notice: Notice) -> AppResult<String> {
    if notice.is_error() {
        let code = notice.code.unwrap_or(ErrorCode::InvalidRequest);
        return Err(AppError::with_message(code, notice.to_string()));
    }
    Ok(notice.to_string())
}

pub async fn review(
    ctx: &AppContext,
    id: i64,
    action: ReviewAction,
    comment: &str,
) -> AppResult<String> {
    let mut queue = queue(ctx).await?;
    let notice = queue.review(&ctx.client, id, action, comment).await;
    notice_result(notice)
}
