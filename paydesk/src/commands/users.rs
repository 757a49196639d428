//! `users list|set-role`

use shared::AppResult;
use shared::models::Role;

use super::department::notice_result;
use super::output;
use crate::core::{AppContext, Route};
use crate::views::{AdminUsersView, DataTable};

pub async fn list(ctx: &AppContext) -> AppResult<String> {
    ctx.enter(&Route::AdminUsers)?;
    let view = AdminUsersView::load(&ctx.client).await?;
    let table = DataTable::new(view.users().to_vec());

    // Role changes address users by id
    let mut headers = vec!["ID"];
    headers.extend(table.headers());
    let rows: Vec<Vec<String>> = table
        .visible()
        .iter()
        .zip(table.render())
        .map(|(user, cells)| std::iter::once(user.id.to_string()).chain(cells).collect())
        .collect();
    Ok(output::blocks([
        output::table(&headers, &rows),
        output::origin_banner(view.origin()).unwrap_or_default().to_string(),
    ]))
}

pub async fn set_role(ctx: &AppContext, id: i64, role: Role) -> AppResult<String> {
    ctx.enter(&Route::AdminUsers)?;
    let mut view = AdminUsersView::load(&ctx.client).await?;
    let notice = view.change_role(&ctx.client, id, role).await;
    notice_result(notice)
}
