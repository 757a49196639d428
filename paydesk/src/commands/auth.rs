//! Session commands: login, logout, whoami, nav

use shared::AppResult;

use super::output;
use crate::core::{AppContext, Route, visible_items};

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> AppResult<String> {
    let served = ctx.client.login(email.trim(), password).await?;
    let user = &served.value.user;
    tracing::info!(user_id = user.id, role = %user.role, origin = ?served.origin, "Signed in");
    Ok(output::blocks([
        format!("Signed in as {} ({})", user.name, user.role.label()),
        output::origin_banner(Some(served.origin)).unwrap_or_default().to_string(),
    ]))
}

pub async fn logout(ctx: &AppContext) -> AppResult<String> {
    let served = ctx.client.logout().await?;
    tracing::info!(origin = ?served.origin, "Signed out");
    Ok("Signed out".to_string())
}

/// Profile from the backend, or the stored one when it is down
pub async fn whoami(ctx: &AppContext) -> AppResult<String> {
    ctx.enter(&Route::Dashboard)?;
    let served = ctx.client.me().await?;
    let user = served.value;
    let mut lines = vec![
        format!("Name:       {}", user.name),
        format!("Email:      {}", user.email),
        format!("Role:       {}", user.role.label()),
    ];
    if let Some(department) = &user.department {
        lines.push(format!("Department: {department}"));
    }
    Ok(output::blocks([
        lines.join("\n"),
        output::origin_banner(Some(served.origin)).unwrap_or_default().to_string(),
    ]))
}

/// Menu entries for the signed-in role
pub fn nav(ctx: &AppContext) -> AppResult<String> {
    ctx.enter(&Route::Dashboard)?;
    let items = ctx.auth_state().role().map(visible_items).unwrap_or_default();
    if items.is_empty() {
        return Ok("No menu entries for this session".to_string());
    }
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| vec![item.label.to_string(), item.route.path()])
        .collect();
    Ok(output::table(&["Menu", "Path"], &rows))
}
