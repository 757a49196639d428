//! `settings`: the admin settings page, read-only from the command line

use shared::AppResult;

use super::output;
use crate::core::{AppContext, Route};
use crate::views::SettingsView;

pub fn show(ctx: &AppContext) -> AppResult<String> {
    ctx.enter(&Route::AdminSettings)?;
    let settings = SettingsView::new();

    let departments: Vec<Vec<String>> = settings
        .departments
        .iter()
        .map(|d| vec![d.id.to_string(), d.name.clone()])
        .collect();
    let roles: Vec<Vec<String>> = settings
        .roles
        .iter()
        .map(|r| vec![r.name.clone(), r.permissions.join(", ")])
        .collect();
    let templates: Vec<Vec<String>> = settings
        .templates
        .iter()
        .map(|t| {
            let state = if t.enabled { "enabled" } else { "disabled" };
            vec![t.name.clone(), state.to_string()]
        })
        .collect();

    Ok(output::blocks([
        format!("Company: {}", settings.company.name),
        output::table(&["ID", "Department"], &departments),
        output::table(&["Role", "Permissions"], &roles),
        output::table(&["Template", "State"], &templates),
    ]))
}
