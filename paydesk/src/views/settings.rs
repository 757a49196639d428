//! System settings (admin only, not persisted)

use shared::ErrorCode;
use shared::models::{
    CompanyInfo, Department, RoleDefinition, TemplateSetting, TemplateType, default_departments,
    default_roles, default_templates,
};

use crate::form::validation::{MAX_NAME_LEN, ValidationErrors};

use super::notice::Notice;

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    pub departments: Vec<Department>,
    pub roles: Vec<RoleDefinition>,
    pub templates: Vec<TemplateSetting>,
    pub company: CompanyInfo,
}

impl Default for SettingsView {
    fn default() -> Self {
        Self {
            departments: default_departments(),
            roles: default_roles(),
            templates: default_templates(),
            company: CompanyInfo::default(),
        }
    }
}

fn check_name(label: &str, value: &str) -> Result<(), Notice> {
    let mut errors = ValidationErrors::new();
    errors.require_text("name", label, value, MAX_NAME_LEN);
    errors
        .into_result()
        .map_err(|e| Notice::error("Validation error", e.messages().join("; ")))
}

impl SettingsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_department(&mut self, name: &str) -> Notice {
        if let Err(notice) = check_name("Department name", name) {
            return notice;
        }
        let name = name.trim();
        if self
            .departments
            .iter()
            .any(|d| d.name.eq_ignore_ascii_case(name))
        {
            return Notice::error("Validation error", format!("Department {name} already exists"))
                .with_code(ErrorCode::DepartmentNameExists);
        }
        let id = self.departments.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        self.departments.push(Department {
            id,
            name: name.to_string(),
        });
        Notice::success("Department added", format!("{name} has been added successfully"))
    }

    pub fn edit_department(&mut self, id: i64, name: &str) -> Notice {
        if let Err(notice) = check_name("Department name", name) {
            return notice;
        }
        let name = name.trim();
        match self.departments.iter_mut().find(|d| d.id == id) {
            Some(department) => {
                department.name = name.to_string();
                Notice::success(
                    "Department updated",
                    format!("Department has been updated to {name}"),
                )
            }
            None => Notice::error("Update failed", format!("Department #{id} not found"))
                .with_code(ErrorCode::DepartmentNotFound),
        }
    }

    pub fn delete_department(&mut self, id: i64) -> Notice {
        let before = self.departments.len();
        self.departments.retain(|d| d.id != id);
        if self.departments.len() == before {
            return Notice::error("Delete failed", format!("Department #{id} not found"))
                .with_code(ErrorCode::DepartmentNotFound);
        }
        Notice::success("Department deleted", "Department has been removed")
    }

    pub fn set_template_enabled(&mut self, template: TemplateType, enabled: bool) -> Notice {
        let Some(setting) = self.templates.iter_mut().find(|t| t.id == template) else {
            return Notice::error("Update failed", format!("Unknown template {template}"));
        };
        setting.enabled = enabled;
        let (title, state) = if enabled {
            ("Template enabled", "enabled")
        } else {
            ("Template disabled", "disabled")
        };
        Notice::success(title, format!("{} template has been {state}", setting.name))
    }

    pub fn enabled_templates(&self) -> Vec<TemplateType> {
        self.templates
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.id)
            .collect()
    }

    pub fn update_company(&mut self, info: CompanyInfo) -> Notice {
        if let Err(notice) = check_name("Company name", &info.name) {
            return notice;
        }
        self.company = CompanyInfo {
            name: info.name.trim().to_string(),
            logo: info.logo.trim().to_string(),
        };
        Notice::success("Company info updated", "Company information has been saved")
    }
}
