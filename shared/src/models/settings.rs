//! System settings records
//!
//! Held in view state only; the backend has no endpoints for them.

use serde::{Deserialize, Serialize};

use super::{Role, TemplateType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// Role with its permission tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub id: Role,
    pub name: String,
    pub permissions: Vec<String>,
}

/// Template enable switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSetting {
    pub id: TemplateType,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub logo: String,
}

/// Initial settings shown on first load
pub fn default_departments() -> Vec<Department> {
    ["Marketing", "IT", "HR", "Finance"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| Department {
            id,
            name: name.to_string(),
        })
        .collect()
}

pub fn default_roles() -> Vec<RoleDefinition> {
    let define = |id: Role, permissions: &[&str]| RoleDefinition {
        id,
        name: id.label().to_string(),
        permissions: permissions.iter().map(|p| p.to_string()).collect(),
    };
    vec![
        define(
            Role::FinanceManager,
            &["approve_payments", "view_all_requests", "generate_reports"],
        ),
        define(
            Role::Manager,
            &["view_department_requests", "manage_users", "system_settings"],
        ),
    ]
}

pub fn default_templates() -> Vec<TemplateSetting> {
    TemplateType::ALL
        .into_iter()
        .map(|id| TemplateSetting {
            id,
            name: id.title().to_string(),
            enabled: true,
        })
        .collect()
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "Feature Digital".to_string(),
            logo: "/placeholder.svg".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let departments = default_departments();
        assert_eq!(departments.len(), 4);
        assert_eq!(departments[0], Department { id: 1, name: "Marketing".into() });
        assert_eq!(departments[3].id, 4);

        assert!(default_templates().iter().all(|t| t.enabled));
        assert_eq!(default_roles()[0].name, "Finance Manager");
    }

    #[test]
    fn test_template_setting_serializes_id() {
        let json = serde_json::to_value(&default_templates()[0]).unwrap();
        assert_eq!(json["id"], "link_building");
    }
}
