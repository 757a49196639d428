//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    FinanceManager,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Employee,
        Role::FinanceManager,
        Role::Manager,
        Role::Admin,
    ];

    /// Wire name (`finance_manager`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::FinanceManager => "finance_manager",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Display name (`Finance Manager`)
    pub fn label(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::FinanceManager => "Finance Manager",
            Role::Manager => "Manager",
            Role::Admin => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

/// User profile (session user and admin-managed directory entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Create user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub role: Option<Role>,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<Role>,
}

/// Role change body for `PUT /users/{id}/role`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

/// Role change acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChanged {
    pub user_id: i64,
    pub role: Role,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::FinanceManager).unwrap(),
            "\"finance_manager\""
        );
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_without_department() {
        let json = r#"{"id":3,"name":"Admin User","email":"admin@example.com","role":"admin"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(user.department.is_none());
        assert!(!serde_json::to_string(&user).unwrap().contains("department"));
    }

    #[test]
    fn test_role_changed_camel_case() {
        let changed = RoleChanged {
            user_id: 7,
            role: Role::Admin,
            updated_at: "2024-02-01T00:00:00Z".into(),
        };
        let json = serde_json::to_value(&changed).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["role"], "admin");
        assert!(json.get("updatedAt").is_some());
    }
}
