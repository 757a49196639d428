//! Role-filtered navigation

use shared::models::Role;

use super::guard::Route;

/// Every role
pub const ALL_ROLES: &[Role] = &Role::ALL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
    pub roles: &'static [Role],
}

pub fn nav_items() -> Vec<NavItem> {
    vec![
        NavItem {
            label: "Dashboard",
            route: Route::Dashboard,
            roles: ALL_ROLES,
        },
        NavItem {
            label: "Requests",
            route: Route::Requests,
            roles: ALL_ROLES,
        },
        NavItem {
            label: "Department",
            route: Route::Department,
            roles: &[Role::FinanceManager, Role::Manager],
        },
        NavItem {
            label: "Analytics",
            route: Route::Analytics,
            roles: &[Role::FinanceManager, Role::Manager, Role::Admin],
        },
        NavItem {
            label: "Users",
            route: Route::AdminUsers,
            roles: &[Role::Admin],
        },
        NavItem {
            label: "Settings",
            route: Route::AdminSettings,
            roles: &[Role::Admin],
        },
    ]
}

/// Items visible to `role`, in menu order
pub fn visible_items(role: Role) -> Vec<NavItem> {
    nav_items()
        .into_iter()
        .filter(|item| item.roles.contains(&role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(role: Role) -> Vec<&'static str> {
        visible_items(role).iter().map(|i| i.label).collect()
    }

    #[test]
    fn test_visible_items_per_role() {
        assert_eq!(labels(Role::Employee), ["Dashboard", "Requests"]);
        assert_eq!(
            labels(Role::FinanceManager),
            ["Dashboard", "Requests", "Department", "Analytics"]
        );
        assert_eq!(
            labels(Role::Manager),
            ["Dashboard", "Requests", "Department", "Analytics"]
        );
        assert_eq!(
            labels(Role::Admin),
            ["Dashboard", "Requests", "Analytics", "Users", "Settings"]
        );
    }
}
