//! User administration (admin only)
//!
//! Only role changes reach the backend; add, edit and archive act on the
//! loaded list.

use paydesk_client::{ClientResult, HttpClient, OfflineClient, Origin};
use shared::ErrorCode;
use shared::models::{Role, User, UserCreate, UserUpdate};

use crate::form::validation::{MAX_NAME_LEN, ValidationErrors};

use super::notice::Notice;
use super::table::{CellValue, Column, TableRow};

const USER_COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::sortable("email", "Email"),
    Column::sortable("department", "Department"),
    Column::sortable("role", "Role"),
];

impl TableRow for User {
    fn columns() -> &'static [Column] {
        USER_COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "name" => CellValue::text(&self.name),
            "email" => CellValue::text(&self.email),
            "department" => self
                .department
                .as_deref()
                .map_or(CellValue::Empty, CellValue::text),
            "role" => CellValue::text(self.role.label()),
            _ => CellValue::Empty,
        }
    }
}

fn check_identity(name: &str, email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require_text("name", "Name", name, MAX_NAME_LEN);
    errors.require_email("email", email);
    errors.into_result()
}

fn validation_notice(errors: &ValidationErrors) -> Notice {
    Notice::error("Validation error", errors.messages().join("; "))
}

fn user_not_found(title: &str, id: i64) -> Notice {
    Notice::error(title, format!("User #{id} not found")).with_code(ErrorCode::UserNotFound)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Default)]
pub struct AdminUsersView {
    users: Vec<User>,
    submitting: bool,
    origin: Option<Origin>,
}

impl AdminUsersView {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub async fn load<C: HttpClient>(client: &OfflineClient<C>) -> ClientResult<Self> {
        let served = client.list_users().await?;
        Ok(Self {
            users: served.value,
            submitting: false,
            origin: Some(served.origin),
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email.trim()))
    }

    pub fn add(&mut self, draft: &UserCreate) -> Notice {
        if let Err(errors) = check_identity(&draft.name, &draft.email) {
            return validation_notice(&errors);
        }
        if self.email_taken(&draft.email, None) {
            return Notice::error("Failed to add user", "Email is already in use")
                .with_code(ErrorCode::EmailAlreadyExists);
        }
        let id = self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            role: draft.role.unwrap_or(Role::Employee),
            department: non_blank(draft.department.as_deref()),
        };
        tracing::info!(user_id = id, role = %user.role, "User added");
        let notice = Notice::success("User added", format!("{} has been added successfully", user.name));
        self.users.push(user);
        notice
    }

    pub fn edit(&mut self, id: i64, changes: &UserUpdate) -> Notice {
        let Some(current) = self.user(id) else {
            return user_not_found("Failed to update user", id);
        };
        let name = changes.name.as_deref().unwrap_or(&current.name).to_string();
        let email = changes.email.as_deref().unwrap_or(&current.email).to_string();
        if let Err(errors) = check_identity(&name, &email) {
            return validation_notice(&errors);
        }
        if self.email_taken(&email, Some(id)) {
            return Notice::error("Failed to update user", "Email is already in use")
                .with_code(ErrorCode::EmailAlreadyExists);
        }

        let Some(user) = self.users.iter_mut().find(|u| u.id == id) else {
            return user_not_found("Failed to update user", id);
        };
        user.name = name.trim().to_string();
        user.email = email.trim().to_string();
        if let Some(department) = &changes.department {
            user.department = non_blank(Some(department));
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        tracing::info!(user_id = id, "User updated");
        Notice::success("User updated", format!("{}'s information has been updated", user.name))
    }

    /// Persist through the API, then apply locally
    pub async fn change_role<C: HttpClient>(
        &mut self,
        client: &OfflineClient<C>,
        id: i64,
        role: Role,
    ) -> Notice {
        let Some(name) = self.user(id).map(|u| u.name.clone()) else {
            return user_not_found("Update failed", id);
        };

        self.submitting = true;
        let result = client.update_role(id, role).await;
        self.submitting = false;

        match result {
            Ok(served) => {
                if let Some(user) = self.users.iter_mut().find(|u| u.id == id) {
                    user.role = served.value.role;
                }
                tracing::info!(user_id = id, role = %served.value.role, origin = ?served.origin, "Role updated");
                Notice::success(
                    "Role updated",
                    format!("{}'s role has been updated to {}", name, served.value.role.label()),
                )
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = id, "Role update failed");
                Notice::error("Update failed", "Please try again")
            }
        }
    }

    pub fn archive(&mut self, id: i64) -> Notice {
        let Some(index) = self.users.iter().position(|u| u.id == id) else {
            return user_not_found("Failed to archive user", id);
        };
        let user = self.users.remove(index);
        tracing::info!(user_id = id, "User archived");
        Notice::success("User archived", format!("{} has been archived", user.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::notice::NoticeLevel;
    use paydesk_client::MockBackend;

    fn view() -> AdminUsersView {
        AdminUsersView::new(MockBackend::new().users())
    }

    #[test]
    fn test_add_requires_name_and_valid_email() {
        let mut v = view();
        let notice = v.add(&UserCreate {
            name: " ".into(),
            email: "not-an-email".into(),
            ..UserCreate::default()
        });
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Validation error");
        assert!(notice.description.contains("Name is required"));
        assert!(notice.description.contains("Email must be a valid address"));
        assert_eq!(v.users().len(), 3);
    }

    #[test]
    fn test_add_assigns_next_id_and_default_role() {
        let mut v = view();
        let notice = v.add(&UserCreate {
            name: "Sam Lee".into(),
            email: "sam@example.com".into(),
            department: Some("IT".into()),
            role: None,
        });
        assert_eq!(notice.level, NoticeLevel::Success);
        let sam = v.user(4).unwrap();
        assert_eq!(sam.role, Role::Employee);
        assert_eq!(sam.department.as_deref(), Some("IT"));

        let dup = v.add(&UserCreate {
            name: "Other Sam".into(),
            email: "SAM@example.com".into(),
            ..UserCreate::default()
        });
        assert!(dup.is_error());
        assert_eq!(dup.code, Some(ErrorCode::EmailAlreadyExists));

        let taken = v.edit(
            1,
            &UserUpdate {
                email: Some("sam@example.com".into()),
                ..UserUpdate::default()
            },
        );
        assert_eq!(taken.code, Some(ErrorCode::EmailAlreadyExists));
    }

    #[test]
    fn test_edit_and_archive() {
        let mut v = view();
        let notice = v.edit(
            1,
            &UserUpdate {
                name: Some("John Q. Doe".into()),
                department: Some(String::new()),
                ..UserUpdate::default()
            },
        );
        assert_eq!(notice.description, "John Q. Doe's information has been updated");
        assert!(v.user(1).unwrap().department.is_none());
        assert_eq!(v.user(1).unwrap().email, "john@example.com");

        assert!(v.edit(1, &UserUpdate { email: Some(String::new()), ..UserUpdate::default() }).is_error());
        assert_eq!(v.edit(99, &UserUpdate::default()).code, Some(ErrorCode::UserNotFound));

        assert_eq!(v.archive(2).title, "User archived");
        assert!(v.user(2).is_none());
        assert_eq!(v.archive(2).code, Some(ErrorCode::UserNotFound));
    }
}
