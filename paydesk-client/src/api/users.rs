//! User management endpoints

use shared::models::{Role, RoleChange, RoleChanged, User};

use crate::ClientResult;
use crate::http::HttpClient;

pub struct UsersApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> UsersApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `GET /users`
    pub async fn list(&self) -> ClientResult<Vec<User>> {
        self.http.get("users").await
    }

    /// `PUT /users/{id}/role`
    pub async fn update_role(&self, user_id: i64, role: Role) -> ClientResult<RoleChanged> {
        self.http
            .put(&format!("users/{}/role", user_id), &RoleChange { role })
            .await
    }
}
