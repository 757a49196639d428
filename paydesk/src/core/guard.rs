//! Route guard
//!
//! Protected routes require a stored token. Role-gated routes additionally
//! require the stored profile's role to be in the route's role list.

use std::fmt;
use std::str::FromStr;

use paydesk_client::SessionStore;
use shared::models::{Role, User};

use super::navigation::nav_items;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Dashboard,
    Requests,
    CreateRequest,
    RequestDetails(i64),
    Department,
    Analytics,
    AdminUsers,
    AdminSettings,
    NotFound(String),
}

impl Route {
    /// Parse a path; unknown paths become [`Route::NotFound`]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match normalized {
            "/" => Route::Landing,
            "/login" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/requests" => Route::Requests,
            "/requests/create" => Route::CreateRequest,
            "/department" => Route::Department,
            "/analytics" => Route::Analytics,
            "/admin/users" => Route::AdminUsers,
            "/admin/settings" => Route::AdminSettings,
            other => other
                .strip_prefix("/requests/")
                .and_then(|id| id.parse().ok())
                .map(Route::RequestDetails)
                .unwrap_or_else(|| Route::NotFound(trimmed.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Login => "/login".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::Requests => "/requests".into(),
            Route::CreateRequest => "/requests/create".into(),
            Route::RequestDetails(id) => format!("/requests/{}", id),
            Route::Department => "/department".into(),
            Route::Analytics => "/analytics".into(),
            Route::AdminUsers => "/admin/users".into(),
            Route::AdminSettings => "/admin/settings".into(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Public routes render without a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Landing | Route::Login | Route::NotFound(_))
    }

    /// Roles allowed on a gated route; `None` means any signed-in user
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Department | Route::Analytics | Route::AdminUsers | Route::AdminSettings => {
                nav_items()
                    .into_iter()
                    .find(|item| &item.route == self)
                    .map(|item| item.roles)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Route::parse(s))
    }
}

/// Session state as seen by the guard
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// A token is stored; the profile may be missing or unreadable
    Authenticated { token: String, user: Option<User> },
    Unauthenticated,
}

impl AuthState {
    /// Read the current state from the session store
    pub fn evaluate(session: &SessionStore) -> Self {
        let auth = session.get_auth();
        match auth.token {
            Some(token) => AuthState::Authenticated {
                token,
                user: auth.user,
            },
            None => AuthState::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated { user, .. } => user.as_ref(),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// No session: go to `/login`
    RedirectToLogin,
    /// Signed in without the required role: go to `/dashboard`
    Forbidden,
    NotFound,
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Where the user is sent instead, if anywhere
    pub fn redirect(&self) -> Option<Route> {
        match self {
            GuardDecision::RedirectToLogin => Some(Route::Login),
            GuardDecision::Forbidden => Some(Route::Dashboard),
            GuardDecision::Allow | GuardDecision::NotFound => None,
        }
    }
}

/// Decide whether `route` may be shown in `state`
pub fn check(route: &Route, state: &AuthState) -> GuardDecision {
    if let Route::NotFound(_) = route {
        return GuardDecision::NotFound;
    }
    if !route.is_protected() {
        return GuardDecision::Allow;
    }
    if !state.is_authenticated() {
        return GuardDecision::RedirectToLogin;
    }
    match route.allowed_roles() {
        None => GuardDecision::Allow,
        Some(roles) if state.role().is_some_and(|r| roles.contains(&r)) => GuardDecision::Allow,
        Some(_) => GuardDecision::Forbidden,
    }
}

/// Evaluate the session now and check `route`
pub fn guard(route: &Route, session: &SessionStore) -> GuardDecision {
    let decision = check(route, &AuthState::evaluate(session));
    if !decision.is_allowed() {
        tracing::debug!(route = %route, decision = ?decision, "Route guarded");
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in(role: Role) -> AuthState {
        AuthState::Authenticated {
            token: "tok".into(),
            user: Some(User {
                id: 1,
                name: "Test".into(),
                email: "test@example.com".into(),
                role,
                department: None,
            }),
        }
    }

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::Landing);
        assert_eq!(Route::parse("/requests/"), Route::Requests);
        assert_eq!(Route::parse("/requests/create"), Route::CreateRequest);
        assert_eq!(Route::parse("/requests/42"), Route::RequestDetails(42));
        assert_eq!(Route::parse("/requests/abc"), Route::NotFound("/requests/abc".into()));
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".into()));
        assert_eq!(Route::RequestDetails(7).path(), "/requests/7");
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let state = AuthState::Unauthenticated;
        let decision = check(&Route::Dashboard, &state);
        assert_eq!(decision, GuardDecision::RedirectToLogin);
        assert_eq!(decision.redirect(), Some(Route::Login));
        assert!(check(&Route::Landing, &state).is_allowed());
        assert!(check(&Route::Login, &state).is_allowed());
    }

    #[test]
    fn test_role_gates() {
        let employee = signed_in(Role::Employee);
        assert!(check(&Route::Requests, &employee).is_allowed());
        assert!(check(&Route::RequestDetails(3), &employee).is_allowed());

        let decision = check(&Route::AdminUsers, &employee);
        assert_eq!(decision, GuardDecision::Forbidden);
        assert_eq!(decision.redirect(), Some(Route::Dashboard));

        assert!(check(&Route::Department, &signed_in(Role::Manager)).is_allowed());
        assert!(check(&Route::AdminSettings, &signed_in(Role::Admin)).is_allowed());
        assert_eq!(
            check(&Route::Department, &signed_in(Role::Admin)),
            GuardDecision::Forbidden
        );
    }

    #[test]
    fn test_token_without_profile() {
        let state = AuthState::Authenticated {
            token: "tok".into(),
            user: None,
        };
        assert!(check(&Route::Dashboard, &state).is_allowed());
        assert_eq!(check(&Route::Analytics, &state), GuardDecision::Forbidden);
    }

    #[test]
    fn test_guard_follows_session_clear() {
        let session = SessionStore::in_memory();
        session
            .set_auth(
                "tok",
                &User {
                    id: 1,
                    name: "John Doe".into(),
                    email: "john@example.com".into(),
                    role: Role::Employee,
                    department: None,
                },
            )
            .unwrap();
        assert!(guard(&Route::Dashboard, &session).is_allowed());

        session.clear().unwrap();
        assert_eq!(guard(&Route::Dashboard, &session), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn test_not_found() {
        assert_eq!(
            check(&Route::parse("/missing"), &signed_in(Role::Admin)),
            GuardDecision::NotFound
        );
    }
}
