//! Application context shared by the views and CLI commands

use std::sync::Arc;

use paydesk_client::{ClientResult, OfflineClient, SessionStore};
use shared::models::{Role, User};
use shared::{AppError, AppResult, ErrorCode};

use super::config::AppConfig;
use super::guard::{self, AuthState, GuardDecision, Route};

pub struct AppContext {
    pub config: AppConfig,
    pub session: Arc<SessionStore>,
    pub client: OfflineClient,
}

impl AppContext {
    /// Session persisted under the configured data directory
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let session = Arc::new(SessionStore::file(config.session_dir()));
        Self::with_session(config, session)
    }

    pub fn with_session(config: AppConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        let client = OfflineClient::connect(&config.client_config(), session.clone())?;
        Ok(Self {
            config,
            session,
            client,
        })
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState::evaluate(&self.session)
    }

    /// Run the route guard; on success returns the signed-in profile
    pub fn enter(&self, route: &Route) -> AppResult<Option<User>> {
        match guard::guard(route, &self.session) {
            GuardDecision::Allow => Ok(self.session.user()),
            GuardDecision::RedirectToLogin => Err(AppError::not_authenticated()
                .with_detail("redirect", Route::Login.path())),
            GuardDecision::Forbidden => {
                let code = match route.allowed_roles() {
                    Some([Role::Admin]) => ErrorCode::AdminRequired,
                    _ => ErrorCode::RoleRequired,
                };
                Err(AppError::with_message(
                    code,
                    format!("{} is not available for your role", route),
                )
                .with_detail("redirect", Route::Dashboard.path()))
            }
            GuardDecision::NotFound => Err(AppError::not_found(format!("Page {}", route))),
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> AppContext {
        let config = AppConfig {
            api_base_url: "http://127.0.0.1:1/api".into(),
            data_dir: std::env::temp_dir(),
            log_level: "info".into(),
            log_dir: None,
            fallback: true,
            timeout_secs: 5,
        };
        AppContext::with_session(config, Arc::new(SessionStore::in_memory())).unwrap()
    }

    #[test]
    fn test_enter_requires_session() {
        let ctx = context();
        let err = ctx.enter(&Route::Requests).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert_eq!(err.details.unwrap()["redirect"], "/login");
    }

    #[test]
    fn test_enter_checks_role() {
        let ctx = context();
        let user = User {
            id: 1,
            name: "John Doe".into(),
            email: "john@example.com".into(),
            role: Role::Employee,
            department: None,
        };
        ctx.session.set_auth("tok", &user).unwrap();

        assert_eq!(ctx.enter(&Route::Requests).unwrap(), Some(user));
        let err = ctx.enter(&Route::AdminUsers).unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert_eq!(err.details.unwrap()["redirect"], "/dashboard");
        let err = ctx.enter(&Route::Department).unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }
}
