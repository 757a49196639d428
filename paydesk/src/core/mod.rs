//! Core module for PayDesk
//!
//! - AppConfig: environment configuration
//! - AppContext: session + API client shared by every screen
//! - Route guard and role-filtered navigation

pub mod config;
pub mod context;
pub mod guard;
pub mod navigation;

pub use config::AppConfig;
pub use context::AppContext;
pub use guard::{AuthState, GuardDecision, Route};
pub use navigation::{NavItem, visible_items};
