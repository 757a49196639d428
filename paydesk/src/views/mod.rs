//! Screens backed by the API: lists, queues, dashboards and admin pages

pub mod admin_users;
pub mod analytics;
pub mod dashboard;
pub mod department;
pub mod notice;
pub mod requests;
pub mod settings;
pub mod table;

pub use admin_users::AdminUsersView;
pub use analytics::{AnalyticsReport, AnalyticsView, StatusCounts};
pub use dashboard::DashboardView;
pub use department::{DepartmentQueue, ReviewAction};
pub use notice::{Notice, NoticeLevel};
pub use requests::{RequestDetailsView, RequestsView, load_details};
pub use settings::SettingsView;
pub use table::{CellValue, Column, DataTable, SortDirection, TableRow};
