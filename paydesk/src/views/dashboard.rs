//! Dashboard: status counts and the latest requests

use std::cmp::Ordering;

use paydesk_client::{ClientResult, HttpClient, OfflineClient, Origin};
use shared::models::{PaymentRequest, RequestFilter, User};

use super::analytics::StatusCounts;
use super::table::parse_timestamp;

/// How many requests the "Recent Requests" card lists
pub const RECENT_REQUESTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub counts: StatusCounts,
    pub recent: Vec<PaymentRequest>,
    pub origin: Origin,
}

impl DashboardView {
    /// Newest first by `createdAt`; unparsable dates go last
    pub fn from_requests(requests: Vec<PaymentRequest>, origin: Origin) -> Self {
        let counts = StatusCounts::from_requests(&requests);
        let mut recent = requests;
        recent.sort_by(|a, b| {
            match (parse_timestamp(&a.created_at), parse_timestamp(&b.created_at)) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
        recent.truncate(RECENT_REQUESTS);
        Self {
            counts,
            recent,
            origin,
        }
    }

    pub async fn load<C: HttpClient>(client: &OfflineClient<C>) -> ClientResult<Self> {
        let served = client.list_requests(&RequestFilter::default()).await?;
        Ok(Self::from_requests(served.value.data, served.origin))
    }

    /// Greeting line shown above the cards
    pub fn greeting(user: Option<&User>) -> String {
        match user {
            Some(user) => format!("Welcome back, {}", user.name),
            None => "Welcome back".to_string(),
        }
    }
}
