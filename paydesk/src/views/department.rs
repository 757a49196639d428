//! Department review queue (finance managers and managers)

use paydesk_client::{ClientResult, HttpClient, OfflineClient, Origin};
use shared::ErrorCode;
use shared::models::{PaymentRequest, RequestFilter, RequestStatus, User};

use super::notice::Notice;
use super::table::DataTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn status(&self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }
}

/// Pending requests of the reviewer's department (or with none set)
#[derive(Debug, Default)]
pub struct DepartmentQueue {
    pub table: DataTable<PaymentRequest>,
    department: Option<String>,
    submitting: bool,
    origin: Option<Origin>,
}

impl DepartmentQueue {
    pub fn for_user(user: &User) -> Self {
        Self {
            department: user.department.clone(),
            ..Self::default()
        }
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    fn in_scope(&self, request: &PaymentRequest) -> bool {
        request.is_pending()
            && match (&request.department, &self.department) {
                (None, _) => true,
                (Some(requested), Some(mine)) => requested.eq_ignore_ascii_case(mine),
                (Some(_), None) => false,
            }
    }

    pub async fn load<C: HttpClient>(&mut self, client: &OfflineClient<C>) -> ClientResult<()> {
        let filter = RequestFilter {
            status: Some(RequestStatus::Pending),
            ..RequestFilter::default()
        };
        let served = client.list_requests(&filter).await?;
        let rows: Vec<_> = served
            .value
            .data
            .into_iter()
            .filter(|r| self.in_scope(r))
            .collect();
        tracing::debug!(count = rows.len(), department = ?self.department, "Department queue loaded");
        self.origin = Some(served.origin);
        self.table.set_rows(rows);
        Ok(())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.table.rows().iter().any(|r| r.id == id)
    }

    /// Approve or reject with an optional comment, then reload the queue
    pub async fn review<C: HttpClient>(
        &mut self,
        client: &OfflineClient<C>,
        id: i64,
        action: ReviewAction,
        comment: &str,
    ) -> Notice {
        if self.submitting {
            return Notice::warning("Please wait", "Another review is still being submitted");
        }
        if !self.contains(id) {
            return Notice::error("Action failed", format!("Request #{id} is not awaiting review"))
                .with_code(ErrorCode::RequestNotPending);
        }

        self.submitting = true;
        let comment = comment.trim();
        let result = match action {
            ReviewAction::Approve => client.approve(id, comment).await,
            ReviewAction::Reject => client.reject(id, comment).await,
        };
        self.submitting = false;

        let notice = match result {
            Ok(served) => {
                tracing::info!(id, status = %served.value.status, origin = ?served.origin, "Request reviewed");
                match action {
                    ReviewAction::Approve => Notice::success(
                        "Request approved",
                        "Payment request has been approved successfully",
                    ),
                    ReviewAction::Reject => {
                        Notice::success("Request rejected", "Payment request has been rejected")
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, id, "Review failed");
                return Notice::error("Action failed", "Please try again");
            }
        };

        if let Err(e) = self.load(client).await {
            tracing::warn!(error = %e, "Failed to reload department queue");
        }
        notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn reviewer(department: Option<&str>) -> User {
        User {
            id: 2,
            name: "Jane Smith".into(),
            email: "jane@example.com".into(),
            role: Role::FinanceManager,
            department: department.map(str::to_string),
        }
    }

    fn request(status: RequestStatus, department: Option<&str>) -> PaymentRequest {
        let mut request = paydesk_client::MockBackend::new().requests().remove(1);
        request.status = status;
        request.department = department.map(str::to_string);
        request
    }

    #[test]
    fn test_scope_rules() {
        let queue = DepartmentQueue::for_user(&reviewer(Some("Finance")));
        assert!(queue.in_scope(&request(RequestStatus::Pending, None)));
        assert!(queue.in_scope(&request(RequestStatus::Pending, Some("finance"))));
        assert!(!queue.in_scope(&request(RequestStatus::Pending, Some("IT"))));
        assert!(!queue.in_scope(&request(RequestStatus::Approved, None)));

        let unassigned = DepartmentQueue::for_user(&reviewer(None));
        assert!(unassigned.in_scope(&request(RequestStatus::Pending, None)));
        assert!(!unassigned.in_scope(&request(RequestStatus::Pending, Some("IT"))));
    }
}
