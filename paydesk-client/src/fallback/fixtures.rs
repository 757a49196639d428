//! Mock backend served when the live API is unavailable

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use shared::client::LoginResponse;
use shared::models::{
    LinkBuildingDetails, LinkBuildingItem, PaymentFrequency, PaymentRequest,
    PaymentRequestCreate, PaymentRequestUpdate, PaymentRequestUpdated, RequestDetails,
    RequestFilter, RequestList, RequestStatus, ReviewOutcome, Role, RoleChanged, SalaryDetails,
    SalaryItem, ToolItem, ToolsDetails, UploadedFile, User,
};

use crate::{ClientError, ClientResult};

/// The only password the mock login accepts
pub const MOCK_PASSWORD: &str = "password";

/// Ids handed to mock-created requests start here
const FIRST_MOCK_ID: i64 = 1000;

/// Fixture data plus the echo rules for write operations
#[derive(Debug)]
pub struct MockBackend {
    next_id: AtomicI64,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(FIRST_MOCK_ID),
        }
    }

    pub fn users(&self) -> Vec<User> {
        let user = |id, name: &str, email: &str, role, department: &str| User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
            department: Some(department.to_string()),
        };
        vec![
            user(1, "John Doe", "john@example.com", Role::Employee, "Marketing"),
            user(2, "Jane Smith", "jane@example.com", Role::FinanceManager, "Finance"),
            user(3, "Admin User", "admin@example.com", Role::Admin, "Management"),
        ]
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        vec![
            PaymentRequest {
                id: 1,
                status: RequestStatus::Approved,
                currency: "USD".into(),
                total_amount: 2500.0,
                created_at: "2024-01-10".into(),
                created_by: Some(1),
                note: "Q1 2024 campaign".into(),
                manager_note: Some("Approved for payment".into()),
                department: None,
                updated_at: None,
                attachment: None,
                details: RequestDetails::LinkBuilding(LinkBuildingDetails {
                    vendor_name: "LinkCorp Solutions".into(),
                    invoice_number: "INV-2024-001".into(),
                    invoice_date: "2024-01-15".into(),
                    items: vec![
                        LinkBuildingItem {
                            client_project_type: None,
                            client_project: Some("Client A".into()),
                            description: "SEO Content Creation".into(),
                            amount: 1000.0,
                        },
                        LinkBuildingItem {
                            client_project_type: None,
                            client_project: Some("Client B".into()),
                            description: "Link Building Campaign".into(),
                            amount: 1500.0,
                        },
                    ],
                }),
            },
            PaymentRequest {
                id: 2,
                status: RequestStatus::Pending,
                currency: "USD".into(),
                total_amount: 5000.0,
                created_at: "2024-01-25".into(),
                created_by: Some(1),
                note: "Regular monthly salary".into(),
                manager_note: None,
                department: None,
                updated_at: None,
                attachment: None,
                details: RequestDetails::Salary(SalaryDetails {
                    employee_name: "John Doe".into(),
                    employee_address: "123 Main St, City, State".into(),
                    position: "Senior Marketing Manager".into(),
                    invoice_number: "SAL-2024-001".into(),
                    date: "2024-01-31".into(),
                    items: vec![SalaryItem {
                        description: "January 2024 Salary".into(),
                        amount: 5000.0,
                    }],
                    payment_method: None,
                }),
            },
            PaymentRequest {
                id: 3,
                status: RequestStatus::Rejected,
                currency: "USD".into(),
                total_amount: 229.0,
                created_at: "2024-01-20".into(),
                created_by: Some(1),
                note: "Annual subscription requested".into(),
                manager_note: Some("Budget exceeded for this quarter".into()),
                department: None,
                updated_at: None,
                attachment: None,
                details: RequestDetails::Tools(ToolsDetails {
                    items: vec![ToolItem {
                        tool_name: "SEMrush Pro".into(),
                        tool_category: "SEO Analytics".into(),
                        payment_frequency: PaymentFrequency::Monthly,
                        description: "Professional SEO tool subscription".into(),
                        amount: 229.0,
                    }],
                }),
            },
        ]
    }

    /// Known email plus [`MOCK_PASSWORD`], otherwise `InvalidCredentials`
    pub fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let user = self
            .users()
            .into_iter()
            .find(|u| u.email == email)
            .filter(|_| password == MOCK_PASSWORD)
            .ok_or(ClientError::InvalidCredentials)?;
        Ok(LoginResponse {
            token: format!("mock-token-{}", Utc::now().timestamp_millis()),
            user,
        })
    }

    pub fn list(&self, filter: &RequestFilter) -> RequestList {
        let data: Vec<_> = self
            .requests()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        RequestList {
            total: data.len(),
            data,
        }
    }

    pub fn get(&self, id: i64) -> ClientResult<PaymentRequest> {
        self.requests()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("payment request {}", id)))
    }

    /// Echo the payload as a freshly created pending request
    pub fn create(&self, payload: &PaymentRequestCreate) -> PaymentRequest {
        PaymentRequest {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            status: RequestStatus::Pending,
            currency: payload.currency.clone(),
            total_amount: payload.total_amount,
            created_at: now(),
            created_by: None,
            note: payload.note.clone(),
            manager_note: None,
            department: None,
            updated_at: None,
            attachment: payload.attachment.clone(),
            details: payload.details.clone(),
        }
    }

    pub fn update(&self, id: i64, changes: &PaymentRequestUpdate) -> PaymentRequestUpdated {
        PaymentRequestUpdated {
            id,
            updated_at: now(),
            changes: changes.clone(),
        }
    }

    pub fn review(&self, id: i64, status: RequestStatus, comment: &str) -> ReviewOutcome {
        ReviewOutcome {
            id,
            status,
            manager_note: Some(comment.to_string()),
        }
    }

    pub fn upload(&self, filename: &str) -> UploadedFile {
        UploadedFile {
            url: format!("mock://uploads/{}", filename),
            filename: filename.to_string(),
        }
    }

    pub fn role_changed(&self, user_id: i64, role: Role) -> RoleChanged {
        RoleChanged {
            user_id,
            role,
            updated_at: now(),
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_totals_match_items() {
        let mock = MockBackend::new();
        for request in mock.requests() {
            assert!(request.total_matches_items(), "request {}", request.id);
        }
    }

    #[test]
    fn test_mock_login() {
        let mock = MockBackend::new();
        let resp = mock.login("jane@example.com", MOCK_PASSWORD).unwrap();
        assert!(resp.token.starts_with("mock-token-"));
        assert_eq!(resp.user.role, Role::FinanceManager);

        assert!(matches!(
            mock.login("jane@example.com", "wrong"),
            Err(ClientError::InvalidCredentials)
        ));
        assert!(matches!(
            mock.login("nobody@example.com", MOCK_PASSWORD),
            Err(ClientError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_list_applies_filter() {
        let mock = MockBackend::new();
        assert_eq!(mock.list(&RequestFilter::default()).total, 3);

        let pending = mock.list(&RequestFilter {
            status: Some(RequestStatus::Pending),
            ..Default::default()
        });
        assert_eq!(pending.total, 1);
        assert_eq!(pending.data[0].id, 2);
    }

    #[test]
    fn test_create_assigns_ids_and_pending() {
        let mock = MockBackend::new();
        let payload = PaymentRequestCreate {
            total_amount: 229.0,
            currency: "USD".into(),
            note: String::new(),
            attachment: None,
            details: mock.requests()[2].details.clone(),
        };
        let first = mock.create(&payload);
        let second = mock.create(&payload);
        assert_eq!(first.status, RequestStatus::Pending);
        assert_eq!(first.total_amount, 229.0);
        assert_ne!(first.id, second.id);
        assert!(!first.created_at.is_empty());
    }

    #[test]
    fn test_get_unknown_id() {
        assert!(matches!(
            MockBackend::new().get(99),
            Err(ClientError::NotFound(_))
        ));
    }
}
