//! Payment Request Model
//!
//! A request is a set of common fields plus template-specific details,
//! flattened onto the same JSON object and discriminated by `type`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money;

// =============================================================================
// Enums
// =============================================================================

/// Review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown status: {s}"))
    }
}

/// Request template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    LinkBuilding,
    Salary,
    Tools,
    OtherWork,
}

impl TemplateType {
    pub const ALL: [TemplateType; 4] = [
        TemplateType::LinkBuilding,
        TemplateType::Salary,
        TemplateType::Tools,
        TemplateType::OtherWork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::LinkBuilding => "link_building",
            TemplateType::Salary => "salary",
            TemplateType::Tools => "tools",
            TemplateType::OtherWork => "other_work",
        }
    }

    /// Title shown on the template picker
    pub fn title(&self) -> &'static str {
        match self {
            TemplateType::LinkBuilding => "Link Building & Content",
            TemplateType::Salary => "Salary Payment",
            TemplateType::Tools => "Tools & Software",
            TemplateType::OtherWork => "Other Work",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TemplateType::LinkBuilding => "For SEO, content creation, and link building services",
            TemplateType::Salary => "Monthly salary and compensation requests",
            TemplateType::Tools => "Software subscriptions and tool purchases",
            TemplateType::OtherWork => "General work and service payments",
        }
    }

    /// Hyphenated form used in file names (`link-building`)
    pub fn slug(&self) -> &'static str {
        match self {
            TemplateType::LinkBuilding => "link-building",
            TemplateType::Salary => "salary",
            TemplateType::Tools => "tools",
            TemplateType::OtherWork => "other-work",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateType::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.slug() == s)
            .ok_or_else(|| format!("unknown template: {s}"))
    }
}

/// Billing cycle of a tool subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentFrequency {
    Monthly,
    Annually,
    OneTime,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 3] = [
        PaymentFrequency::Monthly,
        PaymentFrequency::Annually,
        PaymentFrequency::OneTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Annually => "annually",
            PaymentFrequency::OneTime => "one-time",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::Annually => "Annually",
            PaymentFrequency::OneTime => "One-time",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentFrequency::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown payment frequency: {s}"))
    }
}

/// What a link-building line item is billed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientProjectType {
    Client,
    Project,
    Other,
}

impl ClientProjectType {
    pub const ALL: [ClientProjectType; 3] = [
        ClientProjectType::Client,
        ClientProjectType::Project,
        ClientProjectType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientProjectType::Client => "client",
            ClientProjectType::Project => "project",
            ClientProjectType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClientProjectType::Client => "Client",
            ClientProjectType::Project => "Project",
            ClientProjectType::Other => "Other",
        }
    }
}

impl FromStr for ClientProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientProjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown reference type: {s}"))
    }
}

// =============================================================================
// Line items
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBuildingItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_project_type: Option<ClientProjectType>,
    /// Resolved client, project or custom reference
    #[serde(default, alias = "client", skip_serializing_if = "Option::is_none")]
    pub client_project: Option<String>,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryItem {
    #[serde(default)]
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolItem {
    pub tool_name: String,
    #[serde(default)]
    pub tool_category: String,
    pub payment_frequency: PaymentFrequency,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
}

// =============================================================================
// Template details
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBuildingDetails {
    pub vendor_name: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub items: Vec<LinkBuildingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryDetails {
    pub employee_name: String,
    #[serde(default)]
    pub employee_address: String,
    #[serde(default)]
    pub position: String,
    pub invoice_number: String,
    pub date: String,
    pub items: Vec<SalaryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsDetails {
    pub items: Vec<ToolItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherWorkDetails {
    pub vendor_name: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub work_category: String,
    #[serde(default)]
    pub client_project_type: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
}

/// Template-specific part of a request, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestDetails {
    LinkBuilding(LinkBuildingDetails),
    Salary(SalaryDetails),
    Tools(ToolsDetails),
    OtherWork(OtherWorkDetails),
}

impl RequestDetails {
    pub fn template(&self) -> TemplateType {
        match self {
            RequestDetails::LinkBuilding(_) => TemplateType::LinkBuilding,
            RequestDetails::Salary(_) => TemplateType::Salary,
            RequestDetails::Tools(_) => TemplateType::Tools,
            RequestDetails::OtherWork(_) => TemplateType::OtherWork,
        }
    }

    /// Amounts of every line (a single entry for `other_work`)
    pub fn line_amounts(&self) -> Vec<f64> {
        match self {
            RequestDetails::LinkBuilding(d) => d.items.iter().map(|i| i.amount).collect(),
            RequestDetails::Salary(d) => d.items.iter().map(|i| i.amount).collect(),
            RequestDetails::Tools(d) => d.items.iter().map(|i| i.amount).collect(),
            RequestDetails::OtherWork(d) => vec![d.amount],
        }
    }

    /// Sum of the line amounts, rounded to cents
    pub fn computed_total(&self) -> f64 {
        money::sum_f64(self.line_amounts())
    }

    /// Vendor, employee or (first) tool name
    pub fn counterparty(&self) -> &str {
        match self {
            RequestDetails::LinkBuilding(d) => &d.vendor_name,
            RequestDetails::Salary(d) => &d.employee_name,
            RequestDetails::Tools(d) => d.items.first().map(|i| i.tool_name.as_str()).unwrap_or(""),
            RequestDetails::OtherWork(d) => &d.vendor_name,
        }
    }

    /// Tools requests carry no invoice number
    pub fn invoice_number(&self) -> Option<&str> {
        match self {
            RequestDetails::LinkBuilding(d) => Some(&d.invoice_number),
            RequestDetails::Salary(d) => Some(&d.invoice_number),
            RequestDetails::Tools(_) => None,
            RequestDetails::OtherWork(d) => Some(&d.invoice_number),
        }
    }

    /// Invoice or payslip date (`YYYY-MM-DD`)
    pub fn document_date(&self) -> Option<&str> {
        match self {
            RequestDetails::LinkBuilding(d) => Some(&d.invoice_date),
            RequestDetails::Salary(d) => Some(&d.date),
            RequestDetails::Tools(_) => None,
            RequestDetails::OtherWork(d) => Some(&d.invoice_date),
        }
    }
}

// =============================================================================
// Request
// =============================================================================

/// Payment request entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub id: i64,
    pub status: RequestStatus,
    pub currency: String,
    pub total_amount: f64,
    pub created_at: String,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Uploaded invoice, if one was attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<UploadedFile>,
    #[serde(flatten)]
    pub details: RequestDetails,
}

impl PaymentRequest {
    pub fn template(&self) -> TemplateType {
        self.details.template()
    }

    pub fn counterparty(&self) -> &str {
        self.details.counterparty()
    }

    pub fn invoice_number(&self) -> Option<&str> {
        self.details.invoice_number()
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// `totalAmount` agrees with the line items within a cent
    pub fn total_matches_items(&self) -> bool {
        money::money_eq(self.total_amount, self.details.computed_total())
    }
}

/// Create payload (`POST /payment-requests`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestCreate {
    pub total_amount: f64,
    pub currency: String,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<UploadedFile>,
    #[serde(flatten)]
    pub details: RequestDetails,
}

/// Partial update payload (`PUT /payment-requests/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Update acknowledgement: the applied fields echoed back with a timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestUpdated {
    pub id: i64,
    pub updated_at: String,
    #[serde(flatten)]
    pub changes: PaymentRequestUpdate,
}

/// Approve/reject acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub id: i64,
    pub status: RequestStatus,
    #[serde(default)]
    pub manager_note: Option<String>,
}

/// List response (`GET /payment-requests`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestList {
    pub data: Vec<PaymentRequest>,
    pub total: usize,
}

/// Query filters for the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
}

impl RequestFilter {
    /// Apply the filter locally (used when serving fixtures)
    pub fn matches(&self, request: &PaymentRequest) -> bool {
        self.status.is_none_or(|s| s == request.status)
            && self.template.is_none_or(|t| t == request.template())
            && self
                .department
                .as_deref()
                .is_none_or(|d| request.department.as_deref() == Some(d))
            && self.created_by.is_none_or(|c| request.created_by == Some(c))
    }
}

/// Uploaded attachment reference (`POST /files/upload`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_building_json() -> &'static str {
        r#"{
            "id": 1,
            "type": "link_building",
            "status": "approved",
            "vendorName": "LinkCorp Solutions",
            "invoiceNumber": "INV-2024-001",
            "invoiceDate": "2024-01-15",
            "totalAmount": 2500,
            "currency": "USD",
            "items": [
                {"client": "Client A", "description": "SEO Content Creation", "amount": 1000},
                {"client": "Client B", "description": "Link Building Campaign", "amount": 1500}
            ],
            "note": "Q1 2024 campaign",
            "managerNote": "Approved for payment",
            "createdAt": "2024-01-10",
            "createdBy": 1
        }"#
    }

    #[test]
    fn test_deserialize_tagged_request() {
        let request: PaymentRequest = serde_json::from_str(link_building_json()).unwrap();
        assert_eq!(request.template(), TemplateType::LinkBuilding);
        assert_eq!(request.status, RequestStatus::Approved);
        assert_eq!(request.counterparty(), "LinkCorp Solutions");
        assert_eq!(request.invoice_number(), Some("INV-2024-001"));
        assert!(request.total_matches_items());

        match &request.details {
            RequestDetails::LinkBuilding(d) => {
                assert_eq!(d.items[0].client_project.as_deref(), Some("Client A"));
                assert!(d.items[0].client_project_type.is_none());
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn test_serialize_keeps_type_tag_and_camel_case() {
        let request: PaymentRequest = serde_json::from_str(link_building_json()).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "link_building");
        assert_eq!(json["vendorName"], "LinkCorp Solutions");
        assert_eq!(json["items"][1]["clientProject"], "Client B");
        assert!(json.get("department").is_none());
    }

    #[test]
    fn test_tools_total_and_counterparty() {
        let details = RequestDetails::Tools(ToolsDetails {
            items: vec![
                ToolItem {
                    tool_name: "SEMrush Pro".into(),
                    tool_category: "SEO Analytics".into(),
                    payment_frequency: PaymentFrequency::Monthly,
                    description: String::new(),
                    amount: 229.0,
                },
                ToolItem {
                    tool_name: "Ahrefs".into(),
                    tool_category: "SEO Analytics".into(),
                    payment_frequency: PaymentFrequency::OneTime,
                    description: String::new(),
                    amount: 0.1,
                },
            ],
        });
        assert_eq!(details.computed_total(), 229.1);
        assert_eq!(details.counterparty(), "SEMrush Pro");
        assert_eq!(details.invoice_number(), None);
    }

    #[test]
    fn test_payment_frequency_wire_name() {
        assert_eq!(
            serde_json::to_string(&PaymentFrequency::OneTime).unwrap(),
            "\"one-time\""
        );
        assert_eq!("annually".parse::<PaymentFrequency>(), Ok(PaymentFrequency::Annually));
    }

    #[test]
    fn test_template_parse_accepts_slug() {
        assert_eq!("other_work".parse::<TemplateType>(), Ok(TemplateType::OtherWork));
        assert_eq!("link-building".parse::<TemplateType>(), Ok(TemplateType::LinkBuilding));
        assert!("payroll".parse::<TemplateType>().is_err());
    }

    #[test]
    fn test_filter_matches() {
        let request: PaymentRequest = serde_json::from_str(link_building_json()).unwrap();
        let mut filter = RequestFilter::default();
        assert!(filter.matches(&request));

        filter.status = Some(RequestStatus::Pending);
        assert!(!filter.matches(&request));

        filter.status = Some(RequestStatus::Approved);
        filter.template = Some(TemplateType::LinkBuilding);
        assert!(filter.matches(&request));

        filter.department = Some("Finance".into());
        assert!(!filter.matches(&request));
    }

    #[test]
    fn test_create_payload_shape() {
        let payload = PaymentRequestCreate {
            total_amount: 229.0,
            currency: "USD".into(),
            note: String::new(),
            attachment: None,
            details: RequestDetails::OtherWork(OtherWorkDetails {
                vendor_name: "Acme".into(),
                invoice_number: "OW-1".into(),
                invoice_date: "2024-03-01".into(),
                work_category: "Design".into(),
                client_project_type: "Client".into(),
                description: "Logo".into(),
                amount: 229.0,
            }),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "other_work");
        assert_eq!(json["totalAmount"], 229.0);
        assert_eq!(json["workCategory"], "Design");
        assert!(json.get("attachment").is_none());

        let back: PaymentRequestCreate = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);

        let attached = PaymentRequestCreate {
            attachment: Some(UploadedFile {
                url: "https://files.example.com/inv.pdf".into(),
                filename: "inv.pdf".into(),
            }),
            ..payload
        };
        let json = serde_json::to_value(&attached).unwrap();
        assert_eq!(json["attachment"]["filename"], "inv.pdf");
        assert_eq!(json["type"], "other_work");
    }
}
