//! "My Requests" list and the request details page

use paydesk_client::{ClientResult, HttpClient, OfflineClient, Origin};
use shared::models::{PaymentRequest, RequestDetails, RequestFilter, RequestStatus};
use shared::money;

use super::table::{CellValue, Column, DataTable, TableRow, parse_timestamp};

const REQUEST_COLUMNS: &[Column] = &[
    Column::sortable("id", "ID"),
    Column::sortable("type", "Type"),
    Column::sortable("counterparty", "Vendor/Employee"),
    Column::sortable("invoiceNumber", "Invoice #"),
    Column::sortable("totalAmount", "Amount"),
    Column::sortable("status", "Status"),
    Column::sortable("createdAt", "Date"),
];

impl TableRow for PaymentRequest {
    fn columns() -> &'static [Column] {
        REQUEST_COLUMNS
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "id" => CellValue::Number(self.id as f64),
            "type" => CellValue::text(self.template().title()),
            "counterparty" => match self.counterparty() {
                "" => CellValue::text("N/A"),
                name => CellValue::text(name),
            },
            "invoiceNumber" => self
                .invoice_number()
                .filter(|n| !n.is_empty())
                .map_or(CellValue::Empty, CellValue::text),
            "totalAmount" => CellValue::Money {
                amount: self.total_amount,
                currency: self.currency.clone(),
            },
            "status" => CellValue::text(self.status.label()),
            "createdAt" => CellValue::Date(self.created_at.clone()),
            _ => CellValue::Empty,
        }
    }
}

/// Requests list state
#[derive(Debug, Default)]
pub struct RequestsView {
    pub table: DataTable<PaymentRequest>,
    pub origin: Option<Origin>,
}

impl RequestsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<C: HttpClient>(
        &mut self,
        client: &OfflineClient<C>,
        filter: &RequestFilter,
    ) -> ClientResult<()> {
        let served = client.list_requests(filter).await?;
        tracing::debug!(count = served.value.data.len(), origin = ?served.origin, "Requests loaded");
        self.origin = Some(served.origin);
        self.table.set_rows(served.value.data);
        Ok(())
    }

    pub fn find(&self, id: i64) -> Option<&PaymentRequest> {
        self.table.rows().iter().find(|r| r.id == id)
    }
}

/// One line of the details page
#[derive(Debug, Clone, PartialEq)]
pub struct DetailLine {
    /// Client/project, tool name or blank
    pub reference: String,
    pub description: String,
    pub amount: String,
}

/// Read-only projection of a request for the details page
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDetailsView {
    pub id: i64,
    pub title: String,
    pub status: RequestStatus,
    /// Labelled header fields in display order
    pub fields: Vec<(&'static str, String)>,
    pub lines: Vec<DetailLine>,
    pub total: String,
    pub note: String,
    pub manager_note: Option<String>,
    pub created: String,
    pub updated: Option<String>,
}

impl RequestDetailsView {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }
}

fn display_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|at| at.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

impl From<&PaymentRequest> for RequestDetailsView {
    fn from(request: &PaymentRequest) -> Self {
        let currency = request.currency.as_str();
        let amount = |value: f64| money::format_money(value, currency);
        let (mut fields, lines): (Vec<(&'static str, String)>, Vec<DetailLine>) = match &request.details {
            RequestDetails::LinkBuilding(d) => (
                vec![
                    ("Vendor", d.vendor_name.clone()),
                    ("Invoice Number", d.invoice_number.clone()),
                    ("Invoice Date", d.invoice_date.clone()),
                ],
                d.items
                    .iter()
                    .map(|i| DetailLine {
                        reference: i.client_project.clone().unwrap_or_default(),
                        description: i.description.clone(),
                        amount: amount(i.amount),
                    })
                    .collect(),
            ),
            RequestDetails::Salary(d) => {
                let mut fields = vec![
                    ("Employee", d.employee_name.clone()),
                    ("Address", d.employee_address.clone()),
                    ("Position", d.position.clone()),
                    ("Invoice Number", d.invoice_number.clone()),
                    ("Date", d.date.clone()),
                ];
                if let Some(method) = &d.payment_method {
                    fields.push(("Payment Method", method.clone()));
                }
                let lines = d
                    .items
                    .iter()
                    .map(|i| DetailLine {
                        reference: String::new(),
                        description: i.description.clone(),
                        amount: amount(i.amount),
                    })
                    .collect();
                (fields, lines)
            }
            RequestDetails::Tools(d) => (
                Vec::new(),
                d.items
                    .iter()
                    .map(|i| DetailLine {
                        reference: i.tool_name.clone(),
                        description: format!(
                            "{} ({}){}",
                            i.tool_category,
                            i.payment_frequency.label(),
                            if i.description.is_empty() {
                                String::new()
                            } else {
                                format!(" {}", i.description)
                            }
                        ),
                        amount: amount(i.amount),
                    })
                    .collect(),
            ),
            RequestDetails::OtherWork(d) => (
                vec![
                    ("Vendor", d.vendor_name.clone()),
                    ("Invoice Number", d.invoice_number.clone()),
                    ("Invoice Date", d.invoice_date.clone()),
                    ("Work Category", d.work_category.clone()),
                    ("Client/Project", d.client_project_type.clone()),
                ],
                vec![DetailLine {
                    reference: String::new(),
                    description: d.description.clone(),
                    amount: amount(d.amount),
                }],
            ),
        };
        fields.push(("Currency", request.currency.clone()));
        if let Some(department) = &request.department {
            fields.push(("Department", department.clone()));
        }
        if let Some(file) = &request.attachment {
            fields.push(("Attachment", file.filename.clone()));
        }

        Self {
            id: request.id,
            title: request.template().title().to_string(),
            status: request.status,
            fields,
            lines,
            total: amount(request.total_amount),
            note: request.note.clone(),
            manager_note: request.manager_note.clone(),
            created: display_date(&request.created_at),
            updated: request.updated_at.as_deref().map(display_date),
        }
    }
}

/// Fetch one request and project it
pub async fn load_details<C: HttpClient>(
    client: &OfflineClient<C>,
    id: i64,
) -> ClientResult<RequestDetailsView> {
    let served = client.get_request(id).await?;
    Ok(RequestDetailsView::from(&served.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use paydesk_client::MockBackend;
    use shared::models::TemplateType;

    use crate::views::table::SortDirection;

    fn fixtures() -> Vec<PaymentRequest> {
        MockBackend::new().list(&RequestFilter::default()).data
    }

    #[test]
    fn test_row_cells() {
        let requests = fixtures();
        let tools = requests
            .iter()
            .find(|r| r.template() == TemplateType::Tools)
            .unwrap();
        assert_eq!(tools.cell("counterparty").display(), "SEMrush Pro");
        assert_eq!(tools.cell("invoiceNumber"), CellValue::Empty);
        assert_eq!(tools.cell("totalAmount").display(), "$229.00 USD");
        assert_eq!(tools.cell("type").display(), "Tools & Software");
    }

    #[test]
    fn test_sort_by_amount_descending() {
        let mut table = DataTable::new(fixtures());
        table.sort_by("totalAmount", SortDirection::Descending).unwrap();
        let amounts: Vec<f64> = table.visible().iter().map(|r| r.total_amount).collect();
        assert_eq!(amounts, vec![5000.0, 2500.0, 229.0]);
    }

    #[test]
    fn test_details_projection() {
        let requests = fixtures();
        let link = requests
            .iter()
            .find(|r| r.template() == TemplateType::LinkBuilding)
            .unwrap();
        let view = RequestDetailsView::from(link);
        assert_eq!(view.title, "Link Building & Content");
        assert_eq!(view.field("Vendor"), Some("LinkCorp Solutions"));
        assert_eq!(view.field("Currency"), Some("USD"));
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.total, "2500.00 USD");
        assert_eq!(view.lines[0].amount, "1000.00 USD");
    }
}
