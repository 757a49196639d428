//! Printable layout of a request, built from a form or a stored request

use shared::models::{PaymentRequest, RequestDetails, TemplateType};
use shared::money;

use crate::form::{FormTemplate, TemplateForm};

use super::{file_component, slugify};

/// Grid table with a header row
#[derive(Debug, Clone, PartialEq)]
pub struct DocTable {
    pub head: Vec<String>,
    /// Relative column widths, one per head cell
    pub widths: Vec<f32>,
    pub rows: Vec<Vec<String>>,
}

impl DocTable {
    fn new(head: &[(&str, f32)]) -> Self {
        Self {
            head: head.iter().map(|(h, _)| h.to_string()).collect(),
            widths: head.iter().map(|(_, w)| *w).collect(),
            rows: Vec::new(),
        }
    }
}

/// Everything the PDF writer needs, already formatted
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDocument {
    pub template: TemplateType,
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub table: Option<DocTable>,
    /// Free-text block (other work)
    pub description: Option<String>,
    /// `Total Amount: USD 229.00`
    pub total_line: String,
    pub notes_heading: &'static str,
    pub notes: String,
    pub file_name: String,
}

fn document_title(template: TemplateType) -> &'static str {
    match template {
        TemplateType::LinkBuilding => "Link Building & Content Invoice",
        TemplateType::Salary => "Salary Payment Request",
        TemplateType::Tools => "Tools & Software Request",
        TemplateType::OtherWork => "Other Work Invoice",
    }
}

/// `USD 229.00`
fn amount_text(currency: &str, amount: rust_decimal::Decimal) -> String {
    format!("{} {}", currency, money::format_decimal(amount))
}

fn field(label: &str, value: &str) -> (String, String) {
    (label.to_string(), value.to_string())
}

fn file_name(template: TemplateType, key: &str) -> String {
    let key = match template {
        TemplateType::Tools => slugify(key, "tool"),
        _ => file_component(key, "draft"),
    };
    format!("{}-{}.pdf", template.slug(), key)
}

impl RequestDocument {
    fn skeleton(template: TemplateType, key: &str) -> Self {
        Self {
            template,
            title: document_title(template).to_string(),
            fields: Vec::new(),
            table: None,
            description: None,
            total_line: String::new(),
            notes_heading: "Notes & Payment Method:",
            notes: String::new(),
            file_name: file_name(template, key),
        }
    }

    /// Current form state, valid or not
    pub fn from_form(form: &TemplateForm) -> Self {
        let currency = form.as_form().currency().trim().to_string();
        let entered = |raw: &str| amount_text(&currency, money::amount_or_zero(raw));
        let total = form.as_form().total();

        let mut doc = match form {
            TemplateForm::LinkBuilding(f) => {
                let mut doc = Self::skeleton(TemplateType::LinkBuilding, &f.invoice_number);
                doc.fields = vec![
                    field("Vendor Name", &f.vendor_name),
                    field("Invoice Number", &f.invoice_number),
                    field("Invoice Date", &f.invoice_date),
                ];
                let mut table = DocTable::new(&[
                    ("Type", 1.0),
                    ("Client/Project", 1.6),
                    ("Description", 2.4),
                    ("Amount", 1.2),
                ]);
                table.rows = f
                    .items
                    .iter()
                    .map(|line| {
                        vec![
                            line.reference_type()
                                .map(|k| k.label().to_string())
                                .unwrap_or_default(),
                            line.reference().unwrap_or_default(),
                            line.description.clone(),
                            entered(&line.amount),
                        ]
                    })
                    .collect();
                doc.table = Some(table);
                doc.notes = f.note.clone();
                doc
            }
            TemplateForm::Salary(f) => {
                let mut doc = Self::skeleton(TemplateType::Salary, &f.invoice_number);
                doc.fields = vec![
                    field("Employee Name", &f.employee_name),
                    field("Position", &f.position),
                    field("Address", &f.employee_address),
                    field("Invoice Number", &f.invoice_number),
                    field("Date", &f.date),
                ];
                let mut table = DocTable::new(&[("Description", 4.0), ("Amount", 1.2)]);
                table.rows = f
                    .items
                    .iter()
                    .map(|line| vec![line.description.clone(), entered(&line.amount)])
                    .collect();
                doc.table = Some(table);
                doc.notes_heading = "Payment Method / Bank Details:";
                doc.notes = [f.payment_method.trim(), f.note.trim()]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n");
                doc
            }
            TemplateForm::Tools(f) => {
                let first = f.items.first().map(|i| i.tool_name.as_str()).unwrap_or("");
                let mut doc = Self::skeleton(TemplateType::Tools, first);
                doc.fields = vec![field("Tools", &f.items.len().to_string())];
                let mut table = DocTable::new(&[
                    ("Tool", 1.6),
                    ("Category", 1.4),
                    ("Frequency", 1.1),
                    ("Description", 2.0),
                    ("Amount", 1.2),
                ]);
                table.rows = f
                    .items
                    .iter()
                    .map(|line| {
                        vec![
                            line.tool_name.clone(),
                            line.tool_category.clone(),
                            line.frequency()
                                .map(|fr| fr.label().to_string())
                                .unwrap_or_else(|| line.payment_frequency.clone()),
                            line.description.clone(),
                            entered(&line.amount),
                        ]
                    })
                    .collect();
                doc.table = Some(table);
                doc.notes = f.note.clone();
                doc
            }
            TemplateForm::OtherWork(f) => {
                let mut doc = Self::skeleton(TemplateType::OtherWork, &f.invoice_number);
                doc.fields = vec![
                    field("Vendor Name", &f.vendor_name),
                    field("Invoice Number", &f.invoice_number),
                    field("Invoice Date", &f.invoice_date),
                    field("Work Category", &f.work_category),
                    field("Client/Project Type", &f.client_project_type),
                ];
                doc.description = Some(f.description.clone());
                doc.notes = f.note.clone();
                doc
            }
        };
        doc.fields.push(field("Currency", &currency));
        doc.total_line = match doc.template {
            TemplateType::OtherWork => format!("Amount: {}", amount_text(&currency, total)),
            _ => format!("Total Amount: {}", amount_text(&currency, total)),
        };
        doc
    }

    /// Stored request (details page "Download PDF")
    pub fn from_request(request: &PaymentRequest) -> Self {
        let currency = request.currency.as_str();
        let stored = |value: f64| amount_text(currency, money::to_decimal(value));
        let key = match &request.details {
            RequestDetails::Tools(d) => d.items.first().map(|i| i.tool_name.as_str()).unwrap_or(""),
            other => other.invoice_number().unwrap_or(""),
        };
        let mut doc = Self::skeleton(request.template(), key);

        match &request.details {
            RequestDetails::LinkBuilding(d) => {
                doc.fields = vec![
                    field("Vendor Name", &d.vendor_name),
                    field("Invoice Number", &d.invoice_number),
                    field("Invoice Date", &d.invoice_date),
                ];
                let mut table = DocTable::new(&[
                    ("Type", 1.0),
                    ("Client/Project", 1.6),
                    ("Description", 2.4),
                    ("Amount", 1.2),
                ]);
                table.rows = d
                    .items
                    .iter()
                    .map(|i| {
                        vec![
                            i.client_project_type
                                .map(|k| k.label().to_string())
                                .unwrap_or_default(),
                            i.client_project.clone().unwrap_or_default(),
                            i.description.clone(),
                            stored(i.amount),
                        ]
                    })
                    .collect();
                doc.table = Some(table);
            }
            RequestDetails::Salary(d) => {
                doc.fields = vec![
                    field("Employee Name", &d.employee_name),
                    field("Position", &d.position),
                    field("Address", &d.employee_address),
                    field("Invoice Number", &d.invoice_number),
                    field("Date", &d.date),
                ];
                let mut table = DocTable::new(&[("Description", 4.0), ("Amount", 1.2)]);
                table.rows = d
                    .items
                    .iter()
                    .map(|i| vec![i.description.clone(), stored(i.amount)])
                    .collect();
                doc.table = Some(table);
                doc.notes_heading = "Payment Method / Bank Details:";
            }
            RequestDetails::Tools(d) => {
                doc.fields = vec![field("Tools", &d.items.len().to_string())];
                let mut table = DocTable::new(&[
                    ("Tool", 1.6),
                    ("Category", 1.4),
                    ("Frequency", 1.1),
                    ("Description", 2.0),
                    ("Amount", 1.2),
                ]);
                table.rows = d
                    .items
                    .iter()
                    .map(|i| {
                        vec![
                            i.tool_name.clone(),
                            i.tool_category.clone(),
                            i.payment_frequency.label().to_string(),
                            i.description.clone(),
                            stored(i.amount),
                        ]
                    })
                    .collect();
                doc.table = Some(table);
            }
            RequestDetails::OtherWork(d) => {
                doc.fields = vec![
                    field("Vendor Name", &d.vendor_name),
                    field("Invoice Number", &d.invoice_number),
                    field("Invoice Date", &d.invoice_date),
                    field("Work Category", &d.work_category),
                    field("Client/Project Type", &d.client_project_type),
                ];
                doc.description = Some(d.description.clone());
            }
        }

        doc.fields.push(field("Currency", currency));
        doc.fields.push(field("Status", request.status.label()));
        let label = match doc.template {
            TemplateType::OtherWork => "Amount",
            _ => "Total Amount",
        };
        doc.total_line = format!("{}: {}", label, stored(request.total_amount));

        let payment_method = match &request.details {
            RequestDetails::Salary(d) => d.payment_method.as_deref().unwrap_or(""),
            _ => "",
        };
        doc.notes = [payment_method, request.note.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if let Some(manager_note) = request.manager_note.as_deref().filter(|n| !n.is_empty()) {
            doc.fields.push(field("Manager Note", manager_note));
        }
        if let Some(file) = &request.attachment {
            doc.fields.push(field("Attachment", &file.filename));
        }
        doc
    }
}
