//! Salary Payment template

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::models::{RequestDetails, SalaryDetails, SalaryItem, TemplateType};
use shared::money::DEFAULT_CURRENCY;

use super::catalog;
use super::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, ValidationErrors,
};
use super::{FormTemplate, amount_text, item_field, line_amount, remove_line, today};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalaryForm {
    pub employee_name: String,
    pub employee_address: String,
    pub position: String,
    pub invoice_number: String,
    pub date: String,
    pub currency: String,
    pub items: Vec<SalaryLine>,
    pub payment_method: String,
    pub note: String,
    /// Invoice to upload on submit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for SalaryForm {
    fn default() -> Self {
        Self {
            employee_name: String::new(),
            employee_address: String::new(),
            position: String::new(),
            invoice_number: String::new(),
            date: today(),
            currency: DEFAULT_CURRENCY.to_string(),
            items: vec![SalaryLine::default()],
            payment_method: String::new(),
            note: String::new(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryLine {
    pub description: String,
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
}

impl SalaryForm {
    /// Pick an employee from the catalog and fill in address and position.
    ///
    /// Unknown keys are kept as typed and clear both derived fields.
    pub fn select_employee(&mut self, key: &str) {
        match catalog::find_employee(key) {
            Some(emp) => {
                self.employee_name = emp.name.to_string();
                self.employee_address = emp.address.to_string();
                self.position = emp.position.to_string();
            }
            None => {
                self.employee_name = key.to_string();
                self.employee_address.clear();
                self.position.clear();
            }
        }
    }
}

impl FormTemplate for SalaryForm {
    fn template(&self) -> TemplateType {
        TemplateType::Salary
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn note(&self) -> &str {
        &self.note
    }

    fn amounts(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.amount.as_str()).collect()
    }

    fn attachment(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    fn set_attachment(&mut self, path: Option<PathBuf>) {
        self.file = path;
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("employeeName", "Employee", &self.employee_name, MAX_NAME_LEN);
        errors.require_text(
            "employeeAddress",
            "Employee address",
            &self.employee_address,
            MAX_ADDRESS_LEN,
        );
        errors.require_text("position", "Position", &self.position, MAX_SHORT_TEXT_LEN);
        errors.require_text(
            "invoiceNumber",
            "Invoice number",
            &self.invoice_number,
            MAX_SHORT_TEXT_LEN,
        );
        errors.require_date("date", "Date", &self.date);
        errors.require_currency("currency", &self.currency);
        if self.items.is_empty() {
            errors.push("items", "At least one line item is required");
        }
        for (index, line) in self.items.iter().enumerate() {
            let n = index + 1;
            errors.require_text(
                &item_field(index, "description"),
                &format!("Item {n} description"),
                &line.description,
                MAX_NOTE_LEN,
            );
            errors.require_amount(
                &item_field(index, "amount"),
                &format!("Item {n} amount"),
                &line.amount,
            );
        }
        errors.optional_text(
            "paymentMethod",
            "Payment method",
            &self.payment_method,
            MAX_SHORT_TEXT_LEN,
        );
        errors.optional_text("note", "Note", &self.note, MAX_NOTE_LEN);
        errors.optional_attachment("file", self.file.as_deref());
        errors.into_result()
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn add_item(&mut self) {
        self.items.push(SalaryLine::default());
    }

    fn remove_item(&mut self, index: usize) -> bool {
        remove_line(&mut self.items, index)
    }

    fn to_details(&self) -> RequestDetails {
        let payment_method = self.payment_method.trim();
        RequestDetails::Salary(SalaryDetails {
            employee_name: self.employee_name.trim().to_string(),
            employee_address: self.employee_address.trim().to_string(),
            position: self.position.trim().to_string(),
            invoice_number: self.invoice_number.trim().to_string(),
            date: self.date.trim().to_string(),
            items: self
                .items
                .iter()
                .map(|line| SalaryItem {
                    description: line.description.trim().to_string(),
                    amount: line_amount(&line.amount),
                })
                .collect(),
            payment_method: (!payment_method.is_empty()).then(|| payment_method.to_string()),
        })
    }
}
